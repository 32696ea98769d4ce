//! Configuration for sparsebuf
//!
//! Centralized configuration with sensible defaults.

use crate::error::{Result, SparseError};

/// Configuration for a [`SparseBuffer`](crate::SparseBuffer)
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Buffer Configuration
    // -------------------------------------------------------------------------
    /// Logical size of the buffer in bytes (must be non-zero)
    pub size: usize,

    // -------------------------------------------------------------------------
    // Memory Configuration
    // -------------------------------------------------------------------------
    /// Maximum bytes of range data held at once, `None` for unlimited
    ///
    /// Writes that would exceed the limit fail with an allocation error.
    pub memory_limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: 64 * 1024 * 1024, // 64 MB
            memory_limit: None,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the config describes a usable buffer
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(SparseError::Config("buffer size must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the logical buffer size (in bytes)
    pub fn size(mut self, size: usize) -> Self {
        self.config.size = size;
        self
    }

    /// Cap the bytes of range data held at once
    pub fn memory_limit(mut self, bytes: usize) -> Self {
        self.config.memory_limit = Some(bytes);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
