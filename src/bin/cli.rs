//! sparsebuf CLI
//!
//! Assembles files from discontiguous fragments.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use sparsebuf::assemble::{self, FragmentSpec, HoleSpec};
use sparsebuf::Config;
use tracing_subscriber::{fmt, EnvFilter};

/// sparsebuf CLI
#[derive(Parser, Debug)]
#[command(name = "sparsebuf")]
#[command(about = "Assemble files from sparse fragments")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Inputs shared by every subcommand
#[derive(ClapArgs, Debug)]
struct Inputs {
    /// Logical size of the assembled file in bytes
    #[arg(short, long)]
    size: usize,

    /// Fragment to load, as <offset>:<path> (repeatable)
    #[arg(short, long = "fragment")]
    fragments: Vec<FragmentSpec>,

    /// Inclusive byte interval to zero out, as <start>-<end> (repeatable)
    #[arg(long = "hole")]
    holes: Vec<HoleSpec>,

    /// Refuse to hold more than this many bytes of fragment data
    #[arg(short, long)]
    memory_limit: Option<usize>,
}

impl Inputs {
    fn config(&self) -> Config {
        let builder = Config::builder().size(self.size);
        match self.memory_limit {
            Some(limit) => builder.memory_limit(limit).build(),
            None => builder.build(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write the assembled file, zero-filling every gap
    Assemble {
        #[command(flatten)]
        inputs: Inputs,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print the stored range map without writing anything
    Map {
        #[command(flatten)]
        inputs: Inputs,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sparsebuf=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let args = Args::parse();

    tracing::debug!("sparsebuf v{}", sparsebuf::VERSION);

    let result = match args.command {
        Commands::Assemble { inputs, output } => {
            assemble::assemble(&inputs.config(), &inputs.fragments, &inputs.holes, &output)
                .map(|report| {
                    println!(
                        "{}: {} bytes, {} fragment(s), {} bytes resident",
                        output.display(),
                        report.size,
                        report.fragments,
                        report.resident_bytes
                    );
                })
        }
        Commands::Map { inputs } => {
            assemble::load(&inputs.config(), &inputs.fragments, &inputs.holes).map(
                |(buffer, _)| {
                    for span in buffer.ranges() {
                        println!("[{}, {}) {} bytes", span.pos, span.end, span.len());
                    }
                    println!(
                        "{} range(s), {} of {} bytes resident",
                        buffer.range_count(),
                        buffer.resident_bytes(),
                        buffer.size()
                    );
                },
            )
        }
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
