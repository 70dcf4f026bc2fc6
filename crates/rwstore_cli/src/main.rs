//! RWStore CLI
//!
//! Command-line tools for stored rewriter records.
//!
//! # Commands
//!
//! - `encode` - Build the stored record for a put payload
//! - `decode` - Read a stored record of any schema version
//! - `inspect` - Show the schema version and config layout of a record
//! - `upgrade` - Rewrite a stored record in the current schema
//! - `split` - Split text into keyword-sized chunks

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// RWStore command-line record tools.
#[derive(Parser)]
#[command(name = "rwstore")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Read input from this file instead of stdin
    #[arg(global = true, short, long)]
    input: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the stored record for a put payload
    Encode,

    /// Read a stored record and print the rewriter definition
    Decode {
        /// Rewriter id to report
        #[arg(long, default_value = "rewriter")]
        id: String,
    },

    /// Show the schema version and config layout of a stored record
    Inspect {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Rewrite a stored record in the current schema
    Upgrade {
        /// Rewriter id to report in errors
        #[arg(long, default_value = "rewriter")]
        id: String,
    },

    /// Split text into chunks of at most the given UTF-8 size
    Split {
        /// Maximum chunk size in bytes
        #[arg(short, long, default_value_t = rwstore_core::MAX_KEYWORD_BYTES)]
        max_bytes: usize,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging; stdout carries command output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let input = cli.input.as_deref();
    match cli.command {
        Commands::Encode => commands::encode::run(input)?,
        Commands::Decode { id } => commands::decode::run(input, &id)?,
        Commands::Inspect { format } => commands::inspect::run(input, &format)?,
        Commands::Upgrade { id } => commands::upgrade::run(input, &id)?,
        Commands::Split { max_bytes } => commands::split::run(input, max_bytes)?,
        Commands::Version => {
            println!("RWStore CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("RWStore Core v{}", rwstore_core::VERSION);
            println!(
                "Record schema version: {}",
                rwstore_core::CURRENT_MAPPING_VERSION
            );
        }
    }

    Ok(())
}
