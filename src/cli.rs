use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP extraction service
    Serve {
        /// Listening port (overrides config and the PORT env var)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Extract subtitles from a single URL and print the result JSON
    Extract {
        /// Video URL
        url: String,
    },
}
