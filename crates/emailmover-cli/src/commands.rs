use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "emailmover")]
#[command(about = "Match exported emails against a subject manifest", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load the manifest, classify every directory and write the audit tables
    Process {
        /// Move confidently matched files once the tables are written
        #[arg(long)]
        relocate: bool,
    },
    /// Print the relative path a manifest directory normalizes to
    Normalize {
        /// Raw manifest path, e.g. \\ahg-sto-100\nf\ProjectX
        path: String,
    },
    /// Print the subject extracted from a message file
    Subject {
        file: PathBuf,
    },
    /// Print configuration values
    PrintConfig,
}
