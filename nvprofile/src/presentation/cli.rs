use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Back up and restore the NVDA user configuration", long_about = None)]
pub struct Cli {
    /// Log per-file details to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Archive the configuration directory into a .nvdaprofile file
    Create {
        /// output archive; ".nvdaprofile" is appended when missing
        out: PathBuf,

        /// directory to back up (defaults to the NVDA user configuration)
        #[arg(long)]
        source: Option<PathBuf>,
    },

    /// Show who made a backup, when, and what it contains
    Inspect {
        archive: PathBuf,

        /// print the descriptor and file list as JSON
        #[arg(long)]
        json: bool,
    },

    /// List raw archive entries in stored order
    List { archive: PathBuf },

    /// Replace the configuration directory with the contents of an archive
    Restore {
        archive: PathBuf,

        /// directory to replace (defaults to the NVDA user configuration)
        #[arg(long)]
        target: Option<PathBuf>,

        /// extract next to the target first, then swap it in
        #[arg(long)]
        staged: bool,

        /// archive the current configuration here before replacing it
        #[arg(long = "backup-current")]
        backup_current: Option<PathBuf>,

        /// do not ask for confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
}
