pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use clap::Parser;
use nvprofile_core::error::Result;
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Commands::Create { out, source } => handlers::handle_create(out, source),
        Commands::Inspect { archive, json } => handlers::handle_inspect(archive, json),
        Commands::List { archive } => handlers::handle_list(archive),
        Commands::Restore {
            archive,
            target,
            staged,
            backup_current,
            yes,
        } => handlers::handle_restore(archive, target, staged, backup_current, yes),
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    // a second init (tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
