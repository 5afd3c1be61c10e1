//! catalog_sync CLI application
//!
//! Command-line interface for syncing tabular datasets from an open-data
//! catalog. Per-dataset failures are logged and do not affect the exit code;
//! only fatal errors (catalog fetch, corrupt or unwritable manifest) exit
//! non-zero.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use catalog_sync::cli::{handle_status, handle_sync, Cli, Commands};
use catalog_sync::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    init_logging(&cli);

    info!("catalog_sync v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Sync(args) => {
            info!("Executing sync command");
            handle_sync(args, cli.global.quiet).await
        }
        Commands::Status(args) => {
            info!("Executing status command");
            handle_status(args).await
        }
    }
}

/// Initialize logging based on CLI verbosity settings
fn init_logging(cli: &Cli) {
    let log_level = cli.log_level();

    let filter = EnvFilter::from_default_env().add_directive(
        format!("catalog_sync={}", log_level)
            .parse()
            .expect("static log directive parses"),
    );

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose)
        .init();
}
