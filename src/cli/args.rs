//! Command-line argument parsing for catalog_sync
//!
//! Defines the CLI structure using clap derive macros. Every path and
//! endpoint the sync touches is an explicit flag with a reference-deployment
//! default; nothing relies on ambient process state beyond those defaults
//! being relative paths.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::app::SyncConfig;
use crate::constants::{catalog, files, http, workers};

/// catalog_sync - incremental open-data catalog downloader
#[derive(Parser, Debug)]
#[command(
    name = "catalog_sync",
    version,
    about = "Download and normalize tabular datasets from an open-data catalog",
    long_about = "Polls an open-data catalog, selects datasets by category tag, downloads their \
CSV distributions with normalized column names, and tracks what has been fetched so unchanged \
datasets are never downloaded twice."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sync datasets from the catalog
    Sync(SyncArgs),

    /// Show the tracking manifest contents
    Status(StatusArgs),
}

/// Arguments for the sync command
#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// Catalog listing endpoint
    #[arg(long, default_value = catalog::DEFAULT_URL, value_name = "URL")]
    pub catalog_url: String,

    /// Category tag selecting which datasets to sync
    #[arg(short, long, default_value = catalog::DEFAULT_THEME)]
    pub theme: String,

    /// Directory for normalized CSV output
    #[arg(short, long, default_value = files::DEFAULT_OUTPUT_DIR, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Tracking manifest path
    #[arg(short, long, default_value = files::DEFAULT_MANIFEST_FILE, value_name = "FILE")]
    pub manifest: PathBuf,

    /// Number of concurrent download workers
    #[arg(short = 'w', long, default_value_t = workers::DEFAULT_WORKER_COUNT)]
    pub workers: usize,

    /// Per-request HTTP timeout in seconds
    #[arg(long, default_value_t = http::REQUEST_TIMEOUT.as_secs(), value_name = "SECONDS")]
    pub timeout: u64,
}

/// Arguments for the status command
#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    /// Tracking manifest path
    #[arg(short, long, default_value = files::DEFAULT_MANIFEST_FILE, value_name = "FILE")]
    pub manifest: PathBuf,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }
}

impl SyncArgs {
    /// Reject configurations that cannot run.
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("Number of workers must be greater than 0".to_string());
        }
        if self.timeout == 0 {
            return Err("Timeout must be greater than 0 seconds".to_string());
        }
        Ok(())
    }

    /// Build the run configuration from these arguments.
    pub fn to_config(&self) -> SyncConfig {
        SyncConfig {
            catalog_url: self.catalog_url.clone(),
            theme: self.theme.clone(),
            output_dir: self.output_dir.clone(),
            manifest_path: self.manifest.clone(),
            worker_count: self.workers,
            request_timeout: Duration::from_secs(self.timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sync_args() -> SyncArgs {
        SyncArgs {
            catalog_url: catalog::DEFAULT_URL.to_string(),
            theme: "Hospitals".to_string(),
            output_dir: PathBuf::from("data"),
            manifest: PathBuf::from("downloads_tracking.json"),
            workers: 5,
            timeout: 60,
        }
    }

    #[test]
    fn test_sync_args_validation() {
        let mut args = sync_args();
        assert!(args.validate().is_ok());

        args.workers = 0;
        assert!(args.validate().is_err());

        args.workers = 5;
        args.timeout = 0;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_sync_args_to_config() {
        let config = sync_args().to_config();
        assert_eq!(config.theme, "Hospitals");
        assert_eq!(config.worker_count, 5);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_log_level() {
        let cli_quiet = Cli {
            global: GlobalArgs {
                verbose: false,
                very_verbose: false,
                quiet: true,
            },
            command: Commands::Status(StatusArgs {
                manifest: PathBuf::from("downloads_tracking.json"),
            }),
        };

        let cli_verbose = Cli {
            global: GlobalArgs {
                verbose: true,
                very_verbose: false,
                quiet: false,
            },
            command: Commands::Status(StatusArgs {
                manifest: PathBuf::from("downloads_tracking.json"),
            }),
        };

        assert_eq!(cli_quiet.log_level(), tracing::Level::ERROR);
        assert_eq!(cli_verbose.log_level(), tracing::Level::INFO);
    }
}
