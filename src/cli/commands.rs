//! Command handlers for the CLI
//!
//! Thin layer between argument parsing and the application logic: builds the
//! run configuration, wires the progress bar, and formats user-facing
//! output. All real work happens in [`crate::app`].

use indicatif::{ProgressBar, ProgressStyle};

use crate::app::{SyncCoordinator, SyncTracker};
use crate::cli::args::{StatusArgs, SyncArgs};
use crate::errors::{AppError, Result};

/// Handle the sync command.
pub async fn handle_sync(args: SyncArgs, quiet: bool) -> Result<()> {
    args.validate()
        .map_err(|message| AppError::InvalidArguments { message })?;

    let config = args.to_config();
    let output_dir = config.output_dir.clone();
    let manifest_path = config.manifest_path.clone();
    let coordinator = SyncCoordinator::new(config)?;

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {pos} datasets processed ({msg})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb
    };

    let summary = {
        let progress = &progress;
        coordinator
            .run_with_progress(move |outcome| {
                progress.inc(1);
                progress.set_message(format!("{outcome:?}"));
            })
            .await?
    };

    progress.finish_and_clear();

    if !quiet {
        println!();
        println!(
            "Processed {} datasets: {} downloaded, {} up to date, {} without CSV, {} failed",
            summary.total, summary.downloaded, summary.up_to_date, summary.no_csv, summary.failed
        );
        if summary.aborted > 0 {
            println!("{} datasets skipped due to shutdown", summary.aborted);
        }
        println!("Processed files are in '{}'", output_dir.display());
        println!("Tracking data saved to '{}'", manifest_path.display());
    }

    Ok(())
}

/// Handle the status command: print the tracking manifest contents.
pub async fn handle_status(args: StatusArgs) -> Result<()> {
    let tracker = SyncTracker::load(&args.manifest).await?;
    let entries = tracker.entries().await;

    if entries.is_empty() {
        println!("No datasets tracked in '{}'", args.manifest.display());
        return Ok(());
    }

    println!(
        "{} datasets tracked in '{}':",
        entries.len(),
        args.manifest.display()
    );
    for (identifier, entry) in entries {
        println!(
            "  {identifier}  {}  modified {}  {} rows x {} columns  downloaded {}",
            entry.title,
            entry.modified_date.as_deref().unwrap_or("-"),
            entry.rows,
            entry.columns,
            entry.downloaded_at.to_rfc3339(),
        );
    }

    Ok(())
}
