//! Core application logic for catalog_sync
//!
//! This module contains the sync pipeline: catalog data models, the HTTP
//! client, column normalization, the tracking manifest, the per-dataset
//! fetcher, and the coordinator that drives a whole run.
//!
//! # Examples
//!
//! ```rust,no_run
//! use catalog_sync::app::{SyncConfig, SyncCoordinator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let coordinator = SyncCoordinator::new(SyncConfig::default())?;
//! let summary = coordinator.run().await?;
//! println!("Downloaded {} datasets", summary.downloaded);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod coordinator;
pub mod fetcher;
pub mod models;
pub mod normalize;
pub mod tracker;

// Re-export main public API
pub use client::{parse_catalog_url, CatalogClient};
pub use coordinator::{SyncConfig, SyncCoordinator, SyncSummary};
pub use fetcher::{output_path, process_dataset, DatasetOutcome};
pub use models::{filter_by_theme, DatasetDescriptor, Distribution};
pub use normalize::normalize_column;
pub use tracker::{SyncTracker, TrackingEntry};
