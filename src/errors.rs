//! Error types for catalog_sync
//!
//! Errors are grouped by the phase of the run they occur in: catalog
//! discovery (fatal for the whole run), per-dataset fetching (recoverable,
//! the dataset is skipped), and tracking-manifest I/O (fatal, since the
//! manifest is the only record of sync state).

use std::path::PathBuf;

use thiserror::Error;

/// Catalog discovery errors
///
/// Any of these aborts the entire run: without a catalog listing there is
/// nothing to sync, and the prior tracking manifest is left untouched.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// HTTP request to the catalog endpoint failed
    #[error("catalog request failed")]
    Http(#[from] reqwest::Error),

    /// Catalog endpoint returned a non-success status
    #[error("catalog endpoint returned HTTP {status}")]
    Status { status: u16 },

    /// Catalog response body was not the expected JSON array
    #[error("catalog response is not valid JSON")]
    Json(#[from] serde_json::Error),

    /// Catalog URL could not be parsed
    #[error("invalid catalog URL: {url}")]
    InvalidUrl { url: String },
}

/// Per-dataset fetch errors
///
/// These are recoverable: the dataset is logged and skipped, its prior
/// tracking entry (if any) is left unchanged, and the run continues.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request for the distribution failed (includes timeouts)
    #[error("download request failed")]
    Http(#[from] reqwest::Error),

    /// Distribution endpoint returned a non-success status
    #[error("download returned HTTP {status}")]
    Status { status: u16 },

    /// Distribution URL could not be parsed
    #[error("invalid download URL: {url}")]
    InvalidUrl { url: String },

    /// Response body could not be parsed as CSV
    #[error("CSV parse error")]
    Csv(#[from] csv::Error),

    /// Filesystem error while writing the output file
    #[error("output file I/O error")]
    Io(#[from] std::io::Error),

    /// Dataset identifier is not safe to use as a file name
    #[error("unusable dataset identifier: {identifier:?}")]
    UnsafeIdentifier { identifier: String },
}

/// Tracking-manifest errors
#[derive(Error, Debug)]
pub enum TrackerError {
    /// I/O error reading or writing the manifest file
    #[error("tracking manifest I/O error: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest file exists but is not valid JSON
    ///
    /// A missing manifest starts the tracker empty; a corrupt one is fatal,
    /// since silently discarding it would re-download everything and mask
    /// the corruption.
    #[error("tracking manifest is corrupted: {path}")]
    Corrupted {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Manifest serialization failed
    #[error("failed to serialize tracking manifest")]
    Serialize(#[from] serde_json::Error),
}

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    /// Catalog discovery error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Per-dataset fetch error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Tracking manifest error
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// Generic I/O error (output directory creation and similar)
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Rejected command-line arguments
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Catalog result type alias
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Tracker result type alias
pub type TrackerResult<T> = std::result::Result<T, TrackerError>;
