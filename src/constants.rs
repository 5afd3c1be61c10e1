//! Application constants for catalog_sync
//!
//! Centralizes the defaults used throughout the application, organized by
//! functional domain. Everything here can be overridden from the command
//! line; these are the reference-deployment values.

use std::time::Duration;

/// Catalog endpoint defaults
pub mod catalog {
    /// Default metadata-catalog endpoint (CMS provider-data metastore)
    pub const DEFAULT_URL: &str =
        "https://data.cms.gov/provider-data/api/1/metastore/schemas/dataset/items";

    /// Default category tag used to select datasets
    pub const DEFAULT_THEME: &str = "Hospitals";

    /// Media type identifying a CSV distribution
    pub const CSV_MEDIA_TYPE: &str = "text/csv";
}

/// HTTP client configuration
pub mod http {
    use super::Duration;

    /// User agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("catalog-sync/", env!("CARGO_PKG_VERSION"));

    /// Per-request timeout (catalog listing and distribution downloads)
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
}

/// Worker and concurrency configuration
pub mod workers {
    /// Default number of concurrent dataset fetchers
    pub const DEFAULT_WORKER_COUNT: usize = 5;
}

/// File and path defaults
pub mod files {
    /// Default directory for normalized CSV output
    pub const DEFAULT_OUTPUT_DIR: &str = "data";

    /// Default tracking manifest path
    pub const DEFAULT_MANIFEST_FILE: &str = "downloads_tracking.json";

    /// Temporary file suffix for atomic writes
    pub const TEMP_FILE_SUFFIX: &str = ".tmp";
}

// Re-export commonly used constants for convenience
pub use catalog::{CSV_MEDIA_TYPE, DEFAULT_THEME, DEFAULT_URL as DEFAULT_CATALOG_URL};
pub use files::{DEFAULT_MANIFEST_FILE, DEFAULT_OUTPUT_DIR, TEMP_FILE_SUFFIX};
pub use http::{REQUEST_TIMEOUT, USER_AGENT};
pub use workers::DEFAULT_WORKER_COUNT;
