//! catalog_sync library
//!
//! Incremental downloader for tabular open-data catalog datasets. Polls a
//! catalog API, selects datasets by category tag, downloads their CSV
//! distributions with normalized column names, and tracks what has been
//! fetched in a manifest so unchanged datasets are never downloaded twice.

pub mod app;
pub mod cli;
pub mod constants;
pub mod errors;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        assert_eq!(DEFAULT_WORKER_COUNT, 5);
        assert_eq!(DEFAULT_THEME, "Hospitals");
        assert!(USER_AGENT.contains("catalog-sync"));
    }

    #[test]
    fn test_error_types() {
        let catalog_error = errors::CatalogError::Status { status: 500 };
        let app_error = AppError::Catalog(catalog_error);
        assert!(app_error.to_string().contains("500"));
    }
}
