//! Data models for catalog datasets
//!
//! These structs mirror the JSON the catalog API returns: an array of
//! dataset descriptors, each carrying theme tags and a list of downloadable
//! distributions. Descriptors are fetched fresh on every run and never
//! persisted; the locally persisted state lives in
//! [`crate::app::tracker::TrackingEntry`].

use serde::Deserialize;

use crate::constants::catalog;

/// One downloadable representation of a dataset
///
/// A dataset may offer several distributions (CSV, JSON, ...); only the
/// `text/csv` one is of interest here. Both fields are optional in the wild,
/// so they are modeled as options rather than failing the whole catalog
/// decode.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Distribution {
    /// Media type of the distribution (e.g. `text/csv`)
    #[serde(rename = "mediaType", default)]
    pub media_type: Option<String>,

    /// Direct download URL for the distribution
    #[serde(rename = "downloadURL", default)]
    pub download_url: Option<String>,
}

/// A dataset as described by the remote catalog
///
/// Unknown catalog fields are ignored. Only `identifier` is required; a
/// descriptor without one cannot be tracked or written to disk.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DatasetDescriptor {
    /// Unique dataset identifier, also used as the output file name
    pub identifier: String,

    /// Human-readable dataset title
    #[serde(default = "default_title")]
    pub title: String,

    /// Remote modification timestamp
    ///
    /// Treated as an opaque string and compared byte-for-byte against the
    /// tracking manifest; source values are not guaranteed to be valid dates.
    #[serde(default)]
    pub modified: Option<String>,

    /// Category tags
    #[serde(default)]
    pub theme: Vec<String>,

    /// Available distributions
    #[serde(default)]
    pub distribution: Vec<Distribution>,
}

fn default_title() -> String {
    "Unknown".to_string()
}

impl DatasetDescriptor {
    /// Whether this dataset carries the given category tag
    pub fn has_theme(&self, theme: &str) -> bool {
        self.theme.iter().any(|t| t == theme)
    }

    /// First distribution with a CSV media type and a download URL
    ///
    /// Returns `None` when the dataset has no CSV distribution, which is
    /// common and not an error.
    pub fn csv_distribution(&self) -> Option<&Distribution> {
        self.distribution.iter().find(|d| {
            d.media_type.as_deref() == Some(catalog::CSV_MEDIA_TYPE) && d.download_url.is_some()
        })
    }
}

/// Select the datasets carrying the target category tag.
///
/// Order-preserving subsequence of the input; no side effects.
pub fn filter_by_theme(datasets: Vec<DatasetDescriptor>, theme: &str) -> Vec<DatasetDescriptor> {
    datasets.into_iter().filter(|d| d.has_theme(theme)).collect()
}
