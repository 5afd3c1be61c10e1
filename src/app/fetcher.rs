//! Per-dataset fetch pipeline
//!
//! For one dataset descriptor: pick its CSV distribution, ask the tracker
//! whether it changed since the last run, download it, normalize the header
//! row, write the table atomically under the output directory, and record a
//! fresh tracking entry. Each step blocks the next; datasets are independent
//! of each other.
//!
//! Failure policy: anything that goes wrong after the skip checks is logged
//! with the dataset title and converted to [`DatasetOutcome::Failed`]. The
//! run continues, the prior tracking entry (if any) stays, and the previous
//! output file is never replaced by a partial write.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, warn};
use url::Url;

use crate::app::client::CatalogClient;
use crate::app::models::DatasetDescriptor;
use crate::app::normalize::normalize_column;
use crate::app::tracker::{SyncTracker, TrackingEntry};
use crate::constants::files;
use crate::errors::{FetchError, FetchResult};

/// How processing one dataset ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetOutcome {
    /// Downloaded, normalized, written, and recorded
    Downloaded,
    /// Tracker says the remote `modified` string is unchanged
    UpToDate,
    /// Dataset has no CSV distribution; not an error
    NoCsv,
    /// A step after the skip checks failed; logged and skipped
    Failed,
}

/// Process one dataset end to end.
///
/// Never returns an error: failures are logged here and collapsed into the
/// outcome so the caller only has to count them.
pub async fn process_dataset(
    client: &CatalogClient,
    tracker: &SyncTracker,
    output_dir: &Path,
    dataset: &DatasetDescriptor,
) -> DatasetOutcome {
    let Some(distribution) = dataset.csv_distribution() else {
        debug!("'{}' has no CSV distribution, skipping", dataset.title);
        return DatasetOutcome::NoCsv;
    };
    // csv_distribution() only returns distributions with a URL
    let Some(download_url) = distribution.download_url.as_deref() else {
        return DatasetOutcome::NoCsv;
    };

    if tracker
        .should_skip(&dataset.identifier, dataset.modified.as_deref())
        .await
    {
        debug!("'{}' is up to date, skipping", dataset.title);
        return DatasetOutcome::UpToDate;
    }

    match fetch_and_write(client, output_dir, dataset, download_url).await {
        Ok((rows, columns)) => {
            tracker
                .record(
                    dataset.identifier.clone(),
                    TrackingEntry {
                        title: dataset.title.clone(),
                        modified_date: dataset.modified.clone(),
                        downloaded_at: Utc::now(),
                        rows,
                        columns,
                    },
                )
                .await;
            info!(
                "Downloaded '{}' ({} rows, {} columns)",
                dataset.title, rows, columns
            );
            DatasetOutcome::Downloaded
        }
        Err(e) => {
            warn!("✗ Failed to process '{}': {}", dataset.title, error_chain(&e));
            DatasetOutcome::Failed
        }
    }
}

/// Download, normalize, and atomically write one dataset's CSV.
///
/// Returns the written table's dimensions (data rows, columns).
async fn fetch_and_write(
    client: &CatalogClient,
    output_dir: &Path,
    dataset: &DatasetDescriptor,
    download_url: &str,
) -> FetchResult<(usize, usize)> {
    validate_identifier(&dataset.identifier)?;

    let url = Url::parse(download_url).map_err(|_| FetchError::InvalidUrl {
        url: download_url.to_string(),
    })?;

    let body = client.download_distribution(&url).await?;
    let normalized = normalize_table(&body)?;

    let final_path = output_path(output_dir, &dataset.identifier);
    write_atomic(&final_path, &normalized.data).await?;

    Ok((normalized.rows, normalized.columns))
}

/// Render an error with its source chain, so the diagnostic line carries
/// the underlying cause (HTTP status, CSV position, OS error) and not just
/// the top-level category.
fn error_chain(error: &FetchError) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Output file path for a dataset identifier.
pub fn output_path(output_dir: &Path, identifier: &str) -> PathBuf {
    output_dir.join(format!("{identifier}.csv"))
}

/// Reject identifiers that cannot safely name a file in the output
/// directory.
fn validate_identifier(identifier: &str) -> FetchResult<()> {
    let unsafe_id = identifier.is_empty()
        || identifier == "."
        || identifier == ".."
        || identifier.contains('/')
        || identifier.contains('\\');
    if unsafe_id {
        return Err(FetchError::UnsafeIdentifier {
            identifier: identifier.to_string(),
        });
    }
    Ok(())
}

struct NormalizedTable {
    data: Vec<u8>,
    rows: usize,
    columns: usize,
}

/// Re-encode a CSV body with normalized headers.
///
/// Records are handled as raw bytes so a stray non-UTF-8 cell does not fail
/// the dataset; only the header row needs to be text, and it is decoded
/// lossily before normalization.
fn normalize_table(body: &[u8]) -> FetchResult<NormalizedTable> {
    let mut reader = csv::Reader::from_reader(body);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|field| normalize_column(&String::from_utf8_lossy(field)))
        .collect();
    let columns = headers.len();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&headers)?;

    let mut rows = 0usize;
    for record in reader.byte_records() {
        writer.write_byte_record(&record?)?;
        rows += 1;
    }

    let data = writer
        .into_inner()
        .map_err(|e| FetchError::Io(e.into_error()))?;

    Ok(NormalizedTable {
        data,
        rows,
        columns,
    })
}

/// Write via a temp file in the same directory plus rename, so an
/// interrupted write never clobbers a previously good output file.
async fn write_atomic(final_path: &Path, data: &[u8]) -> FetchResult<()> {
    let mut temp_name = final_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    temp_name.push(files::TEMP_FILE_SUFFIX);
    let temp_path = final_path.with_file_name(temp_name);

    tokio::fs::write(&temp_path, data).await?;
    tokio::fs::rename(&temp_path, final_path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn test_normalize_table_renames_headers_and_counts() {
        let body = b"Hospital Name (CCN),ZIP Code\nAlpha,12345\nBeta,67890\n";
        let table = normalize_table(body).unwrap();

        assert_eq!(table.rows, 2);
        assert_eq!(table.columns, 2);

        let text = String::from_utf8(table.data).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("hospital_name_ccn,zip_code"));
        assert_eq!(lines.next(), Some("Alpha,12345"));
        assert_eq!(lines.next(), Some("Beta,67890"));
    }

    #[test]
    fn test_normalize_table_header_only() {
        let table = normalize_table(b"Only Header\n").unwrap();
        assert_eq!(table.rows, 0);
        assert_eq!(table.columns, 1);
    }

    #[test]
    fn test_normalize_table_ragged_row_is_error() {
        let body = b"a,b\n1,2\n1,2,3\n";
        assert!(matches!(normalize_table(body), Err(FetchError::Csv(_))));
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("abcd-1234").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("..").is_err());
        assert!(validate_identifier("../escape").is_err());
        assert!(validate_identifier("a/b").is_err());
        assert!(validate_identifier("a\\b").is_err());
    }

    #[tokio::test]
    async fn test_write_atomic_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        write_atomic(&path, b"a,b\n1,2\n").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"a,b\n1,2\n");
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, ["out.csv"]);
    }
}
