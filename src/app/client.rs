//! HTTP client for the catalog API and distribution downloads
//!
//! One `reqwest::Client` is built per run and shared by every fetch worker;
//! reqwest pools connections internally. The same bounded request timeout
//! applies to the catalog listing and to each distribution download. There
//! is deliberately no retry here: a catalog failure is fatal for the run and
//! a distribution failure skips that dataset.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::app::models::DatasetDescriptor;
use crate::constants::http;
use crate::errors::{CatalogError, CatalogResult, FetchError, FetchResult};

/// Shared HTTP client for catalog and distribution requests
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
}

impl CatalogClient {
    /// Create a client with the default request timeout.
    pub fn new() -> CatalogResult<Self> {
        Self::with_timeout(http::REQUEST_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> CatalogResult<Self> {
        let client = Client::builder()
            .user_agent(http::USER_AGENT)
            .timeout(timeout)
            .connect_timeout(http::CONNECT_TIMEOUT.min(timeout))
            .build()?;
        Ok(Self { client })
    }

    /// Fetch and decode the full catalog listing.
    ///
    /// Single GET, no retry. Any failure here (network, non-2xx, malformed
    /// JSON) aborts the whole run.
    pub async fn fetch_catalog(&self, url: &Url) -> CatalogResult<Vec<DatasetDescriptor>> {
        debug!("Fetching catalog from {url}");
        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let datasets: Vec<DatasetDescriptor> = serde_json::from_str(&body)?;
        debug!("Catalog listed {} datasets", datasets.len());
        Ok(datasets)
    }

    /// Download one distribution body.
    ///
    /// Non-2xx responses are failures; the caller treats them as per-dataset
    /// errors and moves on.
    pub async fn download_distribution(&self, url: &Url) -> FetchResult<Vec<u8>> {
        debug!("Downloading distribution {url}");
        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Parse a catalog URL from configuration.
pub fn parse_catalog_url(url: &str) -> CatalogResult<Url> {
    Url::parse(url).map_err(|_| CatalogError::InvalidUrl {
        url: url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_catalog_url() {
        assert!(parse_catalog_url("https://example.com/api/items").is_ok());
        assert!(matches!(
            parse_catalog_url("not a url"),
            Err(CatalogError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_catalog_decodes_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"identifier": "a", "theme": ["Hospitals"]}]"#,
            ))
            .mount(&server)
            .await;

        let client = CatalogClient::new().unwrap();
        let url = Url::parse(&format!("{}/items", server.uri())).unwrap();
        let datasets = client.fetch_catalog(&url).await.unwrap();
        assert_eq!(datasets.len(), 1);
        assert_eq!(datasets[0].identifier, "a");
    }

    #[tokio::test]
    async fn test_fetch_catalog_non_2xx_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = CatalogClient::new().unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        let result = client.fetch_catalog(&url).await;
        assert!(matches!(result, Err(CatalogError::Status { status: 503 })));
    }

    #[tokio::test]
    async fn test_fetch_catalog_malformed_json_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = CatalogClient::new().unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        assert!(matches!(
            client.fetch_catalog(&url).await,
            Err(CatalogError::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_download_distribution_non_2xx_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = CatalogClient::new().unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        let result = client.download_distribution(&url).await;
        assert!(matches!(result, Err(FetchError::Status { status: 404 })));
    }
}
