//! Package index client implementation
//!
//! Queries the JSON API of a PyPI-compatible index.

use crate::config::urls;
use crate::core::release::PackageIndex;
use crate::error::{DownloadError, PackageError, ReqlockError};
use crate::infra::download::build_client;

use super::models::PackageDocument;

/// Client for the `{index_url}/{name}/json` API
#[derive(Debug, Clone)]
pub struct IndexClient {
    /// HTTP client
    client: reqwest::Client,
    /// JSON API root, without trailing slash
    index_url: String,
}

impl IndexClient {
    /// Create a client for the given index
    pub fn new(index_url: impl Into<String>) -> Self {
        Self::with_client(build_client(), index_url)
    }

    /// Create a client sharing an existing HTTP client
    pub fn with_client(client: reqwest::Client, index_url: impl Into<String>) -> Self {
        Self {
            client,
            index_url: index_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Get the index URL
    pub fn index_url(&self) -> &str {
        &self.index_url
    }

    /// URL of the JSON document for `name`
    pub fn package_url(&self, name: &str) -> String {
        format!("{}/{name}/json", self.index_url)
    }

    /// Fetch everything the index knows about `name`
    pub async fn fetch_package(&self, name: &str) -> Result<PackageIndex, ReqlockError> {
        let url = self.package_url(name);
        tracing::debug!("Querying {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DownloadError::Network {
                url: url.clone(),
                error: e.to_string(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PackageError::NotFound {
                name: name.to_string(),
                index_url: self.index_url.clone(),
            }
            .into());
        }
        if !status.is_success() {
            return Err(DownloadError::Status {
                url,
                status: status.as_u16(),
            }
            .into());
        }

        let document: PackageDocument =
            response
                .json()
                .await
                .map_err(|e| PackageError::InvalidIndexResponse {
                    name: name.to_string(),
                    reason: e.to_string(),
                })?;

        let index = document.into_index()?;
        tracing::debug!("{} has {} releases", index.name, index.releases.len());
        Ok(index)
    }
}

impl Default for IndexClient {
    fn default() -> Self {
        Self::new(urls::DEFAULT_INDEX_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_package_url() {
        let client = IndexClient::new("https://pypi.org/pypi/");
        assert_eq!(client.index_url(), "https://pypi.org/pypi");
        assert_eq!(client.package_url("hashin"), "https://pypi.org/pypi/hashin/json");
        assert_eq!(IndexClient::default().index_url(), urls::DEFAULT_INDEX_URL);
    }

    #[tokio::test]
    async fn test_fetch_package() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pypi/hashin/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "info": {"name": "hashin", "version": "0.10"},
                "releases": {
                    "0.10": [{
                        "url": "https://files/hashin-0.10.tar.gz",
                        "filename": "hashin-0.10.tar.gz",
                        "digests": {"sha256": "aa"},
                        "packagetype": "sdist",
                        "python_version": "source"
                    }]
                }
            })))
            .mount(&mock_server)
            .await;

        let client = IndexClient::new(format!("{}/pypi", mock_server.uri()));
        let index = client.fetch_package("hashin").await.unwrap();

        assert_eq!(index.name, "hashin");
        assert_eq!(index.releases.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_package_not_found() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pypi/nope/json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = IndexClient::new(format!("{}/pypi", mock_server.uri()));
        let err = client.fetch_package("nope").await.unwrap_err();

        match err {
            ReqlockError::Package(PackageError::NotFound { name, .. }) => assert_eq!(name, "nope"),
            e => panic!("Expected NotFound error, got: {e:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_package_server_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = IndexClient::new(mock_server.uri());
        let err = client.fetch_package("hashin").await.unwrap_err();
        assert!(matches!(
            err,
            ReqlockError::Download(DownloadError::Status { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_package_invalid_json() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&mock_server)
            .await;

        let client = IndexClient::new(mock_server.uri());
        let err = client.fetch_package("hashin").await.unwrap_err();
        assert!(matches!(
            err,
            ReqlockError::Package(PackageError::InvalidIndexResponse { .. })
        ));
    }
}
