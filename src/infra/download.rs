//! Artifact downloads
//!
//! Fetches distribution files and hashes them while they stream in, so no
//! artifact is ever written to disk. Digests published by the index are
//! reused and skip the download entirely.

use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::config::defaults;
use crate::core::artifact::Artifact;
use crate::core::digest::{Algorithm, Digest, DigestSet};
use crate::error::DownloadError;

/// Download manager for hashing remote artifacts
#[derive(Debug, Clone)]
pub struct DownloadManager {
    client: reqwest::Client,
}

impl DownloadManager {
    /// Create a new download manager with the default timeouts
    pub fn new() -> Self {
        Self::with_client(build_client())
    }

    /// Use an existing HTTP client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Get the HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Download `url` and return its hex digest
    pub async fn fetch_digest(&self, url: &str, algorithm: Algorithm) -> Result<String, DownloadError> {
        tracing::debug!("Downloading {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::Network {
                url: url.to_string(),
                error: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let mut hasher = algorithm.hasher();
        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| DownloadError::Network {
                url: url.to_string(),
                error: e.to_string(),
            })?;
            hasher.update(&chunk);
            downloaded += chunk.len() as u64;
        }

        tracing::debug!("Hashed {downloaded} bytes from {url}");
        Ok(hasher.finalize_hex())
    }

    /// Digests of every artifact
    ///
    /// Published digests for `algorithm` are used as is. The remaining
    /// artifacts are downloaded with at most `max_parallel` transfers in
    /// flight. The first failure aborts all outstanding downloads and is
    /// returned; no partial set is ever produced.
    pub async fn collect_digests(
        &self,
        artifacts: &[Artifact],
        algorithm: Algorithm,
        max_parallel: usize,
    ) -> Result<DigestSet, DownloadError> {
        let mut digests = DigestSet::new();
        let mut pending = Vec::new();

        for artifact in artifacts {
            match artifact.published_digest(algorithm.as_str()) {
                Some(value) => {
                    tracing::debug!("Using published {algorithm} digest of {}", artifact.filename);
                    digests.insert(Digest::new(algorithm, value));
                }
                None => pending.push(artifact.url.clone()),
            }
        }

        if pending.is_empty() {
            return Ok(digests);
        }

        let semaphore = Arc::new(Semaphore::new(max_parallel.max(1)));
        let handles: Vec<_> = pending
            .into_iter()
            .map(|url| {
                let sem = semaphore.clone();
                let mgr = self.clone();

                let handle = tokio::spawn({
                    let url = url.clone();
                    async move {
                        let _permit = sem.acquire().await.map_err(|e| DownloadError::Task {
                            url: url.clone(),
                            error: e.to_string(),
                        })?;
                        mgr.fetch_digest(&url, algorithm).await
                    }
                });
                (url, handle)
            })
            .collect();

        let mut handles = handles.into_iter();
        while let Some((url, handle)) = handles.next() {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(DownloadError::Task {
                    url,
                    error: e.to_string(),
                }),
            };

            match result {
                Ok(value) => digests.insert(Digest::new(algorithm, value)),
                Err(e) => {
                    for (_, remaining) in handles.by_ref() {
                        remaining.abort();
                    }
                    return Err(e);
                }
            }
        }

        Ok(digests)
    }
}

impl Default for DownloadManager {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP client shared by index queries and downloads
pub fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(defaults::CONNECT_TIMEOUT_SECS))
        .user_agent(concat!("reqlock/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
