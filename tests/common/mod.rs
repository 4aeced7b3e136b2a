//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reqlock::core::digest::Algorithm;

/// Test project context
///
/// Creates a temporary directory holding the requirements files of a test.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Path of a file inside the project
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        std::fs::write(self.file(name), content).expect("Failed to write file");
    }

    /// Read a file from the test project
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.file(name)).expect("Failed to read file")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Hex SHA-256 of `content`
pub fn sha256(content: &[u8]) -> String {
    Algorithm::Sha256.digest(content)
}

/// A downloadable file served by [`MockIndex`]
pub struct MockFile {
    pub filename: &'static str,
    pub content: &'static [u8],
    /// SHA-256 advertised in the index document, if any
    pub published_sha256: Option<&'static str>,
}

impl MockFile {
    /// File whose digest has to be computed by downloading it
    pub fn download(filename: &'static str, content: &'static [u8]) -> Self {
        Self {
            filename,
            content,
            published_sha256: None,
        }
    }

    /// File whose digest the index publishes
    pub fn published(filename: &'static str, sha256: &'static str) -> Self {
        Self {
            filename,
            content: b"",
            published_sha256: Some(sha256),
        }
    }
}

/// PyPI-like JSON API on a local mock server
pub struct MockIndex {
    pub server: MockServer,
}

impl MockIndex {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Value for `--index-url`
    pub fn index_url(&self) -> String {
        format!("{}/pypi", self.server.uri())
    }

    /// Serve a package document plus every file it lists
    pub async fn add_package(&self, name: &str, releases: &[(&str, Vec<MockFile>)]) {
        let mut release_map = serde_json::Map::new();
        for (version, files) in releases {
            let mut entries = Vec::new();
            for file in files {
                let url = format!("{}/files/{}", self.server.uri(), file.filename);
                let mut digests = serde_json::Map::new();
                if let Some(published) = file.published_sha256 {
                    digests.insert("sha256".to_string(), Value::String(published.to_string()));
                }
                let packagetype = if file.filename.ends_with(".whl") {
                    "bdist_wheel"
                } else {
                    "sdist"
                };
                entries.push(json!({
                    "url": url,
                    "filename": file.filename,
                    "digests": digests,
                    "packagetype": packagetype,
                }));

                Mock::given(method("GET"))
                    .and(path(format!("/files/{}", file.filename)))
                    .respond_with(ResponseTemplate::new(200).set_body_bytes(file.content.to_vec()))
                    .mount(&self.server)
                    .await;
            }
            release_map.insert((*version).to_string(), Value::Array(entries));
        }

        let latest = releases.last().map(|(version, _)| *version).unwrap_or("0");
        self.add_document(
            name,
            json!({
                "info": {"name": name, "version": latest},
                "releases": release_map,
            }),
        )
        .await;
    }

    /// Serve a raw JSON document for `name`
    pub async fn add_document(&self, name: &str, document: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/pypi/{name}/json")))
            .respond_with(ResponseTemplate::new(200).set_body_json(document))
            .mount(&self.server)
            .await;
    }

    /// Make `name` unknown to the index
    pub async fn add_missing(&self, name: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/pypi/{name}/json")))
            .respond_with(ResponseTemplate::new(404))
            .mount(&self.server)
            .await;
    }
}
