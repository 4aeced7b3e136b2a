//! Package index JSON documents
//!
//! Mirrors the subset of the `/{name}/json` response that is needed to pick
//! a release and hash its files.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::core::artifact::{filename_from_url, Artifact};
use crate::core::release::{PackageIndex, Release};
use crate::error::PackageError;

/// Top-level package document
#[derive(Debug, Clone, Deserialize)]
pub struct PackageDocument {
    pub info: PackageInfo,
    /// Files per version; absent in malformed responses
    #[serde(default)]
    pub releases: Option<BTreeMap<String, Vec<ReleaseFile>>>,
}

/// Project metadata
#[derive(Debug, Clone, Deserialize)]
pub struct PackageInfo {
    /// Canonical project name
    pub name: String,
    /// Current version
    #[serde(default)]
    pub version: Option<String>,
}

/// One file of a release
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseFile {
    pub url: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub digests: BTreeMap<String, String>,
    #[serde(default)]
    pub packagetype: Option<String>,
    #[serde(default)]
    pub python_version: Option<String>,
    #[serde(default)]
    pub yanked: bool,
}

impl From<ReleaseFile> for Artifact {
    fn from(file: ReleaseFile) -> Self {
        let filename = file
            .filename
            .unwrap_or_else(|| filename_from_url(&file.url).to_string());
        if file.yanked {
            tracing::debug!("{filename} is yanked; hashing it anyway");
        }
        Self {
            url: file.url,
            filename,
            index_python_tag: file.python_version,
            packagetype: file.packagetype,
            digests: file.digests,
        }
    }
}

impl PackageDocument {
    /// Convert into the core representation
    pub fn into_index(self) -> Result<PackageIndex, PackageError> {
        let Some(releases) = self.releases else {
            return Err(PackageError::InvalidIndexResponse {
                name: self.info.name,
                reason: "missing 'releases'".to_string(),
            });
        };

        let releases = releases
            .into_iter()
            .map(|(version, files)| Release {
                version,
                artifacts: files.into_iter().map(Artifact::from).collect(),
            })
            .collect();

        Ok(PackageIndex {
            name: self.info.name,
            latest_version: self.info.version,
            releases,
        })
    }
}
