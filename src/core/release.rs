//! Release selection
//!
//! Picks the release to pin from an index document and filters its
//! artifacts down to the ones whose digests get recorded.

use std::collections::BTreeSet;
use std::str::FromStr;

use pep440_rs::Version;

use crate::core::artifact::Artifact;
use crate::error::PackageError;

/// One published version of a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Version string exactly as published
    pub version: String,
    /// Files of this release
    pub artifacts: Vec<Artifact>,
}

impl Release {
    /// PEP 440 version, or `None` when the string does not parse
    pub fn parsed_version(&self) -> Option<Version> {
        Version::from_str(&self.version).ok()
    }
}

/// Everything the index knows about one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageIndex {
    /// Canonical project name as spelled by the index
    pub name: String,
    /// Version the index advertises as current
    pub latest_version: Option<String>,
    /// All releases
    pub releases: Vec<Release>,
}

impl PackageIndex {
    /// Release with exactly this version string
    pub fn release(&self, version: &str) -> Option<&Release> {
        self.releases.iter().find(|release| release.version == version)
    }
}

/// Choose the version to pin
///
/// An explicit `requested` version must exist verbatim. Otherwise the
/// highest stable version wins; prereleases are considered only when
/// `include_prereleases` is set and no stable version exists.
pub fn select_version(
    index: &PackageIndex,
    requested: Option<&str>,
    include_prereleases: bool,
) -> Result<String, PackageError> {
    if let Some(requested) = requested {
        return index
            .release(requested)
            .map(|release| release.version.clone())
            .ok_or_else(|| PackageError::NoVersionsFound {
                name: index.name.clone(),
                reason: format!("version {requested} does not exist"),
            });
    }

    if index.releases.is_empty() {
        return index
            .latest_version
            .clone()
            .ok_or_else(|| PackageError::NoVersionsFound {
                name: index.name.clone(),
                reason: "the index lists no releases".to_string(),
            });
    }

    let parsed: Vec<(Version, &Release)> = index
        .releases
        .iter()
        .filter_map(|release| release.parsed_version().map(|v| (v, release)))
        .collect();

    let stable = parsed
        .iter()
        .filter(|(version, _)| !version.any_prerelease())
        .max_by(|a, b| a.0.cmp(&b.0));
    if let Some((_, release)) = stable {
        return Ok(release.version.clone());
    }

    let prereleases = parsed.iter().filter(|(version, _)| version.any_prerelease());
    if include_prereleases {
        if let Some((_, release)) = prereleases.max_by(|a, b| a.0.cmp(&b.0)) {
            return Ok(release.version.clone());
        }
    } else {
        let count = prereleases.count();
        if count > 0 {
            return Err(PackageError::NoVersionsFound {
                name: index.name.clone(),
                reason: format!(
                    "no stable version found, but found {count} pre-releases; \
                     consider running again with the --include-prereleases flag"
                ),
            });
        }
    }

    Err(PackageError::NoVersionsFound {
        name: index.name.clone(),
        reason: "no version could be parsed".to_string(),
    })
}

/// Keep the artifacts whose digests should be recorded
///
/// Source artifacts are always kept. With a non-empty `allowed_tags`,
/// binary artifacts must share at least one python tag with it.
pub fn filter_artifacts(artifacts: &[Artifact], allowed_tags: &BTreeSet<String>) -> Vec<Artifact> {
    artifacts
        .iter()
        .filter(|artifact| {
            if artifact.is_source() || allowed_tags.is_empty() {
                return true;
            }
            let keep = !artifact.python_tags().is_disjoint(allowed_tags);
            if !keep {
                tracing::debug!("Skipping {} (python tags do not match)", artifact.filename);
            }
            keep
        })
        .cloned()
        .collect()
}
