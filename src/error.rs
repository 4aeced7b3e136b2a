//! Error types for reqlock
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Package resolution errors
#[derive(Error, Debug)]
pub enum PackageError {
    /// Package unknown to the index
    #[error("Package '{name}' not found on {index_url}")]
    NotFound { name: String, index_url: String },

    /// Requested version missing, or nothing matches the prerelease policy
    #[error("No versions found for '{name}': {reason}")]
    NoVersionsFound { name: String, reason: String },

    /// The selected release has no artifacts left after filtering
    #[error("No releases could be found for {name} {version}{}", python_versions_suffix(.python_versions))]
    NoMatchingArtifacts {
        name: String,
        version: String,
        python_versions: Vec<String>,
    },

    /// The index answered with something that is not a package document
    #[error("Invalid index response for '{name}': {reason}")]
    InvalidIndexResponse { name: String, reason: String },
}

fn python_versions_suffix(python_versions: &[String]) -> String {
    if python_versions.is_empty() {
        String::new()
    } else {
        format!(" matching Python versions {}", python_versions.join(", "))
    }
}

/// Download and hashing errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Network error
    #[error("Network error downloading '{url}': {error}")]
    Network { url: String, error: String },

    /// Non-success HTTP status
    #[error("HTTP {status} downloading '{url}'")]
    Status { url: String, status: u16 },

    /// Background task failed to complete
    #[error("Download task for '{url}' failed: {error}")]
    Task { url: String, error: String },
}

/// Malformed user input
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Python version filter is not numeric-dotted
    #[error("Invalid Python version '{0}': expected something like '3.10'")]
    InvalidPythonVersion(String),

    /// Package specifier cannot be parsed
    #[error("Invalid package specifier '{spec}': {reason}")]
    InvalidSpecifier { spec: String, reason: String },

    /// Unknown hash algorithm
    #[error("Unsupported hash algorithm '{0}': use one of sha256, sha384, sha512")]
    UnsupportedAlgorithm(String),

    /// Command line flags that cannot be used together
    #[error("{0}")]
    Usage(String),
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },
}

/// Global configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file exists but cannot be read
    #[error("Failed to read config file '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Config file is not valid TOML
    #[error("Failed to parse config file '{path}': {error}")]
    Parse { path: PathBuf, error: String },
}

/// Top-level reqlock error type
#[derive(Error, Debug)]
pub enum ReqlockError {
    /// Package error
    #[error(transparent)]
    Package(#[from] PackageError),

    /// Download error
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Validation error
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Filesystem error
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    /// Config error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// User quit an interactive session
    #[error("Aborted by user, requirements file left unchanged")]
    Aborted,
}

impl ReqlockError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            _ => 1,
        }
    }
}
