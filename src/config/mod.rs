//! Configuration and constants
//!
//! Settings are resolved once at startup and passed explicitly to the
//! components that need them. Precedence, highest first: command line,
//! environment, global config file, built-in defaults.

pub mod defaults;
pub mod urls;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::digest::Algorithm;
use crate::error::ConfigError;

/// Optional global configuration file (`~/.config/reqlock/config.toml`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Package index JSON API root
    pub index_url: Option<String>,

    /// Hash algorithm name
    pub algorithm: Option<String>,

    /// Number of concurrent artifact downloads
    pub parallel: Option<usize>,
}

impl GlobalConfig {
    /// Default location of the global config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("reqlock").join("config.toml"))
    }

    /// Load the global config from a specific path
    ///
    /// A missing file yields the default (empty) configuration.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load the global config from its default location, if any
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }
}

/// Fully resolved settings threaded through resolution and fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Package index JSON API root, without trailing slash
    pub index_url: String,

    /// Hash algorithm for new digests
    pub algorithm: Algorithm,

    /// Number of concurrent artifact downloads
    pub parallel: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            index_url: urls::DEFAULT_INDEX_URL.to_string(),
            algorithm: Algorithm::default(),
            parallel: defaults::DEFAULT_PARALLEL_DOWNLOADS,
        }
    }
}

/// Values supplied on the command line (or via environment through clap)
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    /// `--index-url`
    pub index_url: Option<String>,

    /// `--algorithm`
    pub algorithm: Option<Algorithm>,

    /// `--synchronous` forces one download at a time
    pub synchronous: bool,
}

impl Settings {
    /// Merge command line overrides over the global config and defaults
    pub fn resolve(
        global: &GlobalConfig,
        overrides: &SettingsOverrides,
    ) -> Result<Self, crate::error::ReqlockError> {
        let defaults = Self::default();

        let index_url = overrides
            .index_url
            .clone()
            .or_else(|| global.index_url.clone())
            .unwrap_or(defaults.index_url);

        let algorithm = match (overrides.algorithm, global.algorithm.as_deref()) {
            (Some(algorithm), _) => algorithm,
            (None, Some(name)) => name.parse()?,
            (None, None) => defaults.algorithm,
        };

        let parallel = if overrides.synchronous {
            1
        } else {
            global.parallel.unwrap_or(defaults.parallel).max(1)
        };

        Ok(Self {
            index_url: index_url.trim_end_matches('/').to_string(),
            algorithm,
            parallel,
        })
    }
}
