//! Content digests
//!
//! A [`DigestSet`] holds the hashes recorded for one requirements entry.
//! It is unique by hex value and always iterates in ascending order of that
//! value, so rendered entries are stable no matter in which order artifacts
//! were discovered.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use sha2::{Digest as _, Sha256, Sha384, Sha512};

use crate::error::ValidationError;

/// Hash algorithms pip accepts in `--hash` options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Algorithm {
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl Algorithm {
    /// All supported algorithms
    pub const ALL: [Algorithm; 3] = [Algorithm::Sha256, Algorithm::Sha384, Algorithm::Sha512];

    /// Name as written in requirements files and index digest maps
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    /// Start an incremental hash
    pub fn hasher(self) -> Hasher {
        match self {
            Self::Sha256 => Hasher::Sha256(Sha256::new()),
            Self::Sha384 => Hasher::Sha384(Sha384::new()),
            Self::Sha512 => Hasher::Sha512(Sha512::new()),
        }
    }

    /// Hex digest of a complete buffer
    pub fn digest(self, data: &[u8]) -> String {
        let mut hasher = self.hasher();
        hasher.update(data);
        hasher.finalize_hex()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnsupportedAlgorithm(s.to_string()))
    }
}

/// Incremental hasher over one of the supported algorithms
pub enum Hasher {
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
}

impl Hasher {
    /// Feed more bytes
    pub fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sha256(h) => h.update(data),
            Self::Sha384(h) => h.update(data),
            Self::Sha512(h) => h.update(data),
        }
    }

    /// Finish and hex-encode
    pub fn finalize_hex(self) -> String {
        match self {
            Self::Sha256(h) => hex::encode(h.finalize()),
            Self::Sha384(h) => hex::encode(h.finalize()),
            Self::Sha512(h) => hex::encode(h.finalize()),
        }
    }
}

/// One `--hash=algorithm:value` token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest {
    pub algorithm: Algorithm,
    pub value: String,
}

impl Digest {
    pub fn new(algorithm: Algorithm, value: impl Into<String>) -> Self {
        Self {
            algorithm,
            value: value.into(),
        }
    }

    /// Parse the part after `--hash=`, e.g. `sha256:abc123`
    ///
    /// Returns `None` for unknown algorithms or non-hex values.
    pub fn parse(token: &str) -> Option<Self> {
        let (algorithm, value) = token.split_once(':')?;
        let algorithm = algorithm.parse().ok()?;
        if value.is_empty() || !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self::new(algorithm, value))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--hash={}:{}", self.algorithm, self.value)
    }
}

/// Digests of one entry, unique by value, ordered by value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestSet {
    by_value: BTreeMap<String, Algorithm>,
}

impl DigestSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a digest; a digest with the same value replaces the old one
    pub fn insert(&mut self, digest: Digest) {
        self.by_value.insert(digest.value, digest.algorithm);
    }

    /// Add every digest of `other`
    pub fn extend(&mut self, other: &DigestSet) {
        for digest in other.iter() {
            self.insert(digest);
        }
    }

    pub fn len(&self) -> usize {
        self.by_value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_value.is_empty()
    }

    pub fn contains_value(&self, value: &str) -> bool {
        self.by_value.contains_key(value)
    }

    /// Digests in ascending order of their hex value
    pub fn iter(&self) -> impl Iterator<Item = Digest> + '_ {
        self.by_value
            .iter()
            .map(|(value, algorithm)| Digest::new(*algorithm, value.clone()))
    }
}

impl FromIterator<Digest> for DigestSet {
    fn from_iter<I: IntoIterator<Item = Digest>>(iter: I) -> Self {
        let mut set = Self::new();
        for digest in iter {
            set.insert(digest);
        }
        set
    }
}
