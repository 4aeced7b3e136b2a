//! Distribution artifacts
//!
//! An [`Artifact`] is one downloadable file of a release. Its python tag set
//! decides whether it survives `--python-version` filtering; source
//! distributions always do.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::core::python_version::SOURCE_TAG;

/// File format recognised from a distribution filename
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.whl` (PEP 427)
    Wheel,
    /// `.egg`
    Egg,
    /// Windows installers (`.exe`, `.msi`)
    Installer,
    /// Source archives (`.tar.gz`, `.tar.bz2`, `.tar.xz`, `.zip`)
    Sdist,
}

/// Fields recovered from a distribution filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameInfo {
    pub package: String,
    pub version: String,
    pub python_tag: Option<String>,
    pub abi: Option<String>,
    pub platform: Option<String>,
    pub format: Format,
}

fn wheel_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<package>.+?)-(?P<version>\d[^-]*)(-\d[^-]*)?-(?P<python>[^-]+)-(?P<abi>[^-]+)-(?P<platform>[^-]+)\.whl$",
        )
        .expect("wheel filename pattern is valid")
    })
}

fn egg_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<package>.+?)-(?P<version>\d[^-]*)-(?P<python>[^-]+?)(-(?P<platform>[^.]+))?\.egg$",
        )
        .expect("egg filename pattern is valid")
    })
}

fn installer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<package>.+?)-(?P<version>\d[^-]*?)(-((?P<platform>[^-]*)-)?(?P<python>[^-]+))?\.(exe|msi)$",
        )
        .expect("installer filename pattern is valid")
    })
}

fn sdist_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<package>.+)-(?P<version>\d[^-]*?)(-(?P<platform>[^.]+))?\.(tar\.gz|tar\.bz2|tar\.xz|tgz|zip)$",
        )
        .expect("sdist filename pattern is valid")
    })
}

/// Last path segment of a URL, without query string or fragment
pub fn filename_from_url(url: &str) -> &str {
    let path = url.split(['#', '?']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}

/// Classify a distribution filename
///
/// Returns `None` when the name follows none of the known conventions.
pub fn classify_filename(filename: &str) -> Option<FilenameInfo> {
    let group = |caps: &regex::Captures<'_>, name: &str| caps.name(name).map(|m| m.as_str().to_string());

    let patterns: [(&Regex, Format); 4] = [
        (wheel_re(), Format::Wheel),
        (egg_re(), Format::Egg),
        (installer_re(), Format::Installer),
        (sdist_re(), Format::Sdist),
    ];

    patterns.into_iter().find_map(|(re, format)| {
        let caps = re.captures(filename)?;
        let python_tag = match format {
            Format::Sdist => Some(SOURCE_TAG.to_string()),
            _ => group(&caps, "python"),
        };
        Some(FilenameInfo {
            package: group(&caps, "package")?,
            version: group(&caps, "version")?,
            python_tag,
            abi: group(&caps, "abi"),
            platform: group(&caps, "platform"),
            format,
        })
    })
}

/// `py2.py3`, `cp36.cp37`: every dot-separated piece starts with a letter
fn is_compressed_tag_set(tag: &str) -> bool {
    tag.contains('.')
        && tag
            .split('.')
            .all(|piece| piece.starts_with(|c: char| c.is_ascii_alphabetic()))
}

/// One downloadable file of a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Download URL
    pub url: String,
    /// Filename (taken from the index, or the URL when the index omits it)
    pub filename: String,
    /// Python tag published by the index (`source`, `py3`, `cp39`, ...)
    pub index_python_tag: Option<String>,
    /// Index package type (`sdist`, `bdist_wheel`, ...)
    pub packagetype: Option<String>,
    /// Digests published by the index, keyed by algorithm name
    pub digests: BTreeMap<String, String>,
}

impl Artifact {
    /// Create an artifact known only by its URL
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let filename = filename_from_url(&url).to_string();
        Self {
            url,
            filename,
            index_python_tag: None,
            packagetype: None,
            digests: BTreeMap::new(),
        }
    }

    /// Classification derived from the filename
    pub fn filename_info(&self) -> Option<FilenameInfo> {
        classify_filename(&self.filename)
    }

    /// Whether this is a source distribution
    pub fn is_source(&self) -> bool {
        if self.packagetype.as_deref() == Some("sdist")
            || self.index_python_tag.as_deref() == Some(SOURCE_TAG)
        {
            return true;
        }
        matches!(self.filename_info(), Some(info) if info.format == Format::Sdist)
    }

    /// Every python tag this artifact claims to support
    ///
    /// Compressed tag sets such as `py2.py3` are listed both whole and split.
    /// Dotted versions such as `py2.6` or `2.6` are a single tag.
    pub fn python_tags(&self) -> BTreeSet<String> {
        let mut tags = BTreeSet::new();
        let filename_tag = self.filename_info().and_then(|info| info.python_tag);
        for tag in self.index_python_tag.iter().chain(filename_tag.iter()) {
            tags.insert(tag.clone());
            if is_compressed_tag_set(tag) {
                tags.extend(tag.split('.').map(str::to_string));
            }
        }
        tags
    }

    /// Digest published by the index for `algorithm`, if any
    pub fn published_digest(&self, algorithm: &str) -> Option<&str> {
        self.digests.get(algorithm).map(String::as_str)
    }
}
