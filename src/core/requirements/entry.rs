//! Requirements entries
//!
//! An [`Entry`] is one logical `name==version` line of a requirements file
//! together with the formatting it was written with. Untouched entries
//! render back to their exact original bytes.

use crate::config::defaults::HASH_INDENT;
use crate::core::digest::{Digest, DigestSet};
use crate::core::spec::normalize_name;

/// One package pin inside a requirements file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Original text of every physical line, terminators included
    pub(crate) raw: String,
    /// Whitespace before the name
    pub(crate) indent: String,
    /// Project name as written
    pub(crate) name: String,
    /// Extras as written, brackets included
    pub(crate) extras: Option<String>,
    /// Pinned version
    pub(crate) version: String,
    /// Environment marker, verbatim
    pub(crate) marker: Option<String>,
    /// Text between the version and the marker, `;` included
    pub(crate) marker_separator: String,
    /// Trailing comment with its leading whitespace, e.g. `  # via foo`
    pub(crate) comment: Option<String>,
    /// Hashes in the order they were written
    pub(crate) digests: Vec<Digest>,
    /// Whitespace before `--hash` on continuation lines
    pub(crate) hash_indent: Option<String>,
    /// Line terminator used inside this entry
    pub(crate) newline: &'static str,
    /// Blank line swallowed by a dangling `\`, kept when re-rendering
    pub(crate) trailer: String,
    /// Set once the entry no longer matches `raw`
    pub(crate) dirty: bool,
}

impl Entry {
    /// Fresh entry that has never been written
    pub(crate) fn new(
        name: &str,
        extras: Option<String>,
        version: &str,
        marker: Option<String>,
        digests: &DigestSet,
        newline: &'static str,
    ) -> Self {
        Self {
            raw: String::new(),
            indent: String::new(),
            name: name.to_string(),
            extras,
            version: version.to_string(),
            marker,
            marker_separator: "; ".to_string(),
            comment: None,
            digests: digests.iter().collect(),
            hash_indent: None,
            newline,
            trailer: String::new(),
            dirty: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name used for matching
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    pub fn extras(&self) -> Option<&str> {
        self.extras.as_deref()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn marker(&self) -> Option<&str> {
        self.marker.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn indent(&self) -> &str {
        &self.indent
    }

    /// Hashes in file order
    pub fn digests(&self) -> &[Digest] {
        &self.digests
    }

    pub fn digest_set(&self) -> DigestSet {
        self.digests.iter().cloned().collect()
    }

    /// Whether the entry was written over several physical lines
    pub fn is_multiline(&self) -> bool {
        if self.dirty {
            !self.digests.is_empty()
        } else {
            self.raw[..self.raw.len() - self.trailer.len()]
                .trim_end_matches(['\r', '\n'])
                .contains('\n')
        }
    }

    /// Whether the entry ends with a line terminator
    pub(crate) fn is_terminated(&self) -> bool {
        self.dirty || self.raw.ends_with('\n')
    }

    pub(crate) fn terminate(&mut self) {
        if !self.is_terminated() {
            self.raw.push_str(self.newline);
        }
    }

    /// Text of this entry as it goes into the file
    pub fn render(&self) -> String {
        if !self.dirty {
            return self.raw.clone();
        }

        let mut out = format!("{}{}", self.indent, self.name);
        if let Some(extras) = &self.extras {
            out.push_str(extras);
        }
        out.push_str("==");
        out.push_str(&self.version);
        if let Some(marker) = &self.marker {
            out.push_str(&self.marker_separator);
            out.push_str(marker);
        }

        let hash_indent = self
            .hash_indent
            .clone()
            .unwrap_or_else(|| format!("{}{HASH_INDENT}", self.indent));
        for digest in &self.digests {
            out.push_str(" \\");
            out.push_str(self.newline);
            out.push_str(&hash_indent);
            out.push_str(&digest.to_string());
        }

        if let Some(comment) = &self.comment {
            out.push_str(comment);
        }
        out.push_str(self.newline);
        out.push_str(&self.trailer);
        out
    }
}
