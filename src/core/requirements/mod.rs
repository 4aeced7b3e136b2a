//! Requirements lock files
//!
//! A requirements file is parsed into a sequence of [`Line`]s: opaque text
//! reproduced byte-for-byte, and [`Entry`]s for `name==version` pins. Only
//! entries touched by [`Requirements::reconcile`] are re-rendered; the rest
//! of the file round-trips exactly.

mod entry;
mod parse;
mod reconcile;

pub use entry::Entry;
pub use reconcile::{Change, HashPolicy, Pin};

use crate::core::spec::normalize_name;

/// One logical line of a requirements file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Comments, blank lines, options, URLs and anything not understood
    Opaque(String),
    /// A `name==version` pin
    Entry(Entry),
}

impl Line {
    /// Text of this line as it goes into the file
    pub fn render(&self) -> String {
        match self {
            Self::Opaque(text) => text.clone(),
            Self::Entry(entry) => entry.render(),
        }
    }
}

/// A parsed requirements file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirements {
    lines: Vec<Line>,
    newline: &'static str,
}

impl Requirements {
    /// Parse requirements text
    ///
    /// Never fails: anything that cannot be understood is kept as opaque
    /// text, with a warning logged for lines that look like broken pins.
    pub fn parse(text: &str) -> Self {
        let newline = match text.find('\n') {
            Some(index) if text[..index].ends_with('\r') => "\r\n",
            _ => "\n",
        };
        Self {
            lines: parse::tokenize(text),
            newline,
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Line terminator used by the file
    pub fn newline(&self) -> &'static str {
        self.newline
    }

    /// All entries in file order
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.lines.iter().filter_map(|line| match line {
            Line::Entry(entry) => Some(entry),
            Line::Opaque(_) => None,
        })
    }

    /// First entry whose normalized name equals that of `name`
    pub fn find(&self, name: &str) -> Option<&Entry> {
        let target = normalize_name(name);
        self.entries().find(|entry| entry.normalized_name() == target)
    }

    /// Serialize back to text
    pub fn render(&self) -> String {
        self.lines.iter().map(Line::render).collect()
    }

    pub(crate) fn find_mut(&mut self, name: &str) -> Option<&mut Entry> {
        let target = normalize_name(name);
        self.lines.iter_mut().find_map(|line| match line {
            Line::Entry(entry) if entry.normalized_name() == target => Some(entry),
            _ => None,
        })
    }
}
