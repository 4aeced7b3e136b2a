//! Entry reconciliation
//!
//! Applies one resolved [`Pin`] to a parsed requirements file: the matching
//! entry is updated in place, or a new entry is appended at the end.

use super::{Entry, Line, Requirements};
use crate::core::digest::DigestSet;

/// How new digests combine with the ones already recorded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashPolicy {
    /// Recorded digests are dropped in favour of the new set
    #[default]
    Replace,
    /// Recorded digests are kept alongside the new set
    Merge,
}

/// A fully resolved package ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    /// Name to write for new entries
    pub name: String,
    /// Extras including brackets
    pub extras: Option<String>,
    pub version: String,
    /// Replaces the recorded marker when set
    pub marker: Option<String>,
    pub digests: DigestSet,
}

/// What reconciliation did to the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Entry already matched the pin
    Unchanged,
    /// Existing entry rewritten
    Updated { old_version: String },
    /// New entry appended
    Added,
}

impl Requirements {
    /// Bring the entry for `pin` up to date
    pub fn reconcile(&mut self, pin: &Pin, policy: HashPolicy) -> Change {
        match self.find_mut(&pin.name) {
            Some(entry) => update_entry(entry, pin, policy),
            None => {
                self.append(pin);
                Change::Added
            }
        }
    }

    fn append(&mut self, pin: &Pin) {
        while matches!(self.lines.last(), Some(Line::Opaque(text)) if text.trim().is_empty()) {
            self.lines.pop();
        }

        let newline = self.newline;
        match self.lines.last_mut() {
            Some(Line::Opaque(text)) if !text.ends_with('\n') => text.push_str(newline),
            Some(Line::Entry(entry)) => entry.terminate(),
            _ => {}
        }

        tracing::debug!("Appending {}=={}", pin.name, pin.version);
        self.lines.push(Line::Entry(Entry::new(
            &pin.name,
            pin.extras.clone(),
            &pin.version,
            pin.marker.clone(),
            &pin.digests,
            newline,
        )));
    }
}

fn update_entry(entry: &mut Entry, pin: &Pin, policy: HashPolicy) -> Change {
    let recorded = entry.digest_set();
    let digests = match policy {
        HashPolicy::Replace => pin.digests.clone(),
        HashPolicy::Merge => {
            let mut merged = recorded.clone();
            merged.extend(&pin.digests);
            merged
        }
    };
    let marker = pin.marker.clone().or_else(|| entry.marker.clone());
    let extras = entry.extras.clone().or_else(|| pin.extras.clone());

    if entry.version == pin.version
        && entry.marker == marker
        && entry.extras == extras
        && recorded == digests
    {
        tracing::debug!("{} is already up to date", entry.name);
        return Change::Unchanged;
    }

    let old_version = std::mem::replace(&mut entry.version, pin.version.clone());
    entry.marker = marker;
    entry.extras = extras;
    entry.digests = digests.iter().collect();
    entry.dirty = true;

    tracing::debug!("Updated {} from {old_version} to {}", entry.name, entry.version);
    Change::Updated { old_version }
}
