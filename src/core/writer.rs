//! Writing requirements files
//!
//! New content is either written back (only when it differs from what is
//! on disk) or rendered as a unified diff for `--dry-run`.

use std::path::Path;

use similar::TextDiff;

use crate::error::FilesystemError;
use crate::infra::filesystem;

/// Normalize `text` to end with exactly one `newline`
///
/// Text that is empty apart from line terminators becomes empty.
pub fn finalize(text: &str, newline: &str) -> String {
    let trimmed = text.trim_end_matches(['\r', '\n']);
    if trimmed.is_empty() {
        return String::new();
    }
    format!("{trimmed}{newline}")
}

/// Unified diff between the old and new file content
pub fn unified_diff(old: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut unified = diff.unified_diff();
    unified.header("Old", "New");
    unified.to_string()
}

/// Write `new` to `path` unless it equals `old`
///
/// Returns whether the file was written.
pub fn apply(path: &Path, old: &str, new: &str) -> Result<bool, FilesystemError> {
    if old == new {
        tracing::info!("{} is already up to date", path.display());
        return Ok(false);
    }
    filesystem::write_file(path, new)?;
    tracing::info!("Wrote {}", path.display());
    Ok(true)
}
