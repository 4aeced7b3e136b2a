//! Python version tag expansion
//!
//! Wheel filenames and index metadata use several spellings for the same
//! interpreter version (`cp39`, `py3`, `py2.py3`, ...). A `--python-version`
//! filter such as `3.9` is expanded to every spelling that may denote a
//! compatible artifact.

use std::collections::BTreeSet;

use crate::error::ValidationError;

/// Python tag used by the index for source distributions
pub const SOURCE_TAG: &str = "source";

/// Expand one `--python-version` token into the set of matching tags
///
/// # Examples
/// ```
/// use reqlock::core::python_version::expand_python_version;
///
/// let tags = expand_python_version("3.9").unwrap();
/// assert!(tags.contains("cp39"));
/// assert!(tags.contains("py3"));
/// assert!(tags.contains("source"));
/// ```
pub fn expand_python_version(token: &str) -> Result<BTreeSet<String>, ValidationError> {
    let invalid = || ValidationError::InvalidPythonVersion(token.to_string());

    let parts: Vec<&str> = token.split('.').collect();
    if parts.is_empty()
        || parts.len() > 2
        || parts
            .iter()
            .any(|part| part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()))
    {
        return Err(invalid());
    }

    let major = parts[0];
    let mut tags: BTreeSet<String> = [
        token.to_string(),
        format!("py{major}"),
        "py2.py3".to_string(),
        SOURCE_TAG.to_string(),
    ]
    .into_iter()
    .collect();

    if let Some(minor) = parts.get(1) {
        tags.insert(format!("{major}{minor}"));
        tags.insert(format!("cp{major}{minor}"));
        tags.insert(format!("py{major}{minor}"));
        tags.insert(format!("py{major}.{minor}"));
    }

    Ok(tags)
}

/// Expand several tokens into one combined tag set
pub fn expand_python_versions<S: AsRef<str>>(
    tokens: &[S],
) -> Result<BTreeSet<String>, ValidationError> {
    let mut tags = BTreeSet::new();
    for token in tokens {
        tags.extend(expand_python_version(token.as_ref())?);
    }
    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_expand_major_minor() {
        assert_eq!(
            expand_python_version("3.5").unwrap(),
            set(&["3.5", "35", "cp35", "py3", "py3.5", "py35", "py2.py3", "source"])
        );
    }

    #[test]
    fn test_expand_two_digit_minor() {
        let tags = expand_python_version("3.10").unwrap();
        assert!(tags.contains("cp310"));
        assert!(tags.contains("py3.10"));
        assert!(tags.contains("310"));
    }

    #[test]
    fn test_expand_major_only() {
        assert_eq!(
            expand_python_version("2").unwrap(),
            set(&["2", "py2", "py2.py3", "source"])
        );
    }

    #[test]
    fn test_expand_rejects_malformed() {
        for token in ["", "py3", "3.", ".5", "3.5.1", "three", "3.x"] {
            assert_eq!(
                expand_python_version(token),
                Err(ValidationError::InvalidPythonVersion(token.to_string())),
                "token {token:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_expand_many() {
        let tags = expand_python_versions(&["2.7", "3.6"]).unwrap();
        assert!(tags.contains("cp27"));
        assert!(tags.contains("cp36"));
        assert!(tags.contains("py2"));
        assert!(tags.contains("py3"));
    }

    #[test]
    fn test_expand_many_propagates_error() {
        assert!(expand_python_versions(&["3.6", "nope"]).is_err());
    }
}
