//! Package specifiers
//!
//! A specifier names what to pin: `name`, `name==version`, optionally with
//! extras (`requests[security]`) and an environment marker
//! (`enum34==1.1.6; python_version <= "3.4"`).

use std::fmt;

use crate::error::ValidationError;

/// Normalize a project name for comparison (PEP 503)
///
/// Lowercases and collapses every run of `-`, `_` and `.` into one `-`, so
/// `My_Package`, `my-package` and `my.package` compare equal.
pub fn normalize_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                normalized.push('-');
            }
            in_separator = true;
        } else {
            normalized.extend(c.to_lowercase());
            in_separator = false;
        }
    }
    normalized
}

/// Whether `name` is a syntactically valid project name
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let (Some(first), Some(last)) = (chars.next(), name.chars().last()) else {
        return false;
    };
    first.is_ascii_alphanumeric()
        && last.is_ascii_alphanumeric()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// A parsed package specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    /// Project name as typed
    pub name: String,
    /// Extras including brackets, e.g. `[security]`
    pub extras: Option<String>,
    /// Exact version, when pinned with `==`
    pub version: Option<String>,
    /// Environment marker, verbatim
    pub marker: Option<String>,
}

impl PackageSpec {
    /// Parse a command line specifier
    pub fn parse(spec: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidSpecifier {
            spec: spec.to_string(),
            reason: reason.to_string(),
        };

        let (requirement, marker) = match spec.split_once(';') {
            Some((requirement, marker)) => {
                let marker = marker.trim();
                if marker.is_empty() {
                    return Err(invalid("empty environment marker"));
                }
                (requirement.trim(), Some(marker.to_string()))
            }
            None => (spec.trim(), None),
        };

        let (name_part, version) = match requirement.split_once("==") {
            Some((name_part, version)) => {
                let version = version.trim();
                if version.is_empty() || version.contains(char::is_whitespace) {
                    return Err(invalid("expected a single version after '=='"));
                }
                (name_part.trim(), Some(version.to_string()))
            }
            None => {
                if requirement.contains(['<', '>', '=', '~', '!']) {
                    return Err(invalid("only exact '==' pins are supported"));
                }
                (requirement, None)
            }
        };

        let (name, extras) = match name_part.find('[') {
            Some(start) => {
                if !name_part.ends_with(']') {
                    return Err(invalid("unterminated extras"));
                }
                (
                    name_part[..start].trim(),
                    Some(name_part[start..].to_string()),
                )
            }
            None => (name_part, None),
        };

        if !is_valid_name(name) {
            return Err(invalid("invalid package name"));
        }

        Ok(Self {
            name: name.to_string(),
            extras,
            version,
            marker,
        })
    }

    /// Normalized name used for matching
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(extras) = &self.extras {
            write!(f, "{extras}")?;
        }
        if let Some(version) = &self.version {
            write!(f, "=={version}")?;
        }
        if let Some(marker) = &self.marker {
            write!(f, "; {marker}")?;
        }
        Ok(())
    }
}
