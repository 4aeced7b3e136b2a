//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    /// Generate a valid package name (lowercase alphanumeric, single hyphens)
    pub fn package_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9]{0,8}(-[a-z0-9]{1,8}){0,2}"
    }

    /// Generate a valid release version string
    pub fn version() -> impl Strategy<Value = String> {
        (0u32..30, 0u32..30, proptest::option::of(0u32..30)).prop_map(|(major, minor, patch)| {
            match patch {
                Some(patch) => format!("{major}.{minor}.{patch}"),
                None => format!("{major}.{minor}"),
            }
        })
    }

    /// Generate a short lowercase hex digest value
    pub fn hex_digest() -> impl Strategy<Value = String> {
        "[0-9a-f]{4,16}"
    }

    /// Generate a line that is not an entry
    pub fn opaque_line() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("\n".to_string()),
            Just("# pinned for reproducible installs\n".to_string()),
            Just("-r base.txt\n".to_string()),
            Just("--index-url https://pypi.org/simple\n".to_string()),
            Just("some-package>=1.0\n".to_string()),
            "[a-z]{1,10}".prop_map(|word| format!("# {word}==1.0 is broken\n")),
        ]
    }

    /// Generate an entry spelled in one of the common layouts
    pub fn entry_text(name: String) -> impl Strategy<Value = String> {
        (
            version(),
            prop_oneof![Just(""), Just("  "), Just("    ")],
            proptest::option::of(Just("python_version < \"3.8\"")),
            proptest::collection::vec(hex_digest(), 0..4),
            any::<bool>(),
            proptest::option::of(Just("  # via other")),
        )
            .prop_map(move |(version, indent, marker, hashes, multiline, comment)| {
                let mut out = format!("{indent}{name}=={version}");
                if let Some(marker) = marker {
                    out.push_str("; ");
                    out.push_str(marker);
                }
                for hash in &hashes {
                    if multiline {
                        out.push_str(&format!(" \\\n{indent}    --hash=sha256:{hash}"));
                    } else {
                        out.push_str(&format!(" --hash=sha256:{hash}"));
                    }
                }
                if let Some(comment) = comment {
                    out.push_str(comment);
                }
                out.push('\n');
                out
            })
    }

    /// Generate a requirements file with uniquely named entries
    pub fn requirements_text() -> impl Strategy<Value = String> {
        proptest::collection::btree_set(package_name(), 0..5)
            .prop_flat_map(|names| {
                let entries: Vec<_> = names.into_iter().map(entry_text).collect();
                let count = entries.len();
                (
                    entries,
                    proptest::collection::vec(proptest::option::of(opaque_line()), count + 1),
                    any::<bool>(),
                )
            })
            .prop_map(|(entries, fillers, trailing_newline)| {
                let mut text = String::new();
                for (index, filler) in fillers.iter().enumerate() {
                    if let Some(filler) = filler {
                        text.push_str(filler);
                    }
                    if let Some(entry) = entries.get(index) {
                        text.push_str(entry);
                    }
                }
                if !trailing_newline && text.ends_with('\n') {
                    text.pop();
                }
                text
            })
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use crate::core::spec::is_valid_name;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_package_name_generator(name in package_name()) {
            prop_assert!(is_valid_name(&name));
            prop_assert!(!name.contains("--"));
        }

        #[test]
        fn test_version_generator(version in version()) {
            let parts: Vec<&str> = version.split('.').collect();
            prop_assert!(parts.len() == 2 || parts.len() == 3);
            for part in parts {
                prop_assert!(part.parse::<u32>().is_ok());
            }
        }

        #[test]
        fn test_hex_digest_generator(hash in hex_digest()) {
            prop_assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }
}
