//! Package index URLs

/// JSON API root of the Python Package Index
pub const DEFAULT_INDEX_URL: &str = "https://pypi.org/pypi";

/// Environment variable overriding the index URL
pub const INDEX_URL_ENV: &str = "REQLOCK_INDEX_URL";
