//! Default configuration values

/// Default requirements file
pub const DEFAULT_REQUIREMENTS_FILE: &str = "requirements.txt";

/// Default number of concurrent artifact downloads
pub const DEFAULT_PARALLEL_DOWNLOADS: usize = 4;

/// Indentation of `--hash` continuation lines in new entries
pub const HASH_INDENT: &str = "    ";

/// Overall timeout of a single HTTP request (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 300;

/// Connect timeout of a single HTTP request (in seconds)
pub const CONNECT_TIMEOUT_SECS: u64 = 30;
