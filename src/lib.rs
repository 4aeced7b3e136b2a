//! Reqlock - pin Python packages with content hashes
//!
//! This library resolves packages against a PyPI-compatible index, hashes
//! the distribution files of the chosen release and merges the result into
//! a pip requirements file, touching nothing but the affected entries.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Business logic: version selection, requirements parsing and reconciliation
//! - [`registry`] - Package index client
//! - [`infra`] - Infrastructure layer (network, filesystem)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;
pub mod registry;

#[cfg(test)]
pub mod test_utils;
