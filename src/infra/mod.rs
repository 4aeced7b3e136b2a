//! Infrastructure layer
//!
//! Handles all I/O operations: network and filesystem.
//! This module is the only place where side effects occur.

pub mod download;
pub mod filesystem;
