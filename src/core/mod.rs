//! Core business logic module
//!
//! This module contains the business logic for reqlock.
//! Network and filesystem access live in [`crate::infra`] and
//! [`crate::registry`]; only [`update`] drives them.
//!
//! # Submodules
//!
//! - [`python_version`] - `--python-version` tag expansion
//! - [`artifact`] - Distribution filename classification
//! - [`release`] - Version selection and artifact filtering
//! - [`digest`] - Hash algorithms and digest sets
//! - [`spec`] - Package specifiers and name normalization
//! - [`requirements`] - Requirements file parsing, reconciliation and rendering
//! - [`writer`] - Writing files and producing diffs
//! - [`update`] - Update orchestration

pub mod artifact;
pub mod digest;
pub mod python_version;
pub mod release;
pub mod requirements;
pub mod spec;
pub mod update;
pub mod writer;
