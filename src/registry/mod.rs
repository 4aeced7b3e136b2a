//! Package index client
//!
//! Fetches release listings from a PyPI-compatible JSON API.

pub mod client;
pub mod models;

pub use client::IndexClient;
