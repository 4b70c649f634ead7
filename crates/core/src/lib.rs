//! Core library for featgate
//!
//! This crate holds the immutable feature flag table, flags file loading,
//! logging setup, and error handling shared by the `featgate` CLI.

pub mod config;
pub mod errors;
pub mod flags;
pub mod logging;

pub use flags::{is_feature_enabled, FeatureFlag, FeatureFlags, FlagValue};

/// Get the version of the core library
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
