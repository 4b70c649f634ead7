//! Flags file loading
//!
//! A flags file is read once at startup and layered over the built-in
//! table. It is never watched or reloaded; the resulting
//! [`FeatureFlags`] is immutable for the rest of the process.
//!
//! ## Formats
//!
//! - JSON with comments and trailing commas (`.json`, `.jsonc`, `.json5`),
//!   parsed with the json5 crate
//! - TOML (`.toml`)
//!
//! Any other extension is treated as JSON. The root must be an object
//! (or TOML table) whose keys are flag names. Boolean values are used as
//! they are. Anything else is kept as a non-boolean entry, which lookup
//! always reports as disabled.
//!
//! ```jsonc
//! {
//!   // enable the new checkout flow
//!   "PAYMENT_GATEWAY": true,
//!   "FACE_CHECKIN": false,
//! }
//! ```

use crate::errors::{ConfigError, FeatgateError, Result};
use crate::flags::{FeatureFlags, FlagValue};
use std::path::Path;
use tracing::{debug, instrument, warn};

/// Supported flags file syntaxes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagsFileFormat {
    /// JSON with comments (json5)
    Json,
    /// TOML table
    Toml,
}

impl FlagsFileFormat {
    /// Pick a format from the file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("toml") => FlagsFileFormat::Toml,
            _ => FlagsFileFormat::Json,
        }
    }
}

/// Flags file loader
pub struct FlagsConfigLoader;

impl FlagsConfigLoader {
    /// Build the startup table.
    ///
    /// Starts from the built-in table (or an empty one when
    /// `include_builtin` is false) and layers the flags file on top.
    #[instrument(skip_all, fields(flags_file = ?flags_file, include_builtin = include_builtin))]
    pub fn resolve(flags_file: Option<&Path>, include_builtin: bool) -> Result<FeatureFlags> {
        let base = if include_builtin {
            FeatureFlags::builtin()
        } else {
            FeatureFlags::default()
        };

        let flags = match flags_file {
            Some(path) => base.with_overrides(Self::load_from_path(path)?),
            None => base,
        };

        debug!(
            "Resolved {} flags ({} enabled)",
            flags.len(),
            flags.enabled().count()
        );
        Ok(flags)
    }

    /// Load a flags file from disk.
    pub fn load_from_path(path: &Path) -> Result<FeatureFlags> {
        debug!("Loading flags file from {}", path.display());

        if !path.exists() {
            return Err(FeatgateError::Config(ConfigError::NotFound {
                path: path.display().to_string(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            debug!("Failed to read flags file: {}", e);
            FeatgateError::Config(ConfigError::Io(e))
        })?;

        let flags = Self::parse_str(&content, FlagsFileFormat::from_path(path))?;
        debug!("Loaded {} flags from {}", flags.len(), path.display());
        Ok(flags)
    }

    /// Parse flags file content in the given format.
    pub fn parse_str(content: &str, format: FlagsFileFormat) -> Result<FeatureFlags> {
        let entries = match format {
            FlagsFileFormat::Json => Self::parse_json(content)?,
            FlagsFileFormat::Toml => Self::parse_toml(content)?,
        };

        for (name, value) in &entries {
            Self::validate_name(name)?;
            if let FlagValue::Other(raw) = value {
                warn!(
                    "Flag '{}' has non-boolean value {}; treating it as disabled",
                    name, raw
                );
            }
        }

        Ok(FeatureFlags::from_entries(entries))
    }

    fn parse_json(content: &str) -> Result<Vec<(String, FlagValue)>> {
        let raw_value: serde_json::Value = json5::from_str(content).map_err(|e| {
            debug!("Failed to parse flags file: {}", e);
            FeatgateError::Config(ConfigError::Parsing {
                message: format!("JSON parsing error: {}", e),
            })
        })?;

        match raw_value {
            serde_json::Value::Object(obj) => Ok(obj
                .into_iter()
                .map(|(name, value)| (name, FlagValue::from(value)))
                .collect()),
            _ => Err(FeatgateError::Config(ConfigError::Validation {
                message: "Flags file must contain a JSON object mapping flag names to values"
                    .to_string(),
            })),
        }
    }

    fn parse_toml(content: &str) -> Result<Vec<(String, FlagValue)>> {
        let table: toml::Table = toml::from_str(content).map_err(|e| {
            debug!("Failed to parse flags file: {}", e);
            FeatgateError::Config(ConfigError::Parsing {
                message: format!("TOML parsing error: {}", e),
            })
        })?;

        table
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    toml::Value::Boolean(b) => FlagValue::Bool(b),
                    toml::Value::Datetime(dt) => {
                        FlagValue::Other(serde_json::Value::String(dt.to_string()))
                    }
                    other => FlagValue::Other(serde_json::to_value(&other).map_err(|e| {
                        FeatgateError::Config(ConfigError::Parsing {
                            message: format!("Unsupported value for flag '{}': {}", name, e),
                        })
                    })?),
                };
                Ok((name, value))
            })
            .collect()
    }

    fn validate_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(FeatgateError::Config(ConfigError::Validation {
                message: "Flag names must not be empty".to_string(),
            }));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(FeatgateError::Config(ConfigError::Validation {
                message: format!("Flag name '{}' must not contain whitespace", name),
            }));
        }
        Ok(())
    }
}
