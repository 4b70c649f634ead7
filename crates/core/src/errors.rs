//! Error types and handling
//!
//! Flag lookup itself never fails: an unknown name is simply disabled. The
//! only fallible path is loading a flag file at startup, so the taxonomy is
//! small: configuration errors wrapped in the top-level [`FeatgateError`].

use thiserror::Error;

/// Flag file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Flag file parsing error
    #[error("Failed to parse flags file: {message}")]
    Parsing { message: String },

    /// Flag file validation error
    #[error("Flags file validation error: {message}")]
    Validation { message: String },

    /// Flag file I/O error
    #[error("Failed to read flags file")]
    Io(#[from] std::io::Error),

    /// Flag file not found
    #[error("Flags file not found: {path}")]
    NotFound { path: String },
}

/// Main error enum wrapping all domain-specific errors
#[derive(Error, Debug)]
pub enum FeatgateError {
    /// Flag file errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Convenience type alias for Results with FeatgateError
pub type Result<T> = std::result::Result<T, FeatgateError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::Parsing {
            message: "unexpected token".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Failed to parse flags file: unexpected token"
        );

        let error = ConfigError::Validation {
            message: "empty flag name".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Flags file validation error: empty flag name"
        );

        let error = ConfigError::NotFound {
            path: "/etc/featgate/flags.toml".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Flags file not found: /etc/featgate/flags.toml"
        );
    }

    #[test]
    fn test_featgate_error_from_config_error() {
        let err: FeatgateError = ConfigError::NotFound {
            path: "flags.json".to_string(),
        }
        .into();
        assert!(matches!(err, FeatgateError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: Flags file not found: flags.json"
        );
    }

    #[test]
    fn test_anyhow_conversion() {
        let err = FeatgateError::Config(ConfigError::Parsing {
            message: "bad".to_string(),
        });
        let anyhow_error = anyhow::Error::from(err);
        assert!(anyhow_error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_error_source_chain() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = FeatgateError::Config(ConfigError::Io(io_error));

        let source = err.source().expect("config error source");
        assert!(source.source().is_some());
    }
}
