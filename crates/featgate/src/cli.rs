use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use featgate_core::config::FlagsConfigLoader;
use featgate_core::FeatureFlags;
use std::path::PathBuf;

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON structured format
    Json,
}

/// Log format options
#[derive(Debug, Clone, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    Text,
    /// JSON structured format
    Json,
}

/// Log level options
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    /// Error messages only
    Error,
    /// Warning and error messages
    Warn,
    /// Informational messages and above
    Info,
    /// Debug messages and above
    Debug,
    /// All messages including trace
    Trace,
}

/// featgate subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report whether a feature flag is enabled
    Check {
        /// Flag name (case-sensitive)
        name: String,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        output_format: OutputFormat,
        /// Exit with status 1 when the flag is disabled
        #[arg(long)]
        exit_code: bool,
    },
    /// List feature flags in table order
    List {
        /// Only show enabled flags
        #[arg(long)]
        enabled_only: bool,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        output_format: OutputFormat,
    },
}

/// Feature flag lookup CLI
#[derive(Debug, Parser)]
#[command(name = "featgate")]
#[command(version)]
#[command(about = "Feature flag lookup CLI")]
#[command(
    long_about = "Feature flag lookup CLI\n\n\
    Answers whether named feature flags are enabled. The flag table is built once \
    at startup from the built-in defaults and an optional flags file, and never \
    changes afterwards. Unknown flags are reported as disabled."
)]
pub struct Cli {
    /// Log format (text or json, defaults to text, can be set via FEATGATE_LOG_FORMAT env var)
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Log level
    #[arg(long, global = true, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Flags file (JSON with comments or TOML) layered over the built-in flags
    #[arg(long, global = true, value_name = "PATH", env = "FEATGATE_FLAGS_FILE")]
    pub flags_file: Option<PathBuf>,

    /// Start from an empty table instead of the built-in flags
    #[arg(long, global = true)]
    pub no_builtin: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Initialize logging, build the flag table, and run the subcommand.
    pub fn dispatch(mut self) -> Result<()> {
        let log_format = match self.log_format {
            Some(LogFormat::Text) => Some("text"),
            Some(LogFormat::Json) => Some("json"),
            None => None, // Let logging module check environment variable
        };

        let log_level = match self.log_level {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };

        if std::env::var_os(featgate_core::logging::LOG_FILTER_ENV).is_none()
            && std::env::var_os("RUST_LOG").is_none()
        {
            std::env::set_var(
                "RUST_LOG",
                format!("featgate={},featgate_core={}", log_level, log_level),
            );
        }
        featgate_core::logging::init(log_format)?;

        tracing::debug!("CLI initialized with log level: {}", log_level);

        let Some(command) = self.command.take() else {
            println!("Feature flag lookup CLI");
            println!("Run 'featgate --help' to see available commands.");
            return Ok(());
        };

        if self.no_builtin && self.flags_file.is_none() {
            tracing::warn!("--no-builtin without --flags-file leaves the flag table empty");
        }

        let flags = self.load_flags()?;

        match command {
            Commands::Check {
                name,
                output_format,
                exit_code,
            } => {
                use crate::commands::check::{execute_check, CheckArgs};

                execute_check(
                    &flags,
                    CheckArgs {
                        name,
                        output_format,
                        exit_code,
                    },
                )
            }
            Commands::List {
                enabled_only,
                output_format,
            } => {
                use crate::commands::list::{execute_list, ListArgs};

                execute_list(
                    &flags,
                    ListArgs {
                        enabled_only,
                        output_format,
                    },
                )
            }
        }
    }

    fn load_flags(&self) -> Result<FeatureFlags> {
        FlagsConfigLoader::resolve(self.flags_file.as_deref(), !self.no_builtin).with_context(
            || match &self.flags_file {
                Some(path) => format!("Failed to load flags from {}", path.display()),
                None => "Failed to build flag table".to_string(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_flags_file_env() {
        std::env::remove_var("FEATGATE_FLAGS_FILE");
    }

    #[test]
    #[serial]
    fn test_global_flags_default_values() {
        clear_flags_file_env();
        let cli = Cli::parse_from(["featgate"]);
        assert!(cli.log_format.is_none());
        assert!(matches!(cli.log_level, LogLevel::Warn));
        assert!(cli.flags_file.is_none());
        assert!(!cli.no_builtin);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_check_subcommand_parsing() {
        let cli = Cli::parse_from([
            "featgate",
            "check",
            "AI_RECOMMENDATIONS",
            "--output-format",
            "json",
            "--exit-code",
        ]);
        match cli.command {
            Some(Commands::Check {
                name,
                output_format,
                exit_code,
            }) => {
                assert_eq!(name, "AI_RECOMMENDATIONS");
                assert_eq!(output_format, OutputFormat::Json);
                assert!(exit_code);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_check_requires_name() {
        assert!(Cli::try_parse_from(["featgate", "check"]).is_err());
    }

    #[test]
    fn test_list_subcommand_with_global_flags_after() {
        let cli = Cli::parse_from([
            "featgate",
            "list",
            "--enabled-only",
            "--flags-file",
            "flags.toml",
            "--no-builtin",
        ]);
        assert_eq!(cli.flags_file, Some(PathBuf::from("flags.toml")));
        assert!(cli.no_builtin);
        match cli.command {
            Some(Commands::List {
                enabled_only,
                output_format,
            }) => {
                assert!(enabled_only);
                assert_eq!(output_format, OutputFormat::Text);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_output_format_rejected() {
        let result = Cli::try_parse_from(["featgate", "list", "--output-format", "yaml"]);
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_load_flags_builtin() {
        clear_flags_file_env();
        let cli = Cli::parse_from(["featgate", "list"]);
        let flags = cli.load_flags().unwrap();
        assert_eq!(flags, FeatureFlags::builtin());
    }

    #[test]
    fn test_load_flags_missing_file_has_context() {
        let cli = Cli::parse_from([
            "featgate",
            "--flags-file",
            "/nonexistent/featgate/flags.json",
            "list",
        ]);
        let err = cli.load_flags().unwrap_err();
        assert!(err
            .to_string()
            .contains("Failed to load flags from /nonexistent/featgate/flags.json"));
    }
}
