//! Check command implementation
//!
//! Implements `featgate check <NAME>`: a single lookup against the startup
//! flag table.

use anyhow::Result;
use featgate_core::FeatureFlags;
use serde::Serialize;
use tracing::debug;

use crate::cli::OutputFormat;

/// Check command arguments
#[derive(Debug, Clone)]
pub struct CheckArgs {
    pub name: String,
    pub output_format: OutputFormat,
    pub exit_code: bool,
}

/// Result of a single flag lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub enabled: bool,
    /// Whether the name exists in the table at all
    pub known: bool,
}

/// Signals main to exit with the given code without printing an error.
#[derive(Debug)]
pub struct DisabledExitCode(pub i32);

impl std::fmt::Display for DisabledExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "flag disabled (exit code {})", self.0)
    }
}

impl std::error::Error for DisabledExitCode {}

pub fn check_flag(flags: &FeatureFlags, name: &str) -> CheckResult {
    CheckResult {
        name: name.to_string(),
        enabled: flags.is_enabled(name),
        known: flags.contains(name),
    }
}

pub fn render_check(result: &CheckResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(if result.enabled {
            "enabled".to_string()
        } else {
            "disabled".to_string()
        }),
        OutputFormat::Json => Ok(serde_json::to_string(result)?),
    }
}

/// Execute the check command
pub fn execute_check(flags: &FeatureFlags, args: CheckArgs) -> Result<()> {
    let result = check_flag(flags, &args.name);
    debug!(
        "Flag '{}' enabled={} known={}",
        result.name, result.enabled, result.known
    );

    println!("{}", render_check(&result, args.output_format)?);

    if args.exit_code && !result.enabled {
        return Err(DisabledExitCode(1).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_flag_builtin() {
        let flags = FeatureFlags::builtin();

        let result = check_flag(&flags, "AI_RECOMMENDATIONS");
        assert!(result.enabled);
        assert!(result.known);

        let result = check_flag(&flags, "FACE_CHECKIN");
        assert!(!result.enabled);
        assert!(result.known);

        let result = check_flag(&flags, "UNDEFINED_FLAG");
        assert!(!result.enabled);
        assert!(!result.known);
    }

    #[test]
    fn test_render_text() {
        let flags = FeatureFlags::builtin();
        let on = check_flag(&flags, "AI_RECOMMENDATIONS");
        let off = check_flag(&flags, "PAYMENT_GATEWAY");
        assert_eq!(render_check(&on, OutputFormat::Text).unwrap(), "enabled");
        assert_eq!(render_check(&off, OutputFormat::Text).unwrap(), "disabled");
    }

    #[test]
    fn test_render_json() {
        let result = check_flag(&FeatureFlags::builtin(), "UNDEFINED_FLAG");
        let rendered = render_check(&result, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["name"], "UNDEFINED_FLAG");
        assert_eq!(value["enabled"], false);
        assert_eq!(value["known"], false);
    }

    #[test]
    fn test_execute_check_exit_code() {
        let flags = FeatureFlags::builtin();

        let ok = execute_check(
            &flags,
            CheckArgs {
                name: "AI_RECOMMENDATIONS".to_string(),
                output_format: OutputFormat::Text,
                exit_code: true,
            },
        );
        assert!(ok.is_ok());

        let err = execute_check(
            &flags,
            CheckArgs {
                name: "FACE_CHECKIN".to_string(),
                output_format: OutputFormat::Text,
                exit_code: true,
            },
        )
        .unwrap_err();
        assert_eq!(err.downcast_ref::<DisabledExitCode>().map(|e| e.0), Some(1));

        // Without --exit-code a disabled flag is not an error
        let ok = execute_check(
            &flags,
            CheckArgs {
                name: "FACE_CHECKIN".to_string(),
                output_format: OutputFormat::Text,
                exit_code: false,
            },
        );
        assert!(ok.is_ok());
    }
}
