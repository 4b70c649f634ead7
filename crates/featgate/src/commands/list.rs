//! List command implementation

use anyhow::Result;
use featgate_core::{FeatureFlags, FlagValue};
use serde::Serialize;
use tracing::debug;

use crate::cli::OutputFormat;

/// List command arguments
#[derive(Debug, Clone)]
pub struct ListArgs {
    pub enabled_only: bool,
    pub output_format: OutputFormat,
}

/// One row of `featgate list` output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlagEntry<'a> {
    pub name: &'a str,
    pub enabled: bool,
    /// Raw stored value, so non-boolean entries are visible
    pub value: &'a FlagValue,
}

pub fn collect_entries(flags: &FeatureFlags, enabled_only: bool) -> Vec<FlagEntry<'_>> {
    flags
        .iter()
        .map(|(name, value)| FlagEntry {
            name,
            enabled: value.is_enabled(),
            value,
        })
        .filter(|entry| !enabled_only || entry.enabled)
        .collect()
}

pub fn render_list(entries: &[FlagEntry<'_>], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(entries
            .iter()
            .map(|entry| {
                format!(
                    "{}\t{}",
                    entry.name,
                    if entry.enabled { "enabled" } else { "disabled" }
                )
            })
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(entries)?),
    }
}

/// Execute the list command
pub fn execute_list(flags: &FeatureFlags, args: ListArgs) -> Result<()> {
    let entries = collect_entries(flags, args.enabled_only);
    debug!("Listing {} of {} flags", entries.len(), flags.len());

    let rendered = render_list(&entries, args.output_format)?;
    if !rendered.is_empty() {
        println!("{}", rendered);
    }
    Ok(())
}
