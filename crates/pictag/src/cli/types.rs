//! CLI enum types shared by the commands.

use clap::ValueEnum;

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<OutputFormat> for pictag_core::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => pictag_core::OutputFormat::Json,
            OutputFormat::Jsonl => pictag_core::OutputFormat::JsonLines,
        }
    }
}

/// Pick the first non-empty value: the CLI flag, then the config value.
pub fn required_value(flag: Option<String>, configured: &str, what: &str) -> anyhow::Result<String> {
    match flag {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ if !configured.trim().is_empty() => Ok(configured.to_string()),
        _ => anyhow::bail!(
            "No {what} given. Pass it on the command line or set it in {}",
            pictag_core::Config::default_path().display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_value_prefers_flag() {
        let value = required_value(Some("cli".to_string()), "config", "bucket").unwrap();
        assert_eq!(value, "cli");
    }

    #[test]
    fn test_required_value_falls_back_to_config() {
        assert_eq!(required_value(None, "config", "bucket").unwrap(), "config");
        assert_eq!(
            required_value(Some("  ".to_string()), "config", "bucket").unwrap(),
            "config"
        );
    }

    #[test]
    fn test_required_value_missing_everywhere() {
        let err = required_value(None, "", "bucket").unwrap_err();
        assert!(err.to_string().contains("No bucket given"));
    }

    #[test]
    fn test_output_format_maps_to_core() {
        assert_eq!(
            pictag_core::OutputFormat::from(OutputFormat::Jsonl),
            pictag_core::OutputFormat::JsonLines
        );
    }
}
