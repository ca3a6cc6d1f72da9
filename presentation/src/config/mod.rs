//! Presentation-level configuration
//!
//! Resolved output settings for rendering envelopes and log lines.

use eforce_domain::OutputFormat;
use serde::{Deserialize, Serialize};

/// Output configuration for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Table or raw JSON rendering
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: true,
        }
    }
}

impl OutputConfig {
    /// Apply a command-line override on top of the file setting.
    pub fn with_format_override(mut self, format: Option<OutputFormat>) -> Self {
        if let Some(format) = format {
            self.format = format;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_only_when_given() {
        let config = OutputConfig::default();
        assert_eq!(config.with_format_override(None).format, OutputFormat::Table);
        assert_eq!(
            config.with_format_override(Some(OutputFormat::Raw)).format,
            OutputFormat::Raw
        );
    }
}
