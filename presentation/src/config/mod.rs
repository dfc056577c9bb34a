//! Presentation-level configuration
//!
//! Output settings after merging the config file with CLI flags.

use crate::cli::commands::Cli;
use docsync_domain::OutputFormat;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// Report format
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Show progress indicators
    pub show_progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: true,
            show_progress: true,
        }
    }
}

impl OutputConfig {
    pub fn new(format: Option<OutputFormat>, color: bool) -> Self {
        Self {
            format: format.unwrap_or_default(),
            color,
            ..Self::default()
        }
    }

    /// Apply `--output`, `--no-color` and `--quiet`.
    pub fn with_cli_overrides(mut self, cli: &Cli) -> Self {
        if let Some(format) = cli.output {
            self.format = format.into();
        }
        if cli.no_color {
            self.color = false;
        }
        if cli.quiet {
            self.show_progress = false;
        }
        self
    }

    /// Progress bars would interleave with JSON on the terminal.
    pub fn progress_enabled(&self) -> bool {
        self.show_progress && self.format == OutputFormat::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_overrides_file_settings() {
        let cli = Cli::try_parse_from(["docsync", "-o", "json", "--no-color", "-q"]).unwrap();
        let config = OutputConfig::new(Some(OutputFormat::Text), true).with_cli_overrides(&cli);

        assert_eq!(config.format, OutputFormat::Json);
        assert!(!config.color);
        assert!(!config.show_progress);
    }

    #[test]
    fn test_file_settings_kept_without_flags() {
        let cli = Cli::try_parse_from(["docsync"]).unwrap();
        let config = OutputConfig::new(Some(OutputFormat::Json), false).with_cli_overrides(&cli);

        assert_eq!(config.format, OutputFormat::Json);
        assert!(!config.color);
    }

    #[test]
    fn test_progress_only_for_text() {
        assert!(OutputConfig::default().progress_enabled());
        assert!(!OutputConfig::new(Some(OutputFormat::Json), true).progress_enabled());
    }
}
