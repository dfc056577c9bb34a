//! CLI command definitions

use clap::{Parser, ValueEnum};
use docsync_domain::OutputFormat as ReportFormat;
use std::path::PathBuf;

/// Output format for the reconciliation report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored per-section summary
    Text,
    /// JSON report
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

/// CLI arguments for docsync
#[derive(Parser, Debug)]
#[command(name = "docsync")]
#[command(author, version, about = "Keep a Markdown configuration reference in sync with its sources")]
#[command(long_about = r#"
docsync reconciles a Markdown configuration reference against the
configuration sources it documents (properties files and env templates).

The run has five stages:
1. Load sources: every source is parsed and merged into configuration keys
2. Parse document: the existing reference is read into sections and tables
3. Classify: requirement status, environment variance, example values
4. Reconcile: additions, removals and field updates per section
5. Render: the updated document, prose kept byte-for-byte

Nothing is written unless --write is given.

Configuration files are loaded from (in priority order):
1. DOCSYNC_* environment variables
2. --config <path>     Explicit config file
3. ./docsync.toml      Project-level config
4. ~/.config/docsync/config.toml   Global config

Example:
  docsync --source local=src/main/resources/application.properties \
          --source template=.env.example --doc docs/CONFIGURATION.md --diff
  docsync --check
  docsync --write --section "Redis Configuration=redis,REDIS_"
"#)]
pub struct Cli {
    /// Configuration source as TAG=PATH, TAG is local, prod, test or template
    /// (can be specified multiple times; replaces sources from config files)
    #[arg(short, long, value_name = "TAG=PATH")]
    pub source: Vec<String>,

    /// Documentation file to reconcile
    #[arg(short, long, value_name = "PATH")]
    pub doc: Option<PathBuf>,

    /// Section mapping as "Title=prefix1,prefix2" (can be specified multiple times;
    /// replaces sections from config files)
    #[arg(long, value_name = "TITLE=PREFIXES")]
    pub section: Vec<String>,

    /// Sort added rows alphabetically
    #[arg(long)]
    pub sort: bool,

    /// Write the updated document
    #[arg(short, long)]
    pub write: bool,

    /// Exit with status 2 when the document is out of date
    #[arg(long, conflicts_with = "write")]
    pub check: bool,

    /// Print a unified diff of the document changes
    #[arg(long)]
    pub diff: bool,

    /// Print the updated document to stdout instead of the report
    #[arg(long, conflicts_with = "diff")]
    pub stdout: bool,

    /// Report format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Write logs to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Split a `--source TAG=PATH` value into its parts.
    pub fn parse_source(value: &str) -> Option<(&str, &str)> {
        let (tag, path) = value.split_once('=')?;
        let (tag, path) = (tag.trim(), path.trim());
        if tag.is_empty() || path.is_empty() {
            return None;
        }
        Some((tag, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "docsync",
            "--source",
            "local=app.properties",
            "-s",
            "template=.env.example",
            "--doc",
            "docs/CONFIG.md",
            "--section",
            "Redis=redis,REDIS_",
            "--sort",
            "--diff",
            "-o",
            "json",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.source, vec!["local=app.properties", "template=.env.example"]);
        assert_eq!(cli.doc, Some(PathBuf::from("docs/CONFIG.md")));
        assert_eq!(cli.section, vec!["Redis=redis,REDIS_"]);
        assert!(cli.sort);
        assert!(cli.diff);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.write);
    }

    #[test]
    fn test_check_conflicts_with_write() {
        assert!(Cli::try_parse_from(["docsync", "--check", "--write"]).is_err());
    }

    #[test]
    fn test_parse_source() {
        assert_eq!(
            Cli::parse_source("prod = conf/prod.properties"),
            Some(("prod", "conf/prod.properties"))
        );
        assert_eq!(Cli::parse_source("conf/prod.properties"), None);
        assert_eq!(Cli::parse_source("prod="), None);
    }

    #[test]
    fn test_output_format_into_domain() {
        assert_eq!(ReportFormat::from(OutputFormat::Json), ReportFormat::Json);
        assert_eq!(ReportFormat::from(OutputFormat::Text), ReportFormat::Text);
    }
}
