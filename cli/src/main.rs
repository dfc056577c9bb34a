//! CLI entrypoint for docsync
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod logging;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use colored::Colorize;
use docsync_application::{SourceSpec, SyncDocsInput, SyncDocsUseCase};
use docsync_domain::{OutputFormat, SectionMapping, SourceTag};
use docsync_infrastructure::{
    ConfigLoader, FileConfig, FileSectionConfig, LocalDocumentStore, LocalSourceReader,
};
use docsync_presentation::{Cli, ConsoleFormatter, OutputConfig, ProgressReporter};
use std::collections::HashSet;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

/// Exit status of `--check` when the document is out of date.
const CHECK_FAILED: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let _log_guard = logging::init(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(ExitCode::SUCCESS);
    }

    info!("Starting docsync");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let output_config =
        OutputConfig::new(config.output.format, config.output.color).with_cli_overrides(&cli);
    if !output_config.color {
        colored::control::set_override(false);
    }

    let input = build_input(&cli, &config)?;
    let document_path = input.document.clone();

    // === Dependency Injection ===
    let sources = Arc::new(LocalSourceReader::new());
    let documents = Arc::new(LocalDocumentStore::new());
    let use_case = SyncDocsUseCase::new(sources, documents.clone());

    let output = if output_config.progress_enabled() {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await?
    } else {
        use_case.execute(input).await?
    };

    if cli.stdout {
        print!("{}", output.rendered);
    } else {
        match output_config.format {
            OutputFormat::Text => {
                println!("{}", ConsoleFormatter::format(&output, &document_path));
                if cli.diff {
                    print!("{}", ConsoleFormatter::format_diff(&output, &document_path));
                }
            }
            OutputFormat::Json => {
                println!("{}", ConsoleFormatter::format_json(&output, &document_path));
                if cli.diff {
                    warn!("--diff is ignored with JSON output");
                }
            }
        }
    }

    let pending = output.rendered != output.original;

    if cli.write {
        if pending {
            documents
                .write_document(&document_path, &output.rendered)
                .await
                .with_context(|| format!("Failed to write {}", document_path.display()))?;
            info!(path = %document_path.display(), "document_written");
            if !cli.quiet {
                eprintln!("{} {}", "Updated".green().bold(), document_path.display());
            }
        } else {
            info!(path = %document_path.display(), "document_unchanged");
        }
    } else if cli.check {
        if output.has_changes() || pending {
            if !cli.quiet {
                eprintln!(
                    "{} {} is out of date",
                    "Check failed:".red().bold(),
                    document_path.display()
                );
            }
            return Ok(ExitCode::from(CHECK_FAILED));
        }
    } else if pending && !cli.quiet && output_config.format == OutputFormat::Text {
        eprintln!(
            "{}",
            format!("Run with --write to update {}", document_path.display()).dimmed()
        );
    }

    Ok(ExitCode::SUCCESS)
}

/// Merge the loaded configuration with CLI flags.
///
/// `--source` and `--section` replace their config file counterparts
/// rather than extending them.
fn build_input(cli: &Cli, config: &FileConfig) -> Result<SyncDocsInput> {
    let issues = config.validate();
    if !issues.is_empty() {
        let lines: Vec<String> = issues.iter().map(|e| format!("  - {}", e)).collect();
        bail!("Invalid configuration:\n{}", lines.join("\n"));
    }

    let sources = if cli.source.is_empty() {
        config.source_specs()?
    } else {
        cli.source
            .iter()
            .map(|value| parse_source_flag(value))
            .collect::<Result<Vec<_>>>()?
    };
    if sources.is_empty() {
        bail!("No configuration sources. Use --source TAG=PATH or add [[sources]] to docsync.toml");
    }
    let mut ids = HashSet::new();
    for source in &sources {
        if !ids.insert(source.id.as_str()) {
            bail!("Source '{}' is given more than once", source.id);
        }
    }

    let mapping = if cli.section.is_empty() {
        config.section_mapping()
    } else {
        let rules = cli
            .section
            .iter()
            .map(|value| {
                let section = FileSectionConfig::parse_flag(value)
                    .filter(|s| !s.title.is_empty() && !s.prefixes.is_empty())
                    .with_context(|| {
                        format!("Invalid --section '{}': expected \"Title=prefix1,prefix2\"", value)
                    })?;
                Ok(section.to_rule())
            })
            .collect::<Result<Vec<_>>>()?;
        SectionMapping::new(rules)
    };

    let mut options = config.reconcile.to_options();
    if cli.sort {
        options.sort_added = true;
    }

    let document = cli
        .doc
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.document.path));

    Ok(SyncDocsInput::new(document, mapping)
        .with_sources(sources)
        .with_options(options))
}

fn parse_source_flag(value: &str) -> Result<SourceSpec> {
    let (tag, path) = Cli::parse_source(value)
        .with_context(|| format!("Invalid --source '{}': expected TAG=PATH", value))?;
    let tag: SourceTag = tag.parse().map_err(|e: String| anyhow!(e))?;
    Ok(SourceSpec::new(path, tag))
}
