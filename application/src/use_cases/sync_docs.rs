//! Sync Docs use case
//!
//! Runs the whole pipeline: sources are read and loaded while the document
//! is read and parsed, then keys are classified, reconciled against the
//! document and the updated text is rendered. Nothing is written; the caller
//! decides what to do with the output.

use crate::ports::document_reader::{DocumentReadError, DocumentReaderPort};
use crate::ports::progress::{NoProgress, ProgressNotifier, SyncStage};
use crate::ports::source_reader::{SourceReadError, SourceReaderPort};
use docsync_domain::{
    ChangeSet, ClassifiedKey, ConfigSource, Document, DomainError, SectionMapping,
    SourceFormat, SourceTag, SyncOptions, classify, load_keys, parse_document, reconcile, render,
};
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during a sync run
#[derive(Error, Debug)]
pub enum SyncDocsError {
    #[error("No configuration sources configured")]
    NoSources,

    #[error(transparent)]
    SourceRead(#[from] SourceReadError),

    #[error(transparent)]
    DocumentRead(#[from] DocumentReadError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// One configuration source to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    /// Identifier reported in origins and errors
    pub id: String,
    pub path: PathBuf,
    pub tag: SourceTag,
    /// Line syntax; inferred from the file name when not set
    pub format: Option<SourceFormat>,
}

impl SourceSpec {
    /// A source identified by its path.
    pub fn new(path: impl Into<PathBuf>, tag: SourceTag) -> Self {
        let path = path.into();
        Self {
            id: path.display().to_string(),
            path,
            tag,
            format: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_format(mut self, format: SourceFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn resolved_format(&self) -> SourceFormat {
        self.format.unwrap_or_else(|| {
            let name = self
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            SourceFormat::infer(&name)
        })
    }
}

/// Input for the SyncDocs use case
#[derive(Debug, Clone)]
pub struct SyncDocsInput {
    pub sources: Vec<SourceSpec>,
    /// Path of the documentation file
    pub document: PathBuf,
    pub mapping: SectionMapping,
    pub options: SyncOptions,
}

impl SyncDocsInput {
    pub fn new(document: impl Into<PathBuf>, mapping: SectionMapping) -> Self {
        Self {
            sources: Vec::new(),
            document: document.into(),
            mapping,
            options: SyncOptions::default(),
        }
    }

    pub fn with_source(mut self, source: SourceSpec) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_sources(mut self, sources: impl IntoIterator<Item = SourceSpec>) -> Self {
        self.sources.extend(sources);
        self
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }
}

/// Result of a sync run
#[derive(Debug, Clone)]
pub struct SyncDocsOutput {
    /// Document text as read (empty when the file did not exist)
    pub original: String,
    /// Document text with the ChangeSet applied
    pub rendered: String,
    pub document_existed: bool,
    pub document: Document,
    pub keys: Vec<ClassifiedKey>,
    pub change_set: ChangeSet,
}

impl SyncDocsOutput {
    /// Whether the document needs edits.
    pub fn has_changes(&self) -> bool {
        !self.change_set.is_empty()
    }
}

/// Use case for reconciling a documentation file with its configuration sources
pub struct SyncDocsUseCase<S: SourceReaderPort + 'static, D: DocumentReaderPort + 'static> {
    sources: Arc<S>,
    documents: Arc<D>,
}

impl<S: SourceReaderPort + 'static, D: DocumentReaderPort + 'static> SyncDocsUseCase<S, D> {
    pub fn new(sources: Arc<S>, documents: Arc<D>) -> Self {
        Self { sources, documents }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: SyncDocsInput) -> Result<SyncDocsOutput, SyncDocsError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: SyncDocsInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<SyncDocsOutput, SyncDocsError> {
        if input.sources.is_empty() {
            return Err(SyncDocsError::NoSources);
        }

        info!(
            "Syncing {} with {} sources",
            input.document.display(),
            input.sources.len()
        );

        let (sources, document) = tokio::join!(
            self.read_sources(&input.sources, progress),
            self.read_document(&input.document, progress)
        );
        let sources = sources?;
        let (original, document_existed, document) = document?;

        progress.on_stage_start(&SyncStage::Classify, sources.len());
        let keys = classify(load_keys(&sources, &input.options).map_err(DomainError::from)?);
        progress.on_stage_complete(&SyncStage::Classify);
        debug!(keys = keys.len(), "keys_classified");

        progress.on_stage_start(&SyncStage::Reconcile, keys.len());
        let change_set = reconcile(&keys, &document, &input.mapping, &input.options);
        progress.on_stage_complete(&SyncStage::Reconcile);

        for error in change_set.review_errors() {
            warn!(fatal = error.is_fatal(), "{}", error);
        }
        for warning in &change_set.warnings {
            warn!("{}", warning);
        }

        progress.on_stage_start(&SyncStage::Render, change_set.sections.len());
        let rendered = render(&document, &change_set);
        progress.on_stage_complete(&SyncStage::Render);

        let summary = change_set.summary();
        info!(
            "Reconciled {} keys: {} added, {} removed, {} updated",
            keys.len(),
            summary.added,
            summary.removed,
            summary.updated
        );

        Ok(SyncDocsOutput {
            original,
            rendered,
            document_existed,
            document,
            keys,
            change_set,
        })
    }

    /// Read every source concurrently. Any failure fails the whole load.
    async fn read_sources(
        &self,
        specs: &[SourceSpec],
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<ConfigSource>, SyncDocsError> {
        progress.on_stage_start(&SyncStage::LoadSources, specs.len());

        let reads = specs.iter().map(|spec| async move {
            let result = self.sources.read_source(&spec.path).await;
            progress.on_item_complete(&SyncStage::LoadSources, &spec.id, result.is_ok());
            let content = result?;
            debug!(source = %spec.id, bytes = content.len(), "source_read");
            Ok::<_, SyncDocsError>(ConfigSource::new(
                spec.id.clone(),
                spec.tag,
                spec.resolved_format(),
                content,
            ))
        });
        let sources = try_join_all(reads).await?;

        progress.on_stage_complete(&SyncStage::LoadSources);
        Ok(sources)
    }

    async fn read_document(
        &self,
        path: &Path,
        progress: &dyn ProgressNotifier,
    ) -> Result<(String, bool, Document), SyncDocsError> {
        progress.on_stage_start(&SyncStage::ParseDocument, 1);

        let text = self.documents.read_document(path).await?;
        let existed = text.is_some();
        if !existed {
            info!("{} does not exist yet, starting from an empty document", path.display());
        }
        let text = text.unwrap_or_default();
        let document = parse_document(&text);

        progress.on_stage_complete(&SyncStage::ParseDocument);
        Ok((text, existed, document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docsync_domain::{Environment, SectionRule};
    use std::collections::HashMap;
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    struct MockSourceReader {
        files: HashMap<PathBuf, String>,
        reads: Mutex<Vec<PathBuf>>,
    }

    impl MockSourceReader {
        fn new(files: &[(&str, &str)]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(path, content)| (PathBuf::from(path), content.to_string()))
                    .collect(),
                reads: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SourceReaderPort for MockSourceReader {
        async fn read_source(&self, path: &Path) -> Result<String, SourceReadError> {
            self.reads.lock().unwrap().push(path.to_path_buf());
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| SourceReadError::NotFound(path.display().to_string()))
        }
    }

    struct MockDocumentReader {
        text: Option<String>,
    }

    #[async_trait]
    impl DocumentReaderPort for MockDocumentReader {
        async fn read_document(&self, _path: &Path) -> Result<Option<String>, DocumentReadError> {
            Ok(self.text.clone())
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl ProgressNotifier for RecordingProgress {
        fn on_stage_start(&self, stage: &SyncStage, total_items: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("start {} ({})", stage, total_items));
        }

        fn on_item_complete(&self, stage: &SyncStage, item: &str, success: bool) {
            self.events
                .lock()
                .unwrap()
                .push(format!("item {} {} {}", stage, item, success));
        }

        fn on_stage_complete(&self, stage: &SyncStage) {
            self.events.lock().unwrap().push(format!("done {}", stage));
        }
    }

    fn use_case(
        files: &[(&str, &str)],
        document: Option<&str>,
    ) -> SyncDocsUseCase<MockSourceReader, MockDocumentReader> {
        SyncDocsUseCase::new(
            Arc::new(MockSourceReader::new(files)),
            Arc::new(MockDocumentReader {
                text: document.map(str::to_string),
            }),
        )
    }

    fn input() -> SyncDocsInput {
        SyncDocsInput::new(
            "docs/CONFIGURATION.md",
            SectionMapping::new(vec![SectionRule::new("Redis Configuration", &["REDIS_"])]),
        )
        .with_source(SourceSpec::new(
            "application.properties",
            SourceTag::Environment(Environment::Local),
        ))
        .with_source(SourceSpec::new(".env.example", SourceTag::Template))
    }

    const FILES: [(&str, &str); 2] = [
        ("application.properties", "REDIS_HOST=localhost\n"),
        (".env.example", "REDIS_HOST=\n"),
    ];

    #[test]
    fn test_source_spec_format_inference() {
        let spec = SourceSpec::new("config/.env.example", SourceTag::Template);
        assert_eq!(spec.id, "config/.env.example");
        assert_eq!(spec.resolved_format(), SourceFormat::EnvTemplate);

        let spec = SourceSpec::new("app.conf", SourceTag::Template)
            .with_format(SourceFormat::EnvTemplate)
            .with_id("template");
        assert_eq!(spec.id, "template");
        assert_eq!(spec.resolved_format(), SourceFormat::EnvTemplate);

        let spec = SourceSpec::new(
            "application-prod.properties",
            SourceTag::Environment(Environment::Prod),
        );
        assert_eq!(spec.resolved_format(), SourceFormat::Properties);
    }

    #[tokio::test]
    async fn test_missing_document_bootstraps_new_one() {
        let output = use_case(&FILES, None).execute(input()).await.unwrap();

        assert!(!output.document_existed);
        assert_eq!(output.original, "");
        assert!(output.has_changes());
        assert_eq!(
            output.rendered,
            "## Redis Configuration\n\
\n\
| Name | Type | Required | Description | Example |\n\
|---|---|---|---|---|\n\
| `REDIS_HOST` | string | Yes |  | `localhost` |\n"
        );
        assert_eq!(output.keys.len(), 1);
        assert_eq!(
            output.keys[0].key.origin,
            vec!["application.properties", ".env.example"]
        );
    }

    #[tokio::test]
    async fn test_second_run_on_rendered_output_is_clean() {
        let first = use_case(&FILES, None).execute(input()).await.unwrap();
        let second = use_case(&FILES, Some(&first.rendered))
            .execute(input())
            .await
            .unwrap();

        assert!(second.document_existed);
        assert!(!second.has_changes());
        assert_eq!(second.rendered, first.rendered);
    }

    #[tokio::test]
    async fn test_all_sources_are_read() {
        let case = use_case(&FILES, Some(""));
        case.execute(input()).await.unwrap();

        let mut reads = case.sources.reads.lock().unwrap().clone();
        reads.sort();
        assert_eq!(
            reads,
            vec![
                PathBuf::from(".env.example"),
                PathBuf::from("application.properties")
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_source_fails_run() {
        let result = use_case(&FILES[..1], Some("")).execute(input()).await;
        assert!(matches!(
            result,
            Err(SyncDocsError::SourceRead(SourceReadError::NotFound(path))) if path == ".env.example"
        ));
    }

    #[tokio::test]
    async fn test_malformed_source_is_fatal() {
        let files = [
            ("application.properties", "REDIS_HOST localhost\n"),
            (".env.example", "REDIS_HOST=\n"),
        ];
        let result = use_case(&files, Some("")).execute(input()).await;
        match result {
            Err(SyncDocsError::Domain(error)) => {
                assert!(error.is_fatal());
                match error {
                    DomainError::MalformedSource(error) => {
                        assert_eq!(error.source_id, "application.properties");
                        assert_eq!(error.line, 1);
                    }
                    other => panic!("expected malformed source, got {}", other),
                }
            }
            other => panic!("expected malformed source, got {:?}", other.map(|o| o.rendered)),
        }
    }

    #[tokio::test]
    async fn test_no_sources_is_rejected() {
        let input = SyncDocsInput::new("docs/CONFIGURATION.md", SectionMapping::default());
        let result = use_case(&[], None).execute(input).await;
        assert!(matches!(result, Err(SyncDocsError::NoSources)));
    }

    #[tokio::test]
    async fn test_unterminated_view_is_reported_not_rewritten() {
        let doc = "## Redis Configuration\n\n| Name | Type |\n|---|---|\n| `REDIS_HOST` | string |\n\n<!-- docsync:environments:begin -->\n\n## Operations\n\nImportant hand-written prose.\n";
        let output = use_case(&FILES, Some(doc)).execute(input()).await.unwrap();

        assert_eq!(output.rendered, doc);
        assert!(!output.has_changes());
        let errors = output.change_set.review_errors();
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], DomainError::UnterminatedView(view) if view.line == 7));
    }

    #[tokio::test]
    async fn test_progress_reports_every_stage() {
        let progress = RecordingProgress::default();
        use_case(&FILES, Some(""))
            .execute_with_progress(input(), &progress)
            .await
            .unwrap();

        let events = progress.events.lock().unwrap();
        for expected in [
            "start load sources (2)",
            "item load sources application.properties true",
            "item load sources .env.example true",
            "done load sources",
            "start parse document (1)",
            "done parse document",
            "done classify",
            "done reconcile",
            "done render",
        ] {
            assert!(events.iter().any(|e| e == expected), "missing {expected}");
        }
        assert_eq!(events.last().map(String::as_str), Some("done render"));
    }
}
