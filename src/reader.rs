use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::annotation::{parse_document, AnnotationProvider};
use crate::document::AnnotatedDocument;

/// Configuration for document loading behavior
#[derive(Debug, Clone, Default)]
pub struct ReaderConfig {
    /// Whether to fail fast on first error or continue processing
    pub fail_fast: bool,
}

/// Statistics for one document load
#[derive(Debug, Clone)]
pub struct ReadStats {
    pub file_path: String,
    pub chars_read: u64,
    pub duration_ms: u64,
    pub read_error: Option<String>,
}

/// Loads annotated documents from disk
///
/// `.json` files are parsed as annotated documents; anything else is treated as raw
/// text and handed to the configured annotator.
pub struct DocumentReader {
    config: ReaderConfig,
    annotator: Option<Arc<dyn AnnotationProvider + Send + Sync>>,
}

impl DocumentReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self {
            config,
            annotator: None,
        }
    }

    pub fn with_annotator(mut self, annotator: Arc<dyn AnnotationProvider + Send + Sync>) -> Self {
        self.annotator = Some(annotator);
        self
    }

    /// Load one document; on failure returns `None` plus the error in the stats,
    /// or an error when fail-fast is set
    pub async fn read_document<P: AsRef<Path>>(&self, path: P) -> Result<(Option<AnnotatedDocument>, ReadStats)> {
        let path = path.as_ref();
        let start_time = std::time::Instant::now();
        debug!("Loading document: {}", path.display());

        let loaded = self.load(path).await;
        let duration_ms = start_time.elapsed().as_millis() as u64;

        match loaded {
            Ok(doc) => {
                let stats = ReadStats {
                    file_path: path.display().to_string(),
                    chars_read: doc.char_len() as u64,
                    duration_ms,
                    read_error: None,
                };
                Ok((Some(doc), stats))
            }
            Err(e) => {
                let error_msg = format!("{e:#}");
                warn!("Failed to load {}: {}", path.display(), error_msg);
                if self.config.fail_fast {
                    return Err(e);
                }
                let stats = ReadStats {
                    file_path: path.display().to_string(),
                    chars_read: 0,
                    duration_ms,
                    read_error: Some(error_msg),
                };
                Ok((None, stats))
            }
        }
    }

    async fn load(&self, path: &Path) -> Result<AnnotatedDocument> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let is_annotated = path.extension().is_some_and(|ext| ext == "json");
        if is_annotated {
            return parse_document(&content).with_context(|| format!("Invalid annotated document {}", path.display()));
        }

        let annotator = self
            .annotator
            .clone()
            .with_context(|| format!("{} is raw text and no annotator is configured", path.display()))?;

        // WHY: annotators are blocking processes; keep them off the async workers
        let doc = tokio::task::spawn_blocking(move || annotator.annotate(&content))
            .await
            .context("Annotator task failed")?
            .with_context(|| format!("Failed to annotate {}", path.display()))?;
        Ok(doc)
    }
}
