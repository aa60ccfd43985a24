// WHY: The annotation model lives outside this crate; this module is the boundary where
// its output is parsed, label strings become enums and every span is validated

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, info};

use crate::document::{AnnotatedDocument, CharSpan, EntitySpec, TokenSpec};
use crate::error::AnnotationError;

/// Produces an annotated document for raw text
pub trait AnnotationProvider {
    fn annotate(&self, text: &str) -> Result<AnnotatedDocument, AnnotationError>;
}

/// Annotated document in the layout of spaCy's `Doc.to_json()`, char offsets throughout
/// Fields beyond the ones listed here (lemma, tag, morph, ...) are ignored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    pub text: String,
    #[serde(default)]
    pub tokens: Vec<RawToken>,
    #[serde(default)]
    pub sents: Vec<RawSpan>,
    #[serde(default)]
    pub ents: Vec<RawEntity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawToken {
    #[serde(default)]
    pub id: Option<usize>,
    pub start: usize,
    pub end: usize,
    pub pos: String,
    pub dep: String,
    pub head: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawSpan {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEntity {
    pub start: usize,
    pub end: usize,
    pub label: String,
}

impl RawDocument {
    /// Parse labels and validate every invariant of the document model
    pub fn into_document(self) -> Result<AnnotatedDocument, AnnotationError> {
        let mut tokens = Vec::with_capacity(self.tokens.len());
        for (index, raw) in self.tokens.into_iter().enumerate() {
            if raw.id.is_some_and(|id| id != index) {
                return Err(AnnotationError::TokensOutOfOrder(index));
            }
            tokens.push(TokenSpec {
                span: CharSpan::new(raw.start, raw.end),
                pos: raw.pos.parse()?,
                dep: raw.dep.parse()?,
                head: raw.head,
            });
        }

        let sentences = self
            .sents
            .into_iter()
            .map(|s| CharSpan::new(s.start, s.end))
            .collect();

        let entities = self
            .ents
            .into_iter()
            .map(|e| {
                Ok(EntitySpec {
                    label: e.label.parse()?,
                    span: CharSpan::new(e.start, e.end),
                })
            })
            .collect::<Result<Vec<_>, AnnotationError>>()?;

        AnnotatedDocument::new(self.text, tokens, sentences, entities)
    }
}

/// Parse one JSON annotated document
pub fn parse_document(json: &str) -> Result<AnnotatedDocument, AnnotationError> {
    let raw: RawDocument = serde_json::from_str(json)?;
    raw.into_document()
}

/// Runs an external annotator: raw text on stdin, one JSON document on stdout
#[derive(Debug, Clone)]
pub struct CommandAnnotator {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandAnnotator {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl AnnotationProvider for CommandAnnotator {
    fn annotate(&self, text: &str) -> Result<AnnotatedDocument, AnnotationError> {
        debug!(program = %self.program.display(), chars = text.chars().count(), "Invoking annotator");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // WHY: feed stdin from a separate thread so a chatty annotator cannot deadlock on a full pipe
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| AnnotationError::Annotator("annotator stdin unavailable".to_string()))?;
        let input = text.to_string();
        let writer = std::thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output()?;
        // A child that exits without reading stdin breaks the pipe; its exit status decides
        match writer.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!(program = %self.program.display(), error = %e, "Annotator stopped reading stdin"),
            Err(_) => debug!(program = %self.program.display(), "Annotator stdin writer panicked"),
        }

        if !output.status.success() {
            return Err(AnnotationError::Annotator(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let raw: RawDocument = serde_json::from_slice(&output.stdout)?;
        if raw.text != text {
            return Err(AnnotationError::TextMismatch);
        }
        let doc = raw.into_document()?;
        info!(tokens = doc.tokens().len(), sentences = doc.sentences().len(), "Annotator finished");
        Ok(doc)
    }
}
