//! Error types for the annotation boundary and for individual detectors.

use thiserror::Error;

use crate::finding::Rule;

/// A detector could not evaluate one site. Always recoverable: the site is skipped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectorError {
    #[error("rule {rule}: malformed input: {reason}")]
    MalformedInput { rule: Rule, reason: String },
    #[error("rule {rule}: position {position} is outside {start}..{end}")]
    OutOfRange {
        rule: Rule,
        position: isize,
        start: usize,
        end: usize,
    },
}

impl DetectorError {
    pub fn rule(&self) -> Rule {
        match self {
            DetectorError::MalformedInput { rule, .. } | DetectorError::OutOfRange { rule, .. } => *rule,
        }
    }
}

/// An annotated document violates the data model and was rejected before detection
#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("unknown {kind} label: {value:?}")]
    UnknownLabel { kind: &'static str, value: String },
    #[error("{what} span {start}..{end} is outside text of {len} chars")]
    SpanOutOfBounds {
        what: &'static str,
        start: usize,
        end: usize,
        len: usize,
    },
    #[error("token {token} has head {head} but the document has {count} tokens")]
    HeadOutOfRange { token: usize, head: usize, count: usize },
    #[error("tokens out of order at token {0}")]
    TokensOutOfOrder(usize),
    #[error("sentence {0} overlaps or precedes the previous sentence")]
    SentencesOutOfOrder(usize),
    #[error("invalid annotation JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("annotator returned a document for different text")]
    TextMismatch,
    #[error("annotator failed: {0}")]
    Annotator(String),
    #[error("failed to run annotator: {0}")]
    Io(#[from] std::io::Error),
}
