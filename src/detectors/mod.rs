// WHY: Each rule is an independent pure function over the immutable document;
// detectors return their own findings instead of appending to shared state

use std::sync::Arc;

use crate::document::{AnnotatedDocument, Token};
use crate::error::DetectorError;
use crate::finding::{Finding, Flag, Rule};

pub mod dialogue;
pub mod narrative;

pub use dialogue::{
    ClauseBoundaryComma, ComplexPunctuation, DialogueSpan, DialogueSpeech, QuotationComma,
    SimpleSentenceFinalPunctuation, SubordinatorMarker,
};
pub use narrative::{
    DateComma, EntityCapitalization, IntroductoryClauseComma, ListConjunctionComma,
    PossessiveApostrophe, SentenceFinalPunctuation,
};

/// Output of one detector over one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detection {
    /// Findings in emission order
    pub findings: Vec<Finding>,
    /// Sites that could not be evaluated; never mixed into `findings`
    pub suppressed: Vec<DetectorError>,
}

impl Detection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: Result<Finding, DetectorError>) {
        match result {
            Ok(finding) => self.findings.push(finding),
            Err(error) => self.suppressed.push(error),
        }
    }
}

/// One rule check over an annotated document
pub trait Detector: Send + Sync {
    fn rule(&self) -> Rule;

    fn detect(&self, doc: &AnnotatedDocument) -> Detection;
}

/// Default detector implementing `rule`
pub fn detector_for(rule: Rule) -> Arc<dyn Detector> {
    match rule {
        Rule::ProperNounCapitalization => Arc::new(EntityCapitalization::proper_nouns()),
        Rule::KeyEventCapitalization => Arc::new(EntityCapitalization::key_events()),
        Rule::PossessiveApostrophe => Arc::new(PossessiveApostrophe),
        Rule::SentenceFinalPunctuation => Arc::new(SentenceFinalPunctuation),
        Rule::ListConjunctionComma => Arc::new(ListConjunctionComma),
        Rule::DateComma => Arc::new(DateComma),
        Rule::IntroductoryClauseComma => Arc::new(IntroductoryClauseComma),
        Rule::QuotationComma => Arc::new(QuotationComma),
        Rule::DialogueSpan => Arc::new(DialogueSpan),
        Rule::ClauseBoundaryComma => Arc::new(ClauseBoundaryComma),
        Rule::SubordinatorMarker => Arc::new(SubordinatorMarker),
        Rule::SimpleSentenceFinalPunctuation => Arc::new(SimpleSentenceFinalPunctuation),
        Rule::ComplexPunctuation => Arc::new(ComplexPunctuation),
        Rule::DialogueSpeech => Arc::new(DialogueSpeech),
    }
}

pub(crate) fn span_finding(
    doc: &AnnotatedDocument,
    rule: Rule,
    start: usize,
    end: usize,
    flag: Flag,
) -> Result<Finding, DetectorError> {
    Finding::within(rule, start, end, flag, doc.char_len())
}

pub(crate) fn token_finding(
    doc: &AnnotatedDocument,
    rule: Rule,
    token: &Token,
    flag: Flag,
) -> Result<Finding, DetectorError> {
    span_finding(doc, rule, token.start, token.end, flag)
}

/// Sentence-ending marks
pub(crate) fn is_terminal_mark(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Title case: every cased run starts with an uppercase letter followed only by
/// lowercase letters, and at least one cased letter exists
///
/// "New York" and "Fourth Of July" qualify; "sarah", "McDonald" and "NASA" do not.
pub fn is_title_case(text: &str) -> bool {
    let mut seen_cased = false;
    let mut previous_cased = false;

    for c in text.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            seen_cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            seen_cased = true;
        } else {
            previous_cased = false;
        }
    }

    seen_cased
}

/// Pairs every token with whether a straight-quoted passage is open after it is read
/// WHY: The quote token toggles state before it is evaluated, so an opening quote
/// counts as inside and a closing quote as outside
pub(crate) fn with_quote_state<'a>(tokens: &'a [Token]) -> impl Iterator<Item = (&'a Token, bool)> + 'a {
    tokens.iter().scan(false, |open, token| {
        if matches!(token.text.as_str(), "\"" | "'") {
            *open = !*open;
        }
        Some((token, *open))
    })
}
