// WHY: Dialogue and clause conventions; several detectors here are markers that
// surface locations and never fail

use super::{is_terminal_mark, span_finding, token_finding, with_quote_state, Detection, Detector};
use crate::document::{AnnotatedDocument, Dep, Pos};
use crate::error::DetectorError;
use crate::finding::{Flag, Rule};

/// Outside quotations, each token should follow a comma
/// The first token has nothing before it and fails by convention
#[derive(Debug, Clone, Copy, Default)]
pub struct QuotationComma;

impl Detector for QuotationComma {
    fn rule(&self) -> Rule {
        Rule::QuotationComma
    }

    fn detect(&self, doc: &AnnotatedDocument) -> Detection {
        let mut detection = Detection::new();
        let tokens = doc.tokens();

        for (token, open) in with_quote_state(tokens) {
            if open {
                continue;
            }
            let result = match token.index.checked_sub(1).map(|i| &tokens[i]) {
                Some(previous) => {
                    token_finding(doc, self.rule(), previous, Flag::from_check(previous.text == ","))
                }
                None => token_finding(doc, self.rule(), token, Flag::Fail),
            };
            detection.record(result);
        }

        detection
    }
}

/// Marks every token inside a quotation
#[derive(Debug, Clone, Copy, Default)]
pub struct DialogueSpan;

impl Detector for DialogueSpan {
    fn rule(&self) -> Rule {
        Rule::DialogueSpan
    }

    fn detect(&self, doc: &AnnotatedDocument) -> Detection {
        let mut detection = Detection::new();
        for (token, _) in with_quote_state(doc.tokens()).filter(|(_, open)| *open) {
            detection.record(token_finding(doc, self.rule(), token, Flag::Pass));
        }
        detection
    }
}

/// Adverbial and relative clauses should be set off by a comma among their children
#[derive(Debug, Clone, Copy, Default)]
pub struct ClauseBoundaryComma;

impl Detector for ClauseBoundaryComma {
    fn rule(&self) -> Rule {
        Rule::ClauseBoundaryComma
    }

    fn detect(&self, doc: &AnnotatedDocument) -> Detection {
        let rule = self.rule();
        let mut detection = Detection::new();

        for clause in doc.tokens().iter().filter(|t| matches!(t.dep, Dep::Advcl | Dep::Relcl)) {
            let mut comma_found = false;
            for comma in doc.children(clause).filter(|child| child.text == ",") {
                comma_found = true;
                detection.record(token_finding(doc, rule, comma, Flag::Pass));
            }
            if !comma_found {
                detection.record(token_finding(doc, rule, clause, Flag::Fail));
            }
        }

        detection
    }
}

/// Marks subordinating conjunctions that introduce an adverbial clause
#[derive(Debug, Clone, Copy, Default)]
pub struct SubordinatorMarker;

impl Detector for SubordinatorMarker {
    fn rule(&self) -> Rule {
        Rule::SubordinatorMarker
    }

    fn detect(&self, doc: &AnnotatedDocument) -> Detection {
        let mut detection = Detection::new();
        for token in doc.tokens() {
            if token.dep == Dep::Mark && doc.head(token).dep == Dep::Advcl {
                detection.record(token_finding(doc, self.rule(), token, Flag::Pass));
            }
        }
        detection
    }
}

/// Marks verbs and pronouns spoken inside a quotation
#[derive(Debug, Clone, Copy, Default)]
pub struct DialogueSpeech;

impl Detector for DialogueSpeech {
    fn rule(&self) -> Rule {
        Rule::DialogueSpeech
    }

    fn detect(&self, doc: &AnnotatedDocument) -> Detection {
        let mut detection = Detection::new();
        for (token, open) in with_quote_state(doc.tokens()) {
            if open && matches!(token.pos, Pos::Verb | Pos::Pron) {
                detection.record(token_finding(doc, self.rule(), token, Flag::Pass));
            }
        }
        detection
    }
}

/// Last token of each sentence must be `.`, `!` or `?`; no quote lookback
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleSentenceFinalPunctuation;

impl Detector for SimpleSentenceFinalPunctuation {
    fn rule(&self) -> Rule {
        Rule::SimpleSentenceFinalPunctuation
    }

    fn detect(&self, doc: &AnnotatedDocument) -> Detection {
        let rule = self.rule();
        let mut detection = Detection::new();

        for sentence in doc.sentences() {
            let Some(last) = doc.sentence_tokens(sentence).last() else {
                detection.record(Err(DetectorError::MalformedInput {
                    rule,
                    reason: format!("sentence {} has no tokens", sentence.index),
                }));
                continue;
            };

            let mut chars = last.text.chars();
            let terminal = matches!((chars.next(), chars.next()), (Some(c), None) if is_terminal_mark(c));
            detection.record(span_finding(
                doc,
                rule,
                sentence.end_char.saturating_sub(1),
                sentence.end_char,
                Flag::from_check(terminal),
            ));
        }

        detection
    }
}

/// Marks colons, semicolons and double hyphens
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplexPunctuation;

impl Detector for ComplexPunctuation {
    fn rule(&self) -> Rule {
        Rule::ComplexPunctuation
    }

    fn detect(&self, doc: &AnnotatedDocument) -> Detection {
        let mut detection = Detection::new();
        for token in doc.tokens() {
            if matches!(token.text.as_str(), ":" | ";" | "--") {
                detection.record(token_finding(doc, self.rule(), token, Flag::Pass));
            }
        }
        detection
    }
}
