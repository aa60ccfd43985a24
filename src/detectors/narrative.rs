// WHY: Narrative conventions: capitalization, possessives, sentence ends and commas
// in lists, dates and after introductory clauses

use tracing::debug;

use super::{is_terminal_mark, is_title_case, span_finding, token_finding, Detection, Detector};
use crate::document::{AnnotatedDocument, Dep, EntityLabel, Pos};
use crate::error::DetectorError;
use crate::finding::{Flag, Rule};

const CLOSING_DOUBLE_QUOTE: char = '\u{201D}';
const POSSESSIVE_MARKER: &str = "\u{2019}s";
const PLURAL_POSSESSIVE: &str = "s\u{2019}";

/// Entities of the given labels must be title-cased
#[derive(Debug, Clone)]
pub struct EntityCapitalization {
    rule: Rule,
    labels: &'static [EntityLabel],
}

impl EntityCapitalization {
    /// People, organizations and geopolitical entities
    pub fn proper_nouns() -> Self {
        Self {
            rule: Rule::ProperNounCapitalization,
            labels: &[EntityLabel::Person, EntityLabel::Org, EntityLabel::Gpe],
        }
    }

    /// Named events such as holidays
    pub fn key_events() -> Self {
        Self {
            rule: Rule::KeyEventCapitalization,
            labels: &[EntityLabel::Event],
        }
    }
}

impl Detector for EntityCapitalization {
    fn rule(&self) -> Rule {
        self.rule
    }

    fn detect(&self, doc: &AnnotatedDocument) -> Detection {
        let mut detection = Detection::new();
        for entity in doc.entities().iter().filter(|e| self.labels.contains(&e.label)) {
            let flag = Flag::from_check(is_title_case(&entity.text));
            detection.record(span_finding(doc, self.rule, entity.start_char, entity.end_char, flag));
        }
        detection
    }
}

/// Heads of possessive modifiers carrying a typographic `’s` must end in `’s` or `s’`
/// Straight apostrophes are out of scope and produce no finding
#[derive(Debug, Clone, Copy, Default)]
pub struct PossessiveApostrophe;

impl Detector for PossessiveApostrophe {
    fn rule(&self) -> Rule {
        Rule::PossessiveApostrophe
    }

    fn detect(&self, doc: &AnnotatedDocument) -> Detection {
        let mut detection = Detection::new();
        for token in doc.tokens().iter().filter(|t| t.dep == Dep::Poss) {
            let head = doc.head(token);
            if !head.text.contains(POSSESSIVE_MARKER) {
                continue;
            }
            let flag = Flag::from_check(
                head.text.ends_with(POSSESSIVE_MARKER) || head.text.ends_with(PLURAL_POSSESSIVE),
            );
            detection.record(token_finding(doc, self.rule(), head, flag));
        }
        detection
    }
}

/// Every sentence ends in `.`, `!` or `?`, looking behind a closing `”`
#[derive(Debug, Clone, Copy, Default)]
pub struct SentenceFinalPunctuation;

impl Detector for SentenceFinalPunctuation {
    fn rule(&self) -> Rule {
        Rule::SentenceFinalPunctuation
    }

    fn detect(&self, doc: &AnnotatedDocument) -> Detection {
        let rule = self.rule();
        let mut detection = Detection::new();

        for sentence in doc.sentences() {
            if sentence.is_empty() {
                detection.record(Err(DetectorError::MalformedInput {
                    rule,
                    reason: format!("sentence {} has no characters to inspect", sentence.index),
                }));
                continue;
            }

            let end = sentence.end_char;
            let last = doc.char_at(end - 1);
            let result = if last == Some(CLOSING_DOUBLE_QUOTE) {
                // WHY: segmenters often leave the terminal mark just inside the closing quote
                if end - sentence.start_char < 2 {
                    Err(DetectorError::OutOfRange {
                        rule,
                        position: end as isize - 2,
                        start: sentence.start_char,
                        end,
                    })
                } else {
                    let before_quote = doc.char_at(end - 2);
                    let flag = Flag::from_check(before_quote.is_some_and(is_terminal_mark));
                    span_finding(doc, rule, end - 2, end, flag)
                }
            } else {
                let flag = Flag::from_check(last.is_some_and(is_terminal_mark));
                span_finding(doc, rule, end - 1, end, flag)
            };
            detection.record(result);
        }

        detection
    }
}

/// The token two positions before a list conjunction must be a comma
#[derive(Debug, Clone, Copy, Default)]
pub struct ListConjunctionComma;

impl Detector for ListConjunctionComma {
    fn rule(&self) -> Rule {
        Rule::ListConjunctionComma
    }

    fn detect(&self, doc: &AnnotatedDocument) -> Detection {
        let mut detection = Detection::new();
        let tokens = doc.tokens();

        for token in tokens.iter().filter(|t| t.dep == Dep::Cc) {
            let conjunction = token.text.to_lowercase();
            if conjunction != "and" && conjunction != "or" {
                continue;
            }

            let result = match token.index.checked_sub(2).map(|i| &tokens[i]) {
                Some(item) => token_finding(doc, self.rule(), item, Flag::from_check(item.text == ",")),
                None => {
                    // No room for a preceding list item and comma: fail on the conjunction
                    debug!(index = token.index, "List conjunction too close to document start");
                    token_finding(doc, self.rule(), token, Flag::Fail)
                }
            };
            detection.record(result);
        }

        detection
    }
}

/// DATE entities should contain a comma, e.g. "July 4, 2021"
#[derive(Debug, Clone, Copy, Default)]
pub struct DateComma;

impl Detector for DateComma {
    fn rule(&self) -> Rule {
        Rule::DateComma
    }

    fn detect(&self, doc: &AnnotatedDocument) -> Detection {
        let rule = self.rule();
        let mut detection = Detection::new();

        for entity in doc.entities().iter().filter(|e| e.label == EntityLabel::Date) {
            if entity.start_char >= entity.end_char {
                detection.record(Err(DetectorError::MalformedInput {
                    rule,
                    reason: format!("empty DATE entity at {}", entity.start_char),
                }));
                continue;
            }

            let result = match entity.text.chars().position(|c| c == ',') {
                Some(offset) => {
                    let comma = entity.start_char + offset;
                    span_finding(doc, rule, comma, comma + 1, Flag::Pass)
                }
                None => span_finding(doc, rule, entity.end_char - 1, entity.end_char, Flag::Fail),
            };
            detection.record(result);
        }

        detection
    }
}

/// An adverbial clause attached to a verb must be followed by a comma
#[derive(Debug, Clone, Copy, Default)]
pub struct IntroductoryClauseComma;

impl Detector for IntroductoryClauseComma {
    fn rule(&self) -> Rule {
        Rule::IntroductoryClauseComma
    }

    fn detect(&self, doc: &AnnotatedDocument) -> Detection {
        let mut detection = Detection::new();

        for token in doc.tokens() {
            if token.dep != Dep::Advcl || doc.head(token).pos != Pos::Verb {
                continue;
            }
            let result = match doc.token(token.index + 1) {
                Some(next) if next.text == "," => token_finding(doc, self.rule(), next, Flag::Pass),
                _ => token_finding(doc, self.rule(), token, Flag::Fail),
            };
            detection.record(result);
        }

        detection
    }
}
