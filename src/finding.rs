// WHY: Findings are the only output of the detector engine; every span is validated
// against the document length at construction so no out-of-bounds span can escape

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DetectorError;

/// Rule families, each backed by its own default pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleFamily {
    /// Capitalization, possessives, sentence ends, list/date/clause commas
    Narrative,
    /// Quoted dialogue, clause boundaries and complex punctuation
    Dialogue,
}

impl RuleFamily {
    /// Rules of this family in registration order
    pub fn rules(self) -> &'static [Rule] {
        match self {
            RuleFamily::Narrative => &[
                Rule::ProperNounCapitalization,
                Rule::KeyEventCapitalization,
                Rule::PossessiveApostrophe,
                Rule::SentenceFinalPunctuation,
                Rule::ListConjunctionComma,
                Rule::DateComma,
                Rule::IntroductoryClauseComma,
            ],
            RuleFamily::Dialogue => &[
                Rule::QuotationComma,
                Rule::DialogueSpan,
                Rule::ClauseBoundaryComma,
                Rule::SubordinatorMarker,
                Rule::DialogueSpeech,
                Rule::SimpleSentenceFinalPunctuation,
                Rule::ComplexPunctuation,
            ],
        }
    }
}

/// Stable identifier of every detector
/// WHY: Serialized as its small integer id so downstream consumers keep a compact format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Rule {
    ProperNounCapitalization = 1,
    KeyEventCapitalization = 2,
    PossessiveApostrophe = 3,
    SentenceFinalPunctuation = 4,
    ListConjunctionComma = 5,
    DateComma = 6,
    IntroductoryClauseComma = 7,
    QuotationComma = 8,
    DialogueSpan = 9,
    ClauseBoundaryComma = 10,
    SubordinatorMarker = 11,
    SimpleSentenceFinalPunctuation = 12,
    ComplexPunctuation = 13,
    DialogueSpeech = 14,
}

impl Rule {
    pub const ALL: [Rule; 14] = [
        Rule::ProperNounCapitalization,
        Rule::KeyEventCapitalization,
        Rule::PossessiveApostrophe,
        Rule::SentenceFinalPunctuation,
        Rule::ListConjunctionComma,
        Rule::DateComma,
        Rule::IntroductoryClauseComma,
        Rule::QuotationComma,
        Rule::DialogueSpan,
        Rule::ClauseBoundaryComma,
        Rule::SubordinatorMarker,
        Rule::SimpleSentenceFinalPunctuation,
        Rule::ComplexPunctuation,
        Rule::DialogueSpeech,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Rule> {
        Rule::ALL.iter().copied().find(|rule| rule.id() == id)
    }

    pub fn family(self) -> RuleFamily {
        if self.id() <= Rule::IntroductoryClauseComma.id() {
            RuleFamily::Narrative
        } else {
            RuleFamily::Dialogue
        }
    }

    /// Marker rules surface locations and can never fail
    pub fn is_marker(self) -> bool {
        matches!(
            self,
            Rule::DialogueSpan | Rule::SubordinatorMarker | Rule::ComplexPunctuation | Rule::DialogueSpeech
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Rule::ProperNounCapitalization => "proper-noun-capitalization",
            Rule::KeyEventCapitalization => "key-event-capitalization",
            Rule::PossessiveApostrophe => "possessive-apostrophe",
            Rule::SentenceFinalPunctuation => "sentence-final-punctuation",
            Rule::ListConjunctionComma => "list-conjunction-comma",
            Rule::DateComma => "date-comma",
            Rule::IntroductoryClauseComma => "introductory-clause-comma",
            Rule::QuotationComma => "quotation-comma",
            Rule::DialogueSpan => "dialogue-span",
            Rule::ClauseBoundaryComma => "clause-boundary-comma",
            Rule::SubordinatorMarker => "subordinator-marker",
            Rule::SimpleSentenceFinalPunctuation => "simple-sentence-final-punctuation",
            Rule::ComplexPunctuation => "complex-punctuation",
            Rule::DialogueSpeech => "dialogue-speech",
        }
    }
}

impl From<Rule> for u8 {
    fn from(rule: Rule) -> Self {
        rule.id()
    }
}

impl TryFrom<u8> for Rule {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Rule::from_id(id).ok_or_else(|| format!("unknown rule id {id}"))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Outcome of one convention check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Flag {
    /// Convention followed
    Pass,
    /// Convention violated
    Fail,
}

impl Flag {
    pub fn from_check(holds: bool) -> Self {
        if holds {
            Flag::Pass
        } else {
            Flag::Fail
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flag::Pass => write!(f, "PASS"),
            Flag::Fail => write!(f, "FAIL"),
        }
    }
}

/// One flagged span, in char offsets of the annotated text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "rule_id")]
    pub rule: Rule,
    pub start: usize,
    pub end: usize,
    pub flag: Flag,
}

impl Finding {
    /// Build a finding whose span must satisfy `start < end <= text_len`
    pub fn within(
        rule: Rule,
        start: usize,
        end: usize,
        flag: Flag,
        text_len: usize,
    ) -> Result<Self, DetectorError> {
        if end > text_len {
            return Err(DetectorError::OutOfRange {
                rule,
                position: end as isize,
                start: 0,
                end: text_len,
            });
        }
        if start >= end {
            return Err(DetectorError::MalformedInput {
                rule,
                reason: format!("empty span {start}..{end}"),
            });
        }
        Ok(Self { rule, start, end, flag })
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
