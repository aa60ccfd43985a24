// WHY: In-process annotators (and tests) assemble documents token by token
// without computing char offsets by hand

use std::ops::Range;

use super::{AnnotatedDocument, CharSpan, Dep, EntityLabel, EntitySpec, Pos, TokenSpec};
use crate::error::AnnotationError;

/// Incrementally builds text plus annotations
///
/// ```
/// use punctmark::document::{DocumentBuilder, Dep, EntityLabel, Pos};
///
/// let doc = DocumentBuilder::new()
///     .token("Sarah", Pos::Propn, Dep::Nsubj, 1)
///     .token("laughed", Pos::Verb, Dep::Root, 1)
///     .attached(".", Pos::Punct, Dep::Punct, 1)
///     .entity(EntityLabel::Person, 0..1)
///     .build()
///     .unwrap();
/// assert_eq!(doc.text(), "Sarah laughed.");
/// ```
#[derive(Debug, Default, Clone)]
pub struct DocumentBuilder {
    text: String,
    char_len: usize,
    tokens: Vec<TokenSpec>,
    sentences: Vec<CharSpan>,
    sentence_start: Option<usize>,
    entities: Vec<(EntityLabel, Range<usize>)>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token separated from the previous one by a single space
    pub fn token(self, text: &str, pos: Pos, dep: Dep, head: usize) -> Self {
        let separator = if self.char_len == 0 { "" } else { " " };
        self.push(separator, text, pos, dep, head)
    }

    /// Append a token directly after the previous one, e.g. punctuation
    pub fn attached(self, text: &str, pos: Pos, dep: Dep, head: usize) -> Self {
        self.push("", text, pos, dep, head)
    }

    /// Close the current sentence after the last appended token
    pub fn end_sentence(mut self) -> Self {
        let start = self.sentence_start.take().unwrap_or(self.char_len);
        self.sentences.push(CharSpan::new(start, self.char_len));
        self
    }

    /// Label the tokens in `tokens` (half-open token index range) as one entity
    pub fn entity(mut self, label: EntityLabel, tokens: Range<usize>) -> Self {
        self.entities.push((label, tokens));
        self
    }

    pub fn build(mut self) -> Result<AnnotatedDocument, AnnotationError> {
        if self.sentence_start.is_some() {
            self = self.end_sentence();
        }

        let count = self.tokens.len();
        let mut entities = Vec::with_capacity(self.entities.len());
        for (label, range) in self.entities {
            if range.start >= range.end || range.end > count {
                return Err(AnnotationError::SpanOutOfBounds {
                    what: "entity token",
                    start: range.start,
                    end: range.end,
                    len: count,
                });
            }
            entities.push(EntitySpec {
                label,
                span: CharSpan::new(self.tokens[range.start].span.start, self.tokens[range.end - 1].span.end),
            });
        }

        AnnotatedDocument::new(self.text, self.tokens, self.sentences, entities)
    }

    fn push(mut self, separator: &str, text: &str, pos: Pos, dep: Dep, head: usize) -> Self {
        self.text.push_str(separator);
        self.char_len += separator.chars().count();
        let start = self.char_len;
        self.text.push_str(text);
        self.char_len += text.chars().count();

        self.sentence_start.get_or_insert(start);
        self.tokens.push(TokenSpec {
            span: CharSpan::new(start, self.char_len),
            pos,
            dep,
            head,
        });
        self
    }
}
