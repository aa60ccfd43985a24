// WHY: Immutable snapshot of one annotated text; every detector reads the same instance
// All offsets are 0-based char (Unicode scalar) positions, never bytes

use std::ops::Range;

use crate::error::AnnotationError;

pub mod builder;
pub mod labels;

pub use builder::DocumentBuilder;
pub use labels::{Dep, EntityLabel, Pos};

/// Char span `[start, end)` as handed over by an annotator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharSpan {
    pub start: usize,
    pub end: usize,
}

impl CharSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Token annotation before validation; its text is taken from the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpec {
    pub span: CharSpan,
    pub pos: Pos,
    pub dep: Dep,
    pub head: usize,
}

/// Entity annotation before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpec {
    pub label: EntityLabel,
    pub span: CharSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub pos: Pos,
    pub dep: Dep,
    /// Index of the syntactic head; equals `index` for a sentence root
    pub head: usize,
    children: Vec<usize>,
}

impl Token {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_root(&self) -> bool {
        self.head == self.index
    }

    pub fn child_indices(&self) -> &[usize] {
        &self.children
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub index: usize,
    pub start_char: usize,
    /// One past the last char of the last token
    pub end_char: usize,
    tokens: Range<usize>,
}

impl Sentence {
    pub fn token_range(&self) -> Range<usize> {
        self.tokens.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() || self.start_char >= self.end_char
    }

    /// Raw sentence text, borrowed from the document
    pub fn text<'d>(&self, doc: &'d AnnotatedDocument) -> &'d str {
        doc.slice(self.start_char, self.end_char)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub label: EntityLabel,
    pub start_char: usize,
    pub end_char: usize,
    pub text: String,
}

/// Tokens, sentences and entities over one shared text buffer
#[derive(Debug, Clone)]
pub struct AnnotatedDocument {
    text: String,
    /// Byte offset of every char plus a trailing `text.len()`
    char_bytes: Vec<usize>,
    tokens: Vec<Token>,
    sentences: Vec<Sentence>,
    entities: Vec<Entity>,
}

impl AnnotatedDocument {
    /// Validate annotations against the text and assemble the document
    ///
    /// With no sentence spans, all tokens form a single sentence.
    pub fn new(
        text: impl Into<String>,
        tokens: Vec<TokenSpec>,
        sentence_spans: Vec<CharSpan>,
        entity_specs: Vec<EntitySpec>,
    ) -> Result<Self, AnnotationError> {
        let text = text.into();
        let mut char_bytes: Vec<usize> = text.char_indices().map(|(byte, _)| byte).collect();
        char_bytes.push(text.len());
        let char_len = char_bytes.len() - 1;

        let mut doc = Self {
            text,
            char_bytes,
            tokens: Vec::with_capacity(tokens.len()),
            sentences: Vec::new(),
            entities: Vec::with_capacity(entity_specs.len()),
        };

        let count = tokens.len();
        let mut previous_end = 0;
        for (index, spec) in tokens.into_iter().enumerate() {
            check_span("token", spec.span, char_len)?;
            if spec.span.start < previous_end {
                return Err(AnnotationError::TokensOutOfOrder(index));
            }
            if spec.head >= count {
                return Err(AnnotationError::HeadOutOfRange {
                    token: index,
                    head: spec.head,
                    count,
                });
            }
            previous_end = spec.span.end;
            doc.tokens.push(Token {
                index,
                start: spec.span.start,
                end: spec.span.end,
                text: doc.slice(spec.span.start, spec.span.end).to_string(),
                pos: spec.pos,
                dep: spec.dep,
                head: spec.head,
                children: Vec::new(),
            });
        }

        for index in 0..doc.tokens.len() {
            let head = doc.tokens[index].head;
            if head != index {
                doc.tokens[head].children.push(index);
            }
        }

        let sentence_spans = if sentence_spans.is_empty() && !doc.tokens.is_empty() {
            vec![CharSpan::new(doc.tokens[0].start, previous_end)]
        } else {
            sentence_spans
        };

        let mut previous_end = 0;
        for (index, span) in sentence_spans.into_iter().enumerate() {
            check_span("sentence", span, char_len)?;
            if span.start < previous_end {
                return Err(AnnotationError::SentencesOutOfOrder(index));
            }
            previous_end = span.end;

            let first = doc.tokens.partition_point(|t| t.start < span.start);
            let last = doc.tokens.partition_point(|t| t.start < span.end);
            let (start_char, end_char) = if first < last {
                (doc.tokens[first].start, doc.tokens[last - 1].end)
            } else {
                (span.start, span.end)
            };
            doc.sentences.push(Sentence {
                index,
                start_char,
                end_char,
                tokens: first..last,
            });
        }

        for spec in entity_specs {
            check_span("entity", spec.span, char_len)?;
            doc.entities.push(Entity {
                label: spec.label,
                start_char: spec.span.start,
                end_char: spec.span.end,
                text: doc.slice(spec.span.start, spec.span.end).to_string(),
            });
        }

        Ok(doc)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Document length in chars
    pub fn char_len(&self) -> usize {
        self.char_bytes.len() - 1
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn head(&self, token: &Token) -> &Token {
        &self.tokens[token.head]
    }

    pub fn children<'d>(&'d self, token: &'d Token) -> impl Iterator<Item = &'d Token> + 'd {
        token.children.iter().map(move |&child| &self.tokens[child])
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn sentence_tokens(&self, sentence: &Sentence) -> &[Token] {
        &self.tokens[sentence.token_range()]
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Text between two char offsets; offsets are clamped to the document
    pub fn slice(&self, start: usize, end: usize) -> &str {
        let len = self.char_len();
        let end = end.min(len);
        let start = start.min(end);
        &self.text[self.char_bytes[start]..self.char_bytes[end]]
    }

    pub fn char_at(&self, position: usize) -> Option<char> {
        if position >= self.char_len() {
            return None;
        }
        self.slice(position, position + 1).chars().next()
    }
}

fn check_span(what: &'static str, span: CharSpan, len: usize) -> Result<(), AnnotationError> {
    if span.start > span.end || span.end > len {
        return Err(AnnotationError::SpanOutOfBounds {
            what,
            start: span.start,
            end: span.end,
            len,
        });
    }
    Ok(())
}
