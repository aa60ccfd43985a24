// Integration test utilities and common code
// WHY: Centralized fixtures avoid duplicating hand-annotated documents across tests
#![allow(dead_code)]

use punctmark::document::{Dep, EntityLabel, Pos};
use punctmark::{AnnotatedDocument, DocumentBuilder, Finding, Flag, Rule};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture helper for creating temporary directories with annotated documents
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self { temp_dir, root_path }
    }

    /// Write a file (annotated JSON or raw text) below the fixture root
    pub fn create_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }
}

/// Annotated "sarah met Emily on July 4 2021." in the spaCy JSON layout
pub const MEETING_JSON: &str = r#"{
    "text": "sarah met Emily on July 4 2021.",
    "tokens": [
        {"id": 0, "start": 0, "end": 5, "pos": "PROPN", "dep": "nsubj", "head": 1},
        {"id": 1, "start": 6, "end": 9, "pos": "VERB", "dep": "ROOT", "head": 1},
        {"id": 2, "start": 10, "end": 15, "pos": "PROPN", "dep": "dobj", "head": 1},
        {"id": 3, "start": 16, "end": 18, "pos": "ADP", "dep": "prep", "head": 1},
        {"id": 4, "start": 19, "end": 23, "pos": "PROPN", "dep": "pobj", "head": 3},
        {"id": 5, "start": 24, "end": 25, "pos": "NUM", "dep": "nummod", "head": 4},
        {"id": 6, "start": 26, "end": 30, "pos": "NUM", "dep": "nummod", "head": 4},
        {"id": 7, "start": 30, "end": 31, "pos": "PUNCT", "dep": "punct", "head": 1}
    ],
    "sents": [{"start": 0, "end": 31}],
    "ents": [
        {"start": 0, "end": 5, "label": "PERSON"},
        {"start": 10, "end": 15, "label": "PERSON"},
        {"start": 19, "end": 30, "label": "DATE"}
    ]
}"#;

/// Three narrative sentences:
/// `On July 4, 2021, sarah and her friends gathered in new york.`
/// `Emily whispered, “This is Independence Day.”`
/// `They ate apples oranges and bananas until the sun set`
pub fn narrative_doc() -> AnnotatedDocument {
    DocumentBuilder::new()
        .token("On", Pos::Adp, Dep::Prep, 10)
        .token("July", Pos::Propn, Dep::Pobj, 0)
        .token("4", Pos::Num, Dep::Nummod, 1)
        .attached(",", Pos::Punct, Dep::Punct, 1)
        .token("2021", Pos::Num, Dep::Nummod, 1)
        .attached(",", Pos::Punct, Dep::Punct, 10)
        .token("sarah", Pos::Propn, Dep::Nsubj, 10)
        .token("and", Pos::Cconj, Dep::Cc, 6)
        .token("her", Pos::Pron, Dep::Poss, 9)
        .token("friends", Pos::Noun, Dep::Conj, 6)
        .token("gathered", Pos::Verb, Dep::Root, 10)
        .token("in", Pos::Adp, Dep::Prep, 10)
        .token("new", Pos::Propn, Dep::Compound, 13)
        .token("york", Pos::Propn, Dep::Pobj, 11)
        .attached(".", Pos::Punct, Dep::Punct, 10)
        .end_sentence()
        .token("Emily", Pos::Propn, Dep::Nsubj, 16)
        .token("whispered", Pos::Verb, Dep::Root, 16)
        .attached(",", Pos::Punct, Dep::Punct, 16)
        .token("“", Pos::Punct, Dep::Punct, 20)
        .attached("This", Pos::Pron, Dep::Nsubj, 20)
        .token("is", Pos::Aux, Dep::Ccomp, 16)
        .token("Independence", Pos::Propn, Dep::Compound, 22)
        .token("Day", Pos::Propn, Dep::Attr, 20)
        .attached(".", Pos::Punct, Dep::Punct, 20)
        .attached("”", Pos::Punct, Dep::Punct, 16)
        .end_sentence()
        .token("They", Pos::Pron, Dep::Nsubj, 26)
        .token("ate", Pos::Verb, Dep::Root, 26)
        .token("apples", Pos::Noun, Dep::Dobj, 26)
        .token("oranges", Pos::Noun, Dep::Conj, 27)
        .token("and", Pos::Cconj, Dep::Cc, 28)
        .token("bananas", Pos::Noun, Dep::Conj, 28)
        .token("until", Pos::Sconj, Dep::Mark, 34)
        .token("the", Pos::Det, Dep::Det, 33)
        .token("sun", Pos::Noun, Dep::Nsubj, 34)
        .token("set", Pos::Verb, Dep::Advcl, 26)
        .entity(EntityLabel::Date, 1..5)
        .entity(EntityLabel::Person, 6..7)
        .entity(EntityLabel::Gpe, 12..14)
        .entity(EntityLabel::Person, 15..16)
        .entity(EntityLabel::Event, 21..23)
        .build()
        .expect("narrative fixture is valid")
}

/// Two dialogue sentences:
/// `"I believe it," said Emma.`
/// `She paused: when leaves fall, we walk; -- fine`
pub fn dialogue_doc() -> AnnotatedDocument {
    DocumentBuilder::new()
        .token("\"", Pos::Punct, Dep::Punct, 6)
        .attached("I", Pos::Pron, Dep::Nsubj, 2)
        .token("believe", Pos::Verb, Dep::Ccomp, 6)
        .token("it", Pos::Pron, Dep::Dobj, 2)
        .attached(",", Pos::Punct, Dep::Punct, 2)
        .attached("\"", Pos::Punct, Dep::Punct, 6)
        .token("said", Pos::Verb, Dep::Root, 6)
        .token("Emma", Pos::Propn, Dep::Nsubj, 6)
        .attached(".", Pos::Punct, Dep::Punct, 6)
        .end_sentence()
        .token("She", Pos::Pron, Dep::Nsubj, 10)
        .token("paused", Pos::Verb, Dep::Root, 10)
        .attached(":", Pos::Punct, Dep::Punct, 10)
        .token("when", Pos::Sconj, Dep::Mark, 14)
        .token("leaves", Pos::Noun, Dep::Nsubj, 14)
        .token("fall", Pos::Verb, Dep::Advcl, 17)
        .attached(",", Pos::Punct, Dep::Punct, 14)
        .token("we", Pos::Pron, Dep::Nsubj, 17)
        .token("walk", Pos::Verb, Dep::Ccomp, 10)
        .attached(";", Pos::Punct, Dep::Punct, 10)
        .token("--", Pos::Punct, Dep::Punct, 10)
        .token("fine", Pos::Adj, Dep::Acomp, 10)
        .entity(EntityLabel::Person, 7..8)
        .build()
        .expect("dialogue fixture is valid")
}

/// Findings of one rule as (covered text, flag) pairs
pub fn spans_for<'d>(doc: &'d AnnotatedDocument, findings: &[Finding], rule: Rule) -> Vec<(&'d str, Flag)> {
    findings
        .iter()
        .filter(|f| f.rule == rule)
        .map(|f| (doc.slice(f.start, f.end), f.flag))
        .collect()
}
