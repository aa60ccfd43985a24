// WHY: Annotators emit labels as strings; they are parsed into closed enums once at the
// boundary so detectors match exhaustively instead of comparing strings

use std::fmt;
use std::str::FromStr;

use crate::error::AnnotationError;

macro_rules! label_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = AnnotationError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($text => Ok($name::$variant),)+
                    _ => Err(AnnotationError::UnknownLabel {
                        kind: $kind,
                        value: value.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

label_enum!(
    /// Coarse part-of-speech tag (Universal POS)
    Pos, "part-of-speech" {
        Adj => "ADJ",
        Adp => "ADP",
        Adv => "ADV",
        Aux => "AUX",
        Cconj => "CCONJ",
        Det => "DET",
        Intj => "INTJ",
        Noun => "NOUN",
        Num => "NUM",
        Part => "PART",
        Pron => "PRON",
        Propn => "PROPN",
        Punct => "PUNCT",
        Sconj => "SCONJ",
        Sym => "SYM",
        Verb => "VERB",
        X => "X",
        Space => "SPACE",
    }
);

label_enum!(
    /// Dependency relation of a token to its head (ClearNLP English label set)
    Dep, "dependency" {
        Acl => "acl",
        Acomp => "acomp",
        Advcl => "advcl",
        Advmod => "advmod",
        Agent => "agent",
        Amod => "amod",
        Appos => "appos",
        Attr => "attr",
        Aux => "aux",
        Auxpass => "auxpass",
        Case => "case",
        Cc => "cc",
        Ccomp => "ccomp",
        Compound => "compound",
        Conj => "conj",
        Csubj => "csubj",
        Csubjpass => "csubjpass",
        Dative => "dative",
        Dep => "dep",
        Det => "det",
        Dobj => "dobj",
        Expl => "expl",
        Intj => "intj",
        Mark => "mark",
        Meta => "meta",
        Neg => "neg",
        Nmod => "nmod",
        Npadvmod => "npadvmod",
        Nsubj => "nsubj",
        Nsubjpass => "nsubjpass",
        Nummod => "nummod",
        Oprd => "oprd",
        Parataxis => "parataxis",
        Pcomp => "pcomp",
        Pobj => "pobj",
        Poss => "poss",
        Preconj => "preconj",
        Predet => "predet",
        Prep => "prep",
        Prt => "prt",
        Punct => "punct",
        Quantmod => "quantmod",
        Relcl => "relcl",
        Xcomp => "xcomp",
        Root => "ROOT",
    }
);

label_enum!(
    /// Named-entity label (OntoNotes scheme)
    EntityLabel, "entity" {
        Person => "PERSON",
        Norp => "NORP",
        Fac => "FAC",
        Org => "ORG",
        Gpe => "GPE",
        Loc => "LOC",
        Product => "PRODUCT",
        Event => "EVENT",
        WorkOfArt => "WORK_OF_ART",
        Law => "LAW",
        Language => "LANGUAGE",
        Date => "DATE",
        Time => "TIME",
        Percent => "PERCENT",
        Money => "MONEY",
        Quantity => "QUANTITY",
        Ordinal => "ORDINAL",
        Cardinal => "CARDINAL",
    }
);
