pub mod annotation;
pub mod detectors;
pub mod discovery;
pub mod document;
pub mod error;
pub mod finding;
pub mod pipeline;
pub mod reader;
pub mod report;

// Re-export main types for convenient access
pub use annotation::{parse_document, AnnotationProvider, CommandAnnotator, RawDocument};
pub use detectors::{detector_for, Detection, Detector};
pub use document::{AnnotatedDocument, DocumentBuilder};
pub use error::{AnnotationError, DetectorError};
pub use finding::{Finding, Flag, Rule, RuleFamily};

// Re-export the pipeline entry points
pub use pipeline::{run_detectors, Pipeline, PipelineRun};
