// Pipeline composition tests
// WHY: The pipeline adds nothing of its own; its output must be exactly the ordered
// concatenation of its detectors, whichever way they are scheduled

use punctmark::{detector_for, run_detectors, AnnotatedDocument, Pipeline, Rule, RuleFamily};
use std::sync::{Arc, OnceLock};

#[path = "integration/mod.rs"]
mod test_utils;
use test_utils::{dialogue_doc, narrative_doc};

// WHY: Shared fixtures are built once per test binary
static DOCUMENTS: OnceLock<Vec<Arc<AnnotatedDocument>>> = OnceLock::new();

fn documents() -> &'static [Arc<AnnotatedDocument>] {
    DOCUMENTS.get_or_init(|| vec![Arc::new(narrative_doc()), Arc::new(dialogue_doc())])
}

#[test]
fn test_output_is_concatenation_of_detectors() {
    for doc in documents() {
        let pipeline = Pipeline::all();
        let findings = pipeline.run(doc);

        let expected: Vec<_> = pipeline
            .rules()
            .into_iter()
            .flat_map(|rule| detector_for(rule).detect(doc).findings)
            .collect();
        assert_eq!(findings, expected);
        assert_eq!(run_detectors(doc, pipeline.detectors()), findings);
    }
}

#[test]
fn test_family_pipelines_register_in_order() {
    let ids: Vec<u8> = Pipeline::narrative().rules().into_iter().map(Rule::id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);

    let ids: Vec<u8> = Pipeline::dialogue().rules().into_iter().map(Rule::id).collect();
    assert_eq!(ids, vec![8, 9, 10, 11, 14, 12, 13]);

    assert_eq!(Pipeline::all().len(), 14);
    assert!(Pipeline::new().is_empty());
    assert_eq!(Pipeline::for_family(RuleFamily::Dialogue).len(), 7);
}

#[test]
fn test_runs_are_deterministic() {
    let pipeline = Pipeline::all();
    for doc in documents() {
        assert_eq!(pipeline.run(doc), pipeline.run(doc));
        assert_eq!(pipeline.run_detailed(doc), pipeline.run_detailed(doc));
    }
}

#[test]
fn test_every_span_is_within_document() {
    for doc in documents() {
        for finding in Pipeline::all().run(doc) {
            assert!(finding.start < finding.end, "empty span {finding:?}");
            assert!(finding.end <= doc.char_len(), "span past end {finding:?}");
        }
    }
}

#[test]
fn test_sentence_final_rules_are_idempotent() {
    // one finding per non-empty sentence, regardless of how often the detector runs
    for doc in documents() {
        for rule in [Rule::SentenceFinalPunctuation, Rule::SimpleSentenceFinalPunctuation] {
            let detector = detector_for(rule);
            let first = detector.detect(doc);
            assert_eq!(first, detector.detect(doc));
            assert_eq!(first.findings.len(), doc.sentences().len());
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_run_matches_sequential() {
    let pipeline = Pipeline::all();
    for doc in documents() {
        let sequential = pipeline.run_detailed(doc);
        let concurrent = pipeline.run_concurrent(Arc::clone(doc)).await;
        assert_eq!(concurrent, sequential);
        assert_eq!(concurrent.failed_detectors, 0);
    }
}

#[test]
fn test_empty_document_yields_no_findings() {
    let doc = punctmark::DocumentBuilder::new().build().expect("empty document is valid");
    let run = Pipeline::all().run_detailed(&doc);
    assert!(run.findings.is_empty());
    assert_eq!(run.suppressed, 0);
}
