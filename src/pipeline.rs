// WHY: Runs detectors over one immutable document and concatenates their findings in
// registration order; the concurrent variant must produce the identical sequence

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::detectors::{detector_for, Detection, Detector};
use crate::document::AnnotatedDocument;
use crate::finding::{Finding, Flag, Rule, RuleFamily};

/// Findings of one pipeline run plus diagnostics about skipped sites
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineRun {
    pub findings: Vec<Finding>,
    /// Sites a detector could not evaluate (logged, never reported as findings)
    pub suppressed: usize,
    /// Detectors whose task died before returning (concurrent runs only)
    pub failed_detectors: usize,
}

impl PipelineRun {
    pub fn passed(&self) -> usize {
        self.findings.iter().filter(|f| f.flag == Flag::Pass).count()
    }

    pub fn failed(&self) -> usize {
        self.findings.iter().filter(|f| f.flag == Flag::Fail).count()
    }

    fn absorb(&mut self, rule: Rule, detection: Detection) {
        debug!(rule = %rule, findings = detection.findings.len(), "Detector finished");
        for error in &detection.suppressed {
            warn!(rule = %rule, %error, "Skipped site during detection");
        }
        self.suppressed += detection.suppressed.len();
        self.findings.extend(detection.findings);
    }
}

/// Ordered collection of detectors
#[derive(Clone, Default)]
pub struct Pipeline {
    detectors: Vec<Arc<dyn Detector>>,
}

impl Pipeline {
    /// Empty pipeline; add detectors with [`Pipeline::register`]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, detector: Arc<dyn Detector>) -> Self {
        self.detectors.push(detector);
        self
    }

    /// Default detectors for `rules`, in the given order
    pub fn from_rules(rules: &[Rule]) -> Self {
        rules
            .iter()
            .fold(Self::new(), |pipeline, &rule| pipeline.register(detector_for(rule)))
    }

    pub fn for_family(family: RuleFamily) -> Self {
        Self::from_rules(family.rules())
    }

    pub fn narrative() -> Self {
        Self::for_family(RuleFamily::Narrative)
    }

    pub fn dialogue() -> Self {
        Self::for_family(RuleFamily::Dialogue)
    }

    /// Narrative family followed by the dialogue family
    pub fn all() -> Self {
        let mut pipeline = Self::narrative();
        pipeline.detectors.extend(Self::dialogue().detectors);
        pipeline
    }

    pub fn rules(&self) -> Vec<Rule> {
        self.detectors.iter().map(|d| d.rule()).collect()
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    pub fn detectors(&self) -> &[Arc<dyn Detector>] {
        &self.detectors
    }

    pub fn run(&self, doc: &AnnotatedDocument) -> Vec<Finding> {
        self.run_detailed(doc).findings
    }

    /// Sequential run with suppression counts
    pub fn run_detailed(&self, doc: &AnnotatedDocument) -> PipelineRun {
        let mut run = PipelineRun::default();
        for detector in &self.detectors {
            run.absorb(detector.rule(), detector.detect(doc));
        }
        info!(
            detectors = self.detectors.len(),
            findings = run.findings.len(),
            suppressed = run.suppressed,
            "Pipeline run complete"
        );
        run
    }

    /// Run every detector on the blocking pool, then restore registration order
    pub async fn run_concurrent(&self, doc: Arc<AnnotatedDocument>) -> PipelineRun {
        let tasks = self.detectors.iter().map(|detector| {
            let detector = Arc::clone(detector);
            let doc = Arc::clone(&doc);
            tokio::task::spawn_blocking(move || detector.detect(&doc))
        });
        let results = join_all(tasks).await;

        let mut run = PipelineRun::default();
        for (detector, result) in self.detectors.iter().zip(results) {
            match result {
                Ok(detection) => run.absorb(detector.rule(), detection),
                Err(e) => {
                    warn!(rule = %detector.rule(), error = %e, "Detector task failed, continuing");
                    run.failed_detectors += 1;
                }
            }
        }
        info!(
            detectors = self.detectors.len(),
            findings = run.findings.len(),
            suppressed = run.suppressed,
            failed_detectors = run.failed_detectors,
            "Concurrent pipeline run complete"
        );
        run
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").field("rules", &self.rules()).finish()
    }
}

/// Run `detectors` once each over `doc`, concatenating findings in order
pub fn run_detectors(doc: &AnnotatedDocument, detectors: &[Arc<dyn Detector>]) -> Vec<Finding> {
    let mut run = PipelineRun::default();
    for detector in detectors {
        run.absorb(detector.rule(), detector.detect(doc));
    }
    run.findings
}
