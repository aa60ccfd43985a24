// WHY: Findings leave the crate as one line each, either tab-separated or JSON,
// plus a JSON stats file summarizing the whole run

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::finding::Finding;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `rule_id<TAB>start<TAB>end<TAB>flag`
    #[default]
    Tsv,
    /// One JSON object per line
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "jsonl",
        }
    }
}

pub fn format_finding(finding: &Finding, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Tsv => format!(
            "{}\t{}\t{}\t{}",
            finding.rule.id(),
            finding.start,
            finding.end,
            finding.flag
        ),
        OutputFormat::Json => serde_json::to_string(finding)?,
    })
}

/// Aux file path next to the source: `<stem>_findings.<tsv|jsonl>`
pub fn generate_aux_file_path(source_path: &Path, format: OutputFormat) -> PathBuf {
    let mut aux_path = source_path.to_path_buf();
    let file_stem = aux_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    aux_path.set_file_name(format!("{file_stem}_findings.{}", format.extension()));
    aux_path
}

/// Write all findings, one per line, ending with a trailing newline
pub async fn write_findings_file(path: &Path, findings: &[Finding], format: OutputFormat) -> Result<()> {
    let file = tokio::fs::File::create(path).await?;
    let mut writer = BufWriter::new(file);

    for finding in findings {
        writer.write_all(format_finding(finding, format)?.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }

    writer.flush().await?;
    Ok(())
}

/// Per-document processing statistics
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DocumentStats {
    pub path: String,
    pub chars_processed: u64,
    pub findings: u64,
    pub passed: u64,
    pub failed: u64,
    /// Sites skipped by detectors
    pub suppressed: u64,
    pub processing_time_ms: u64,
    /// success or failed
    pub status: String,
    pub error: Option<String>,
}

/// Whole-run statistics written to the stats file
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub rules: Vec<u8>,
    pub documents_processed: u64,
    pub documents_failed: u64,
    pub total_findings: u64,
    pub total_failed_checks: u64,
    pub run_time_ms: u64,
    pub documents: Vec<DocumentStats>,
}

impl RunStats {
    pub fn record(&mut self, stats: DocumentStats) {
        if stats.error.is_some() {
            self.documents_failed += 1;
        } else {
            self.documents_processed += 1;
        }
        self.total_findings += stats.findings;
        self.total_failed_checks += stats.failed;
        self.documents.push(stats);
    }

    pub async fn write(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
