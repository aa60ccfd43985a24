use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use punctmark::discovery::{self, DiscoveryConfig};
use punctmark::reader::{DocumentReader, ReaderConfig};
use punctmark::report::{self, DocumentStats, OutputFormat, RunStats};
use punctmark::{CommandAnnotator, Pipeline, Rule, RuleFamily};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FamilyArg {
    Narrative,
    Dialogue,
    All,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Tsv,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "punctmark")]
#[command(about = "Flags punctuation and grammar conventions in annotated prose")]
#[command(version)]
struct Args {
    /// Annotated documents (*.json), raw text files, or directories to scan
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Rule family to run
    #[arg(long, value_enum, default_value_t = FamilyArg::All)]
    family: FamilyArg,

    /// Comma-separated rule ids to run instead of a family, in this order
    #[arg(long, value_delimiter = ',')]
    rules: Vec<u8>,

    /// Output format for findings
    #[arg(long, value_enum, default_value_t = FormatArg::Tsv)]
    format: FormatArg,

    /// Run detectors concurrently on the blocking pool
    #[arg(long)]
    concurrent: bool,

    /// Abort on first error
    #[arg(long)]
    fail_fast: bool,

    /// Write findings to <stem>_findings.* beside each input instead of stdout
    #[arg(long)]
    write_aux: bool,

    /// Program that reads raw text on stdin and prints an annotated JSON document
    #[arg(long)]
    annotator: Option<PathBuf>,

    /// Argument passed to the annotator program; repeat for several
    #[arg(long = "annotator-arg", allow_hyphen_values = true)]
    annotator_args: Vec<String>,

    /// Glob used below directory inputs
    #[arg(long, default_value = "**/*.json")]
    pattern: String,

    /// Stats output file path
    #[arg(long, default_value = "run_stats.json")]
    stats_out: PathBuf,
}

fn build_pipeline(args: &Args) -> Result<Pipeline> {
    if !args.rules.is_empty() {
        let rules = args
            .rules
            .iter()
            .map(|&id| Rule::from_id(id).ok_or_else(|| anyhow::anyhow!("Unknown rule id: {id}")))
            .collect::<Result<Vec<_>>>()?;
        return Ok(Pipeline::from_rules(&rules));
    }

    Ok(match args.family {
        FamilyArg::Narrative => Pipeline::for_family(RuleFamily::Narrative),
        FamilyArg::Dialogue => Pipeline::for_family(RuleFamily::Dialogue),
        FamilyArg::All => Pipeline::all(),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: structured JSON logging on stderr keeps stdout free for findings
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    let run_start = std::time::Instant::now();
    let pipeline = build_pipeline(&args)?;
    let format = match args.format {
        FormatArg::Tsv => OutputFormat::Tsv,
        FormatArg::Json => OutputFormat::Json,
    };

    let discovery_config = DiscoveryConfig {
        fail_fast: args.fail_fast,
        pattern: args.pattern.clone(),
    };
    let inputs = discovery::collect_inputs(&args.inputs, &discovery_config).await?;
    info!("Discovered {} inputs", inputs.len());

    let mut reader = DocumentReader::new(ReaderConfig {
        fail_fast: args.fail_fast,
    });
    if let Some(program) = &args.annotator {
        let annotator = CommandAnnotator::new(program.clone(), args.annotator_args.clone());
        reader = reader.with_annotator(Arc::new(annotator));
    }

    let mut run_stats = RunStats {
        rules: pipeline.rules().into_iter().map(Rule::id).collect(),
        ..RunStats::default()
    };
    let print_headers = inputs.len() > 1 && !args.write_aux;

    for input in &inputs {
        let path_display = input.path.display().to_string();
        let doc_start = std::time::Instant::now();

        let loaded = match &input.error {
            Some(error) => Err(error.clone()),
            None => {
                let (doc, read_stats) = reader.read_document(&input.path).await?;
                doc.ok_or_else(|| read_stats.read_error.unwrap_or_default())
            }
        };

        let doc = match loaded {
            Ok(doc) => doc,
            Err(error) => {
                run_stats.record(DocumentStats {
                    path: path_display,
                    chars_processed: 0,
                    findings: 0,
                    passed: 0,
                    failed: 0,
                    suppressed: 0,
                    processing_time_ms: doc_start.elapsed().as_millis() as u64,
                    status: "failed".to_string(),
                    error: Some(error),
                });
                continue;
            }
        };

        let chars_processed = doc.char_len() as u64;
        let run = if args.concurrent {
            pipeline.run_concurrent(Arc::new(doc)).await
        } else {
            pipeline.run_detailed(&doc)
        };

        if args.write_aux {
            let aux_path = report::generate_aux_file_path(&input.path, format);
            report::write_findings_file(&aux_path, &run.findings, format).await?;
            info!("Wrote {} findings to {}", run.findings.len(), aux_path.display());
        } else {
            if print_headers {
                println!("# {path_display}");
            }
            for finding in &run.findings {
                println!("{}", report::format_finding(finding, format)?);
            }
        }

        run_stats.record(DocumentStats {
            path: path_display,
            chars_processed,
            findings: run.findings.len() as u64,
            passed: run.passed() as u64,
            failed: run.failed() as u64,
            suppressed: run.suppressed as u64,
            processing_time_ms: doc_start.elapsed().as_millis() as u64,
            status: "success".to_string(),
            error: None,
        });
    }

    run_stats.run_time_ms = run_start.elapsed().as_millis() as u64;
    run_stats.write(&args.stats_out).await?;

    info!(
        documents = run_stats.documents_processed,
        failed = run_stats.documents_failed,
        findings = run_stats.total_findings,
        "Run complete"
    );

    Ok(())
}
