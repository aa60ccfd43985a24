use anyhow::Result;
use glob::glob;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Configuration for input discovery behavior
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Whether to fail fast on first error or continue processing
    pub fail_fast: bool,
    /// Glob applied below every directory argument
    pub pattern: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            pattern: "**/*.json".to_string(),
        }
    }
}

/// One input document candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredInput {
    pub path: PathBuf,
    pub error: Option<String>,
}

/// Expand command-line paths into input files
/// Files are taken as given; directories are searched with the configured glob,
/// sorted so repeated runs see the same order
pub async fn collect_inputs(paths: &[PathBuf], config: &DiscoveryConfig) -> Result<Vec<DiscoveredInput>> {
    let mut inputs = Vec::new();

    for path in paths {
        match fs::metadata(path).await {
            Ok(meta) if meta.is_file() => {
                debug!("Using input file: {}", path.display());
                inputs.push(DiscoveredInput {
                    path: path.clone(),
                    error: None,
                });
            }
            Ok(meta) if meta.is_dir() => {
                let found = glob_directory(path, &config.pattern, config.fail_fast)?;
                info!("Found {} inputs under {}", found.len(), path.display());
                inputs.extend(found);
            }
            Ok(_) => {
                let error_msg = format!("Not a regular file or directory: {}", path.display());
                record_error(&mut inputs, path, error_msg, config.fail_fast)?;
            }
            Err(e) => {
                let error_msg = format!("Cannot access {}: {}", path.display(), e);
                record_error(&mut inputs, path, error_msg, config.fail_fast)?;
            }
        }
    }

    Ok(inputs)
}

fn glob_directory(dir: &Path, pattern: &str, fail_fast: bool) -> Result<Vec<DiscoveredInput>> {
    let full_pattern = dir.join(pattern);
    let full_pattern = full_pattern.to_string_lossy();

    let mut found = Vec::new();
    for entry in glob(&full_pattern)? {
        match entry {
            Ok(path) if path.is_file() => found.push(DiscoveredInput { path, error: None }),
            Ok(_) => {}
            Err(e) => {
                let path = e.path().to_path_buf();
                let error_msg = format!("Cannot read {}: {}", path.display(), e.error());
                record_error(&mut found, &path, error_msg, fail_fast)?;
            }
        }
    }

    found.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(found)
}

fn record_error(inputs: &mut Vec<DiscoveredInput>, path: &Path, error_msg: String, fail_fast: bool) -> Result<()> {
    warn!("{}", error_msg);
    if fail_fast {
        anyhow::bail!(error_msg);
    }
    inputs.push(DiscoveredInput {
        path: path.to_path_buf(),
        error: Some(error_msg),
    });
    Ok(())
}
