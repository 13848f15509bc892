#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cuspid_analysis::{AnalysisError, AnalysisRequest, AnalysisThresholds, ImpactionAnalyzer};
use log::{error, info};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cuspid")]
#[command(about = "Assess maxillary canine impaction from dental keypoint detections")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one or more detection requests (JSON).
    Analyze {
        /// Request files.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Threshold overrides (JSON).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the reports here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,

        #[arg(long)]
        pretty: bool,
    },
    /// Print the default landmark order of the detector.
    Vocabulary,
    /// Print the effective thresholds as JSON.
    Thresholds {
        /// Threshold overrides (JSON) to merge over the defaults.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            inputs,
            config,
            out,
            pretty,
        } => run_analyze(&inputs, config.as_deref(), out.as_deref(), pretty),
        Commands::Vocabulary => {
            for label in ImpactionAnalyzer::new().vocabulary().labels() {
                println!("{}", label);
            }
            Ok(())
        }
        Commands::Thresholds { config } => {
            let analyzer = load_analyzer(config.as_deref())?;
            println!("{}", serde_json::to_string_pretty(analyzer.thresholds())?);
            Ok(())
        }
    }
}

fn load_analyzer(config: Option<&Path>) -> Result<ImpactionAnalyzer> {
    let thresholds = match config {
        Some(path) => AnalysisThresholds::load(path)?,
        None => AnalysisThresholds::default(),
    };
    Ok(ImpactionAnalyzer::with_thresholds(thresholds))
}

fn read_request(path: &Path) -> Result<AnalysisRequest> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read request {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Malformed request in {}", path.display()))
}

fn error_entry(path: &Path, message: &str) -> Value {
    json!({ "input": path.display().to_string(), "error": message })
}

/// One JSON entry per input, in input order. Inputs that cannot be read or
/// analyzed become error entries instead of failing the run.
fn analyze_inputs(analyzer: &ImpactionAnalyzer, inputs: &[PathBuf]) -> Result<Vec<Value>> {
    let loaded = inputs
        .iter()
        .map(|path| read_request(path))
        .collect::<Vec<_>>();
    let requests = loaded.iter().flatten().cloned().collect::<Vec<_>>();
    info!("Analyzing {} of {} request(s)", requests.len(), inputs.len());

    let mut analyzed = analyzer.analyze_batch(&requests).into_iter();
    let mut reports = Vec::with_capacity(inputs.len());
    for (path, loaded) in inputs.iter().zip(loaded) {
        let report = match loaded {
            Err(e) => {
                error!("{:#}", e);
                error_entry(path, &format!("{:#}", e))
            }
            Ok(_) => match analyzed.next() {
                Some(Ok(report)) => serde_json::to_value(&report)?,
                Some(Err(AnalysisError::DetectionEmpty)) => {
                    error!("{}: could not detect keypoints", path.display());
                    error_entry(path, "could not detect keypoints")
                }
                Some(Err(e)) => {
                    error!("{}: {}", path.display(), e);
                    error_entry(path, &e.to_string())
                }
                None => anyhow::bail!("No analysis produced for {}", path.display()),
            },
        };
        reports.push(report);
    }
    Ok(reports)
}

fn run_analyze(
    inputs: &[PathBuf],
    config: Option<&Path>,
    out: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let analyzer = load_analyzer(config)?;
    let mut reports = analyze_inputs(&analyzer, inputs)?;

    let output = match reports.len() {
        1 => reports.swap_remove(0),
        _ => Value::Array(reports),
    };
    let text = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };

    match out {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("Failed to write reports to {}", path.display()))?,
        None => println!("{}", text),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_input_becomes_an_error_entry() -> Result<()> {
        let empty = std::env::temp_dir().join(format!("cuspid-{}-empty.json", std::process::id()));
        fs::write(&empty, r#"{"keypoints": []}"#)?;
        let absent = std::env::temp_dir().join(format!("cuspid-{}-absent.json", std::process::id()));
        let malformed =
            std::env::temp_dir().join(format!("cuspid-{}-malformed.json", std::process::id()));
        fs::write(&malformed, "{ not json")?;

        let reports = analyze_inputs(
            &ImpactionAnalyzer::new(),
            &[absent.clone(), empty.clone(), malformed.clone()],
        );
        fs::remove_file(&empty)?;
        fs::remove_file(&malformed)?;
        let reports = reports?;

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0]["input"], absent.display().to_string());
        assert!(reports[0]["error"]
            .as_str()
            .is_some_and(|e| e.starts_with("Failed to read request")));
        assert_eq!(reports[1]["error"], "could not detect keypoints");
        assert!(reports[2]["error"]
            .as_str()
            .is_some_and(|e| e.starts_with("Malformed request")));
        Ok(())
    }
}
