//! prf-fairness - batch fairness validation runner
//!
//! Reads a JSON array of assessment outcomes and a JSON array of demographic
//! records, audits them, logs the report, and writes it as JSON.
//!
//! Config file resolution: `--config` > `PRF_CONFIG` > `<config dir>/prf/config.toml`.
//! Log level: `RUST_LOG` > config `[logging] level`.

use anyhow::{Context, Result};
use clap::Parser;
use prf_common::config::{resolve_config_file, CONFIG_ENV_VAR};
use prf_fairness::types::{decode_demographics, decode_outcomes};
use prf_fairness::{AssessmentCache, FairnessConfig, FairnessValidator, ValidationReport};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "prf-fairness")]
#[command(about = "Fairness audit of performance review outcomes")]
#[command(version)]
struct Args {
    /// JSON file with assessment outcomes
    #[arg(long)]
    outcomes: PathBuf,

    /// JSON file with employee demographic records
    #[arg(long)]
    demographics: PathBuf,

    /// TOML config file (thresholds, minimum batch size, logging)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the JSON report (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the minimum number of assessments required to validate
    #[arg(long)]
    min_assessments: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = resolve_config_file(args.config.as_deref(), CONFIG_ENV_VAR);
    let config = FairnessConfig::load(config_path.as_deref())
        .context("Failed to load fairness configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_str().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting prf-fairness v{}", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) => info!("Config: {}", path.display()),
        None => info!("Config: compiled defaults"),
    }

    let outcomes = decode_outcomes(&read_json(&args.outcomes)?)
        .with_context(|| format!("Invalid outcomes in {}", args.outcomes.display()))?;
    let demographics = decode_demographics(&read_json(&args.demographics)?)
        .with_context(|| format!("Invalid demographics in {}", args.demographics.display()))?;
    info!(
        outcomes = outcomes.len(),
        demographics = demographics.len(),
        "Inputs loaded"
    );

    let min_assessments = args.min_assessments.unwrap_or(config.min_assessments);
    let mut cache = AssessmentCache::with_min_assessments(min_assessments);
    cache.extend(outcomes);
    if !cache.is_ready() {
        warn!(
            "Only {} distinct assessments available, at least {} required; skipping validation",
            cache.len(),
            cache.min_assessments()
        );
        return Ok(());
    }

    let mut validator = FairnessValidator::with_thresholds(config.thresholds.clone());
    validator.validate_all(cache.outcomes(), &demographics);
    validator.log_results();

    let report = validator.generate_report();
    let json = report.to_json_pretty()?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Validation report saved to: {}", path.display());
        }
        None => println!("{}", json),
    }

    print_summary(&report);
    Ok(())
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON in {}", path.display()))
}

fn print_summary(report: &ValidationReport) {
    eprintln!();
    eprintln!("Validation Summary:");
    eprintln!("Total Validations: {}", report.total_validations);
    eprintln!("Passed: {}", report.passed_validations);
    eprintln!("Failed: {}", report.failed_validations);

    if report.failed_validations > 0 {
        eprintln!();
        eprintln!("Failed Validations:");
        for metric in report.failed_metrics() {
            eprintln!(
                "- {}: {:.3} (Threshold: {})",
                metric.name, metric.value, metric.threshold
            );
        }
    }
}
