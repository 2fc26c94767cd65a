use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use canopy_io::{ExperimentName, LabelReader, ReportWriter, TableReader};
use canopy_split::{
    ClassLabel, ClassMetrics, ConfusionMatrix, PerClassMetrics, SplitFinder, SplitMethod,
    SplitSides,
};

#[derive(Parser)]
#[command(name = "canopy")]
#[command(about = "Entropy-based split search and per-class classification metrics")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Find the feature and threshold that minimize weighted entropy
    Split {
        /// Path to the input CSV file (header row required)
        #[arg(long)]
        data: PathBuf,

        /// Name of the target column holding class labels
        #[arg(long)]
        target: String,

        /// Threshold search strategy: "sweep" or "exhaustive"
        #[arg(long, default_value = "sweep")]
        method: String,

        /// Experiment name for the JSON report (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: Option<String>,

        /// Output directory for the JSON report
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Compute per-class accuracy, precision and recall
    Metrics {
        /// Path to the CSV file with ground-truth labels
        #[arg(long)]
        labels: PathBuf,

        /// Column holding the labels (defaults to the first column)
        #[arg(long)]
        label_column: Option<String>,

        /// Path to the CSV file with predicted labels
        #[arg(long)]
        predictions: PathBuf,

        /// Column holding the predictions (defaults to the first column)
        #[arg(long)]
        prediction_column: Option<String>,

        /// Experiment name for the JSON report (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: Option<String>,

        /// Output directory for the JSON report
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct SplitOutput {
    n_rows: usize,
    n_features: usize,
    target: String,
    method: SplitMethod,
    feature: Option<String>,
    threshold: Option<f64>,
    entropy: Option<f64>,
    n_candidates: usize,
    sides: Option<SplitSides>,
    report: Option<PathBuf>,
}

#[derive(Serialize)]
struct MetricsOutput {
    n_samples: usize,
    overall_accuracy: f64,
    classes: Vec<ClassOutput>,
    report: Option<PathBuf>,
}

#[derive(Serialize)]
struct ClassOutput {
    class: ClassLabel,
    #[serde(flatten)]
    metrics: ClassMetrics,
}

fn parse_split_method(s: &str) -> Result<SplitMethod> {
    match s {
        "sweep" => Ok(SplitMethod::Sweep),
        "exhaustive" => Ok(SplitMethod::Exhaustive),
        other => anyhow::bail!("unknown split method: {other} (expected sweep or exhaustive)"),
    }
}

fn report_writer(experiment: Option<String>, output_dir: &Path) -> Result<Option<ReportWriter>> {
    let Some(name) = experiment else {
        return Ok(None);
    };
    let name = ExperimentName::new(name)?;
    Ok(Some(ReportWriter::new(output_dir, name)?))
}

fn read_labels(path: &Path, column: Option<String>) -> Result<Vec<ClassLabel>> {
    let reader = match column {
        Some(c) => LabelReader::new(path).with_column(c),
        None => LabelReader::new(path),
    };
    reader
        .read()
        .with_context(|| format!("failed to read labels from {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Split {
            data,
            target,
            method,
            experiment,
            output_dir,
        } => {
            let method = parse_split_method(&method)?;
            let writer = report_writer(experiment, &output_dir)?;

            let dataset = TableReader::new(&data)
                .read()
                .context("failed to read input CSV")?;
            info!(
                n_rows = dataset.n_rows(),
                n_columns = dataset.n_columns(),
                "dataset loaded"
            );

            let result = SplitFinder::new()
                .with_method(method)
                .find_best_split(&dataset, &target)
                .context("split search failed")?;

            let report = writer
                .map(|w| w.write_split(&target, method, dataset.n_rows(), &result))
                .transpose()?;

            let output = SplitOutput {
                n_rows: dataset.n_rows(),
                n_features: dataset.n_columns() - 1,
                target,
                method,
                feature: result.feature,
                threshold: result.threshold,
                entropy: result
                    .entropy
                    .is_finite()
                    .then(|| result.entropy.value()),
                n_candidates: result.n_candidates,
                sides: result.sides,
                report,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Metrics {
            labels,
            label_column,
            predictions,
            prediction_column,
            experiment,
            output_dir,
        } => {
            let writer = report_writer(experiment, &output_dir)?;

            let truth = read_labels(&labels, label_column)?;
            let predicted = read_labels(&predictions, prediction_column)?;

            let confusion = ConfusionMatrix::from_labels(&truth, &predicted)
                .context("labels and predictions do not line up")?;
            let metrics = PerClassMetrics::from_confusion(&confusion);
            info!(
                n_samples = confusion.total(),
                n_classes = metrics.n_classes(),
                accuracy = confusion.accuracy(),
                "metrics computed"
            );

            let report = writer
                .map(|w| w.write_metrics(&metrics, &confusion))
                .transpose()?;

            let output = MetricsOutput {
                n_samples: confusion.total(),
                overall_accuracy: confusion.accuracy(),
                classes: metrics
                    .iter()
                    .map(|(class, m)| ClassOutput {
                        class: class.clone(),
                        metrics: m,
                    })
                    .collect(),
                report,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
