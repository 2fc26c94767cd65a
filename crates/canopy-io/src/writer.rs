//! JSON report writer for split and metrics results.

use std::fs;
use std::path::{Path, PathBuf};

use canopy_split::{BestSplit, ClassLabel, ClassMetrics, ConfusionMatrix, PerClassMetrics, SplitMethod};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::ExperimentName;

/// Writes split and metrics reports to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_split.json` and
/// `{experiment}_metrics.json`.
pub struct ReportWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ReportWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Path of the split report.
    #[must_use]
    pub fn split_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_split.json", self.experiment.as_str()))
    }

    /// Path of the metrics report.
    #[must_use]
    pub fn metrics_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_metrics.json", self.experiment.as_str()))
    }

    /// Write a split search result to `{experiment}_split.json`.
    ///
    /// An unsplittable result is written with `null` feature, threshold,
    /// and entropy.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Serialize`] or [`IoError::WriteFile`] on failure.
    #[instrument(skip_all)]
    pub fn write_split(
        &self,
        target: &str,
        method: SplitMethod,
        n_rows: usize,
        result: &BestSplit,
    ) -> Result<PathBuf, IoError> {
        let path = self.split_path();
        let artifact = SplitArtifact {
            experiment: self.experiment.as_str(),
            target,
            method,
            n_rows,
            result,
        };
        write_json(&path, &artifact)?;
        info!(path = %path.display(), "split report written");
        Ok(path)
    }

    /// Write per-class metrics and the confusion matrix to `{experiment}_metrics.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Serialize`] or [`IoError::WriteFile`] on failure.
    #[instrument(skip_all)]
    pub fn write_metrics(
        &self,
        metrics: &PerClassMetrics<ClassLabel>,
        confusion: &ConfusionMatrix<ClassLabel>,
    ) -> Result<PathBuf, IoError> {
        let path = self.metrics_path();

        let classes: Vec<ClassEntry<'_>> = metrics
            .iter()
            .map(|(class, m)| ClassEntry {
                class,
                support: confusion
                    .class_index(class)
                    .map_or(0, |c| confusion.support(c)),
                metrics: m,
            })
            .collect();

        let artifact = MetricsArtifact {
            experiment: self.experiment.as_str(),
            n_samples: confusion.total(),
            overall_accuracy: confusion.accuracy(),
            classes,
            confusion_labels: confusion.classes(),
            confusion_matrix: confusion.as_rows(),
        };
        write_json(&path, &artifact)?;
        info!(path = %path.display(), "metrics report written");
        Ok(path)
    }
}

fn write_json<T: Serialize>(path: &Path, artifact: &T) -> Result<(), IoError> {
    let json = serde_json::to_string_pretty(artifact).map_err(|e| IoError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::write(path, &json).map_err(|e| IoError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}

// --- Serialization shadow structs ---

#[derive(Serialize)]
struct SplitArtifact<'a> {
    experiment: &'a str,
    target: &'a str,
    method: SplitMethod,
    n_rows: usize,
    result: &'a BestSplit,
}

#[derive(Serialize)]
struct ClassEntry<'a> {
    class: &'a ClassLabel,
    support: usize,
    #[serde(flatten)]
    metrics: ClassMetrics,
}

#[derive(Serialize)]
struct MetricsArtifact<'a> {
    experiment: &'a str,
    n_samples: usize,
    overall_accuracy: f64,
    classes: Vec<ClassEntry<'a>>,
    confusion_labels: &'a [ClassLabel],
    confusion_matrix: &'a [Vec<usize>],
}
