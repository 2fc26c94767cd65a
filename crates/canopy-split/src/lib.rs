//! Entropy split search and per-class classification metrics.
//!
//! Finds the (feature, threshold) pair that minimizes the weighted base-2
//! entropy of a binary split over a labeled tabular dataset, and scores
//! predictions against ground truth with per-class accuracy, precision,
//! and recall.

mod confusion;
mod dataset;
mod entropy;
mod error;
mod label;
mod metrics;
mod split;

pub use confusion::ConfusionMatrix;
pub use dataset::{Column, ColumnValues, Dataset};
pub use entropy::{Entropy, entropy, weighted_entropy};
pub use error::CoreError;
pub use label::ClassLabel;
pub use metrics::{ClassMetrics, PerClassMetrics, compute_metrics};
pub use split::{BestSplit, SplitFinder, SplitMethod, SplitSides, find_best_split};
