//! Best-split search by weighted entropy.

use tracing::{debug, info, instrument};

use crate::dataset::Dataset;
use crate::entropy::{EncodedLabels, Entropy, majority, weighted_entropy};
use crate::error::CoreError;
use crate::label::ClassLabel;

/// Strategy for enumerating candidate thresholds.
///
/// Both strategies visit the same thresholds in the same order and score
/// each from identical class counts, so they return identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMethod {
    /// Re-partition every row for every candidate: O(F · V · N).
    Exhaustive,
    /// Sort each feature once and move class counts across the boundary:
    /// O(F · N log N).
    #[default]
    Sweep,
}

/// Size and majority class of each side of the chosen split.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SplitSides {
    /// Rows with `value <= threshold`.
    pub n_left: usize,
    /// Rows with `value > threshold`.
    pub n_right: usize,
    /// Most frequent class on the left side.
    pub left_class: ClassLabel,
    /// Most frequent class on the right side.
    pub right_class: ClassLabel,
}

/// Outcome of a split search.
///
/// When no feature has two distinct values there is no candidate; the
/// result then has no feature, no threshold, and [`Entropy::UNSPLIT`].
/// That is a terminal node, not an error.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BestSplit {
    /// Name of the winning feature column.
    pub feature: Option<String>,
    /// Winning threshold: rows with `value <= threshold` go left.
    pub threshold: Option<f64>,
    /// Weighted entropy of the winning split.
    pub entropy: Entropy,
    /// Side details of the winning split.
    pub sides: Option<SplitSides>,
    /// Number of (feature, threshold) candidates scored.
    pub n_candidates: usize,
}

impl BestSplit {
    fn unsplit() -> Self {
        Self {
            feature: None,
            threshold: None,
            entropy: Entropy::UNSPLIT,
            sides: None,
            n_candidates: 0,
        }
    }

    /// Return `true` when no usable split exists.
    #[must_use]
    pub fn is_unsplit(&self) -> bool {
        self.feature.is_none()
    }
}

/// Best candidate seen within one feature column.
struct Candidate {
    threshold: f64,
    entropy: Entropy,
    left_counts: Vec<usize>,
    right_counts: Vec<usize>,
}

/// Entropy-minimizing split finder.
///
/// Construct via [`SplitFinder::new`], then chain `with_method` if desired.
/// Holds no mutable state; a single finder may be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct SplitFinder {
    method: SplitMethod,
}

impl SplitFinder {
    /// Create a finder using [`SplitMethod::Sweep`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the candidate enumeration strategy.
    #[must_use]
    pub fn with_method(mut self, method: SplitMethod) -> Self {
        self.method = method;
        self
    }

    /// Return the candidate enumeration strategy.
    #[must_use]
    pub fn method(&self) -> SplitMethod {
        self.method
    }

    /// Find the (feature, threshold) pair with the lowest weighted entropy.
    ///
    /// Features are visited in column order, skipping `target`; within a
    /// feature, thresholds are midpoints of consecutive distinct values in
    /// ascending order. A later candidate replaces the best only when its
    /// entropy is strictly lower, so ties keep the first one seen.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`CoreError::MissingTargetColumn`] | no column named `target` |
    /// | [`CoreError::NonDiscreteTarget`] | a numeric target cell is not integral |
    /// | [`CoreError::SingleClassTarget`] | fewer than two distinct classes |
    /// | [`CoreError::NonNumericFeature`] | a non-target column is categorical |
    #[instrument(skip_all, fields(target_column = %target, method = ?self.method, n_rows = dataset.n_rows()))]
    pub fn find_best_split(&self, dataset: &Dataset, target: &str) -> Result<BestSplit, CoreError> {
        let labels = EncodedLabels::new(&dataset.class_labels(target)?);
        let n_classes = labels.n_classes();
        if n_classes < 2 {
            return Err(CoreError::SingleClassTarget {
                column: target.to_string(),
                n_classes,
            });
        }

        let mut best = BestSplit::unsplit();
        let mut best_counts: Option<(Vec<usize>, Vec<usize>)> = None;

        for column in dataset.columns().iter().filter(|c| c.name() != target) {
            let values = column
                .as_numeric()
                .ok_or_else(|| CoreError::NonNumericFeature {
                    column: column.name().to_string(),
                })?;

            let (candidate, n_scored) = match self.method {
                SplitMethod::Exhaustive => scan_exhaustive(values, &labels),
                SplitMethod::Sweep => scan_sweep(values, &labels),
            };
            best.n_candidates += n_scored;

            let Some(candidate) = candidate else {
                debug!(feature = column.name(), "no candidate thresholds");
                continue;
            };
            debug!(
                feature = column.name(),
                n_scored,
                threshold = candidate.threshold,
                entropy = candidate.entropy.value(),
                "feature scanned"
            );

            if candidate.entropy < best.entropy {
                best.feature = Some(column.name().to_string());
                best.threshold = Some(candidate.threshold);
                best.entropy = candidate.entropy;
                best_counts = Some((candidate.left_counts, candidate.right_counts));
            }
        }

        best.sides = best_counts.map(|(left, right)| SplitSides {
            n_left: left.iter().sum(),
            n_right: right.iter().sum(),
            left_class: labels.classes[majority(&left)].clone(),
            right_class: labels.classes[majority(&right)].clone(),
        });

        info!(
            feature = best.feature.as_deref().unwrap_or("-"),
            threshold = ?best.threshold,
            entropy = best.entropy.value(),
            n_candidates = best.n_candidates,
            "split search complete"
        );
        Ok(best)
    }
}

/// Find the best split of `dataset` on `target` with the default finder.
///
/// # Errors
///
/// See [`SplitFinder::find_best_split`].
pub fn find_best_split(dataset: &Dataset, target: &str) -> Result<BestSplit, CoreError> {
    SplitFinder::new().find_best_split(dataset, target)
}

/// Keep `candidate` if it strictly beats `best`.
fn offer(best: &mut Option<Candidate>, candidate: Candidate) {
    if best.as_ref().is_none_or(|b| candidate.entropy < b.entropy) {
        *best = Some(candidate);
    }
}

/// Score every midpoint by re-partitioning all rows.
fn scan_exhaustive(values: &[f64], labels: &EncodedLabels) -> (Option<Candidate>, usize) {
    let n_classes = labels.n_classes();
    let mut distinct = values.to_vec();
    distinct.sort_unstable_by(f64::total_cmp);
    distinct.dedup();

    let mut best = None;
    let mut n_scored = 0;
    for pair in distinct.windows(2) {
        let threshold = (pair[0] + pair[1]) / 2.0;
        let mut left_counts = vec![0usize; n_classes];
        let mut right_counts = vec![0usize; n_classes];
        for (&value, &code) in values.iter().zip(&labels.codes) {
            if value <= threshold {
                left_counts[code] += 1;
            } else {
                right_counts[code] += 1;
            }
        }
        let n_left: usize = left_counts.iter().sum();
        let entropy = weighted_entropy(&left_counts, n_left, &right_counts, values.len() - n_left);
        n_scored += 1;
        offer(
            &mut best,
            Candidate {
                threshold,
                entropy,
                left_counts,
                right_counts,
            },
        );
    }
    (best, n_scored)
}

/// Score every midpoint with one sort and incremental class counts.
fn scan_sweep(values: &[f64], labels: &EncodedLabels) -> (Option<Candidate>, usize) {
    let n_samples = values.len();
    let mut sorted: Vec<(f64, usize)> = values
        .iter()
        .zip(&labels.codes)
        .map(|(&v, &c)| (v, c))
        .collect();
    sorted.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

    let mut left_counts = vec![0usize; labels.n_classes()];
    let mut right_counts = labels.class_counts();
    let mut n_left = 0;

    let mut best = None;
    let mut n_scored = 0;
    for i in 0..n_samples.saturating_sub(1) {
        let val_i = sorted[i].0;
        let val_next = sorted[i + 1].0;
        if val_i == val_next {
            continue;
        }
        let threshold = (val_i + val_next) / 2.0;

        // The midpoint may round up onto `val_next`; move rows by the
        // actual `<=` test so partitions match a full re-scan.
        while n_left < n_samples && sorted[n_left].0 <= threshold {
            let class = sorted[n_left].1;
            left_counts[class] += 1;
            right_counts[class] -= 1;
            n_left += 1;
        }

        let entropy = weighted_entropy(&left_counts, n_left, &right_counts, n_samples - n_left);
        n_scored += 1;
        if best.as_ref().is_none_or(|b: &Candidate| entropy < b.entropy) {
            best = Some(Candidate {
                threshold,
                entropy,
                left_counts: left_counts.clone(),
                right_counts: right_counts.clone(),
            });
        }
    }
    (best, n_scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;

    fn xy(x: Vec<f64>, y: Vec<f64>) -> Dataset {
        Dataset::new(vec![Column::numeric("x", x), Column::numeric("y", y)]).unwrap()
    }

    fn both_methods(dataset: &Dataset, target: &str) -> BestSplit {
        let exhaustive = SplitFinder::new()
            .with_method(SplitMethod::Exhaustive)
            .find_best_split(dataset, target)
            .unwrap();
        let sweep = SplitFinder::new()
            .with_method(SplitMethod::Sweep)
            .find_best_split(dataset, target)
            .unwrap();
        assert_eq!(exhaustive, sweep);
        sweep
    }

    #[test]
    fn perfect_split() {
        let ds = xy(vec![1.0, 2.0, 3.0, 4.0], vec![0.0, 0.0, 1.0, 1.0]);
        let best = both_methods(&ds, "y");
        assert_eq!(best.feature.as_deref(), Some("x"));
        assert_eq!(best.threshold, Some(2.5));
        assert_eq!(best.entropy.value(), 0.0);
        assert_eq!(best.n_candidates, 3);
        assert_eq!(
            best.sides,
            Some(SplitSides {
                n_left: 2,
                n_right: 2,
                left_class: ClassLabel::Integer(0),
                right_class: ClassLabel::Integer(1),
            })
        );
    }

    #[test]
    fn unsorted_rows_with_duplicates() {
        let ds = xy(
            vec![3.0, 1.0, 3.0, 2.0, 1.0, 4.0],
            vec![1.0, 0.0, 1.0, 0.0, 0.0, 1.0],
        );
        let best = both_methods(&ds, "y");
        assert_eq!(best.threshold, Some(2.5));
        assert_eq!(best.entropy.value(), 0.0);
        // Distinct values 1, 2, 3, 4 give three midpoints.
        assert_eq!(best.n_candidates, 3);
    }

    #[test]
    fn tie_keeps_smallest_threshold() {
        // t=1.5 and t=3.5 both score 0.75 * H(1/3).
        let ds = xy(vec![1.0, 2.0, 3.0, 4.0], vec![0.0, 1.0, 1.0, 0.0]);
        let best = both_methods(&ds, "y");
        assert_eq!(best.threshold, Some(1.5));
    }

    #[test]
    fn tie_keeps_first_feature() {
        let ds = Dataset::new(vec![
            Column::numeric("b", vec![1.0, 2.0, 3.0, 4.0]),
            Column::numeric("a", vec![10.0, 20.0, 30.0, 40.0]),
            Column::numeric("y", vec![0.0, 0.0, 1.0, 1.0]),
        ])
        .unwrap();
        let best = both_methods(&ds, "y");
        assert_eq!(best.feature.as_deref(), Some("b"));
        assert_eq!(best.threshold, Some(2.5));
    }

    #[test]
    fn target_column_is_not_a_feature() {
        // The target sits first; only "x" may be chosen.
        let ds = Dataset::new(vec![
            Column::numeric("y", vec![0.0, 1.0, 0.0, 1.0]),
            Column::numeric("x", vec![5.0, 5.0, 6.0, 6.0]),
        ])
        .unwrap();
        let best = both_methods(&ds, "y");
        assert_eq!(best.feature.as_deref(), Some("x"));
        assert!((best.entropy.value() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_feature_is_skipped() {
        let ds = Dataset::new(vec![
            Column::numeric("flat", vec![7.0, 7.0, 7.0, 7.0]),
            Column::numeric("x", vec![1.0, 2.0, 3.0, 4.0]),
            Column::numeric("y", vec![0.0, 0.0, 1.0, 1.0]),
        ])
        .unwrap();
        let best = both_methods(&ds, "y");
        assert_eq!(best.feature.as_deref(), Some("x"));
        assert_eq!(best.n_candidates, 3);
    }

    #[test]
    fn all_constant_features_return_unsplit() {
        let ds = xy(vec![7.0, 7.0, 7.0], vec![0.0, 1.0, 1.0]);
        let best = both_methods(&ds, "y");
        assert!(best.is_unsplit());
        assert_eq!(best.threshold, None);
        assert_eq!(best.sides, None);
        assert!(best.entropy.value().is_infinite());
        assert_eq!(best.n_candidates, 0);
    }

    #[test]
    fn missing_target_is_invalid_input() {
        let ds = xy(vec![1.0, 2.0], vec![0.0, 1.0]);
        let err = find_best_split(&ds, "target").unwrap_err();
        assert!(matches!(err, CoreError::MissingTargetColumn { .. }));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn single_class_is_invalid_input() {
        let ds = xy(vec![1.0, 2.0, 3.0], vec![1.0, 1.0, 1.0]);
        let err = find_best_split(&ds, "y").unwrap_err();
        assert!(matches!(err, CoreError::SingleClassTarget { n_classes: 1, .. }));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn categorical_feature_is_rejected() {
        let ds = Dataset::new(vec![
            Column::categorical("colour", vec!["red".into(), "blue".into()]),
            Column::numeric("y", vec![0.0, 1.0]),
        ])
        .unwrap();
        let err = find_best_split(&ds, "y").unwrap_err();
        assert!(matches!(err, CoreError::NonNumericFeature { column } if column == "colour"));
    }

    #[test]
    fn categorical_target() {
        let ds = Dataset::new(vec![
            Column::numeric("petal", vec![1.4, 1.3, 4.7, 4.5, 6.0]),
            Column::categorical(
                "species",
                vec![
                    "setosa".into(),
                    "setosa".into(),
                    "versicolor".into(),
                    "versicolor".into(),
                    "virginica".into(),
                ],
            ),
        ])
        .unwrap();
        let best = both_methods(&ds, "species");
        assert_eq!(best.threshold, Some((1.4 + 4.5) / 2.0));
        let sides = best.sides.unwrap();
        assert_eq!(sides.left_class, ClassLabel::from("setosa"));
        assert_eq!(sides.right_class, ClassLabel::from("versicolor"));
    }

    #[test]
    fn entropy_within_bounds() {
        let ds = xy(
            vec![0.3, 0.1, 0.7, 0.2, 0.9, 0.4, 0.8, 0.6],
            vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0, 0.0, 1.0],
        );
        let best = both_methods(&ds, "y");
        let h = best.entropy.value();
        assert!(h >= 0.0 && h <= 3.0_f64.log2(), "entropy {h} out of bounds");
    }

    #[test]
    fn repeated_search_is_identical() {
        let ds = xy(
            vec![2.0, 8.0, 5.0, 1.0, 9.0, 3.0],
            vec![1.0, 0.0, 1.0, 0.0, 0.0, 1.0],
        );
        let finder = SplitFinder::new().with_method(SplitMethod::Exhaustive);
        let first = finder.find_best_split(&ds, "y").unwrap();
        let second = finder.find_best_split(&ds, "y").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn default_method_is_sweep() {
        assert_eq!(SplitFinder::new().method(), SplitMethod::Sweep);
    }
}
