//! Per-class accuracy, precision, and recall.

use std::collections::BTreeMap;

use tracing::debug;

use crate::confusion::ConfusionMatrix;
use crate::error::CoreError;

/// Accuracy, precision, and recall for a single class.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ClassMetrics {
    /// Correct predictions among samples whose true label is this class.
    pub accuracy: f64,
    /// TP / (TP + FP). 0.0 if nothing was predicted as this class.
    pub precision: f64,
    /// TP / (TP + FN).
    pub recall: f64,
}

/// Per-class metrics as three parallel mappings keyed by class label.
///
/// Keys are exactly the classes present in the ground-truth labels.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PerClassMetrics<L: Ord> {
    /// Per-class accuracy.
    pub accuracy: BTreeMap<L, f64>,
    /// Per-class precision.
    pub precision: BTreeMap<L, f64>,
    /// Per-class recall.
    pub recall: BTreeMap<L, f64>,
}

impl<L: Ord + Clone> PerClassMetrics<L> {
    /// Derive per-class metrics from a confusion matrix.
    ///
    /// Classes that occur only among predictions are skipped.
    #[must_use]
    pub fn from_confusion(cm: &ConfusionMatrix<L>) -> Self {
        let mut accuracy = BTreeMap::new();
        let mut precision = BTreeMap::new();
        let mut recall = BTreeMap::new();

        for (c, class) in cm.classes().iter().enumerate() {
            let support = cm.support(c);
            if support == 0 {
                continue;
            }
            let tp = cm.true_positives(c) as f64;
            let predicted = cm.predicted_count(c);
            let class_recall = tp / support as f64;

            accuracy.insert(class.clone(), class_recall);
            precision.insert(
                class.clone(),
                if predicted == 0 { 0.0 } else { tp / predicted as f64 },
            );
            recall.insert(class.clone(), class_recall);
        }

        Self {
            accuracy,
            precision,
            recall,
        }
    }

    /// Return the metrics for one class, if it occurs in the labels.
    #[must_use]
    pub fn get(&self, class: &L) -> Option<ClassMetrics> {
        Some(ClassMetrics {
            accuracy: *self.accuracy.get(class)?,
            precision: *self.precision.get(class)?,
            recall: *self.recall.get(class)?,
        })
    }

    /// Iterate classes in ascending order with their metrics.
    pub fn iter(&self) -> impl Iterator<Item = (&L, ClassMetrics)> + '_ {
        self.accuracy.iter().map(|(class, &accuracy)| {
            (
                class,
                ClassMetrics {
                    accuracy,
                    precision: self.precision[class],
                    recall: self.recall[class],
                },
            )
        })
    }

    /// Return the number of classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.accuracy.len()
    }
}

/// Compute per-class accuracy, precision, and recall.
///
/// `labels[i]` is the ground truth for `predictions[i]`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`CoreError::LengthMismatch`] | lengths differ, or both are empty |
pub fn compute_metrics<L: Ord + Clone>(
    labels: &[L],
    predictions: &[L],
) -> Result<PerClassMetrics<L>, CoreError> {
    let cm = ConfusionMatrix::from_labels(labels, predictions)?;
    let metrics = PerClassMetrics::from_confusion(&cm);
    debug!(
        n_samples = labels.len(),
        n_classes = metrics.n_classes(),
        accuracy = cm.accuracy(),
        "metrics computed"
    );
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::ClassLabel;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn half_right_binary() {
        let m = compute_metrics(&[0, 0, 1, 1], &[0, 1, 1, 0]).unwrap();
        for class in [0, 1] {
            assert!(close(m.accuracy[&class], 0.5));
            assert!(close(m.precision[&class], 0.5));
            assert!(close(m.recall[&class], 0.5));
        }
        assert_eq!(m.n_classes(), 2);
    }

    #[test]
    fn matches_manual_confusion_counts() {
        // class 0: TP=2 FP=1 FN=0
        // class 1: TP=1 FP=0 FN=1
        // class 2: TP=1 FP=1 FN=1
        let labels = [0, 0, 1, 1, 2, 2];
        let preds = [0, 0, 1, 2, 2, 0];
        let m = compute_metrics(&labels, &preds).unwrap();

        assert!(close(m.precision[&0], 2.0 / 3.0));
        assert!(close(m.recall[&0], 1.0));
        assert!(close(m.precision[&1], 1.0));
        assert!(close(m.recall[&1], 0.5));
        assert!(close(m.precision[&2], 0.5));
        assert!(close(m.recall[&2], 0.5));
        assert_eq!(m.accuracy, m.recall);
    }

    #[test]
    fn never_predicted_class_has_zero_precision() {
        let m = compute_metrics(&[0, 1, 1], &[0, 0, 0]).unwrap();
        let one = m.get(&1).unwrap();
        assert_eq!(one.precision, 0.0);
        assert_eq!(one.recall, 0.0);
        assert_eq!(one.accuracy, 0.0);
    }

    #[test]
    fn prediction_only_class_is_not_reported() {
        let m = compute_metrics(&[0, 0], &[0, 9]).unwrap();
        assert!(m.get(&9).is_none());
        assert_eq!(m.n_classes(), 1);
        assert!(close(m.precision[&0], 1.0));
    }

    #[test]
    fn length_mismatch() {
        let err = compute_metrics(&[0, 1], &[0]).unwrap_err();
        assert!(matches!(err, CoreError::LengthMismatch { labels: 2, predictions: 1 }));
    }

    #[test]
    fn empty_inputs_rejected() {
        let err = compute_metrics::<i64>(&[], &[]).unwrap_err();
        assert!(matches!(err, CoreError::LengthMismatch { .. }));
    }

    #[test]
    fn categorical_labels_iterate_in_order() {
        let labels: Vec<ClassLabel> = ["b", "a", "b"].into_iter().map(ClassLabel::from).collect();
        let preds: Vec<ClassLabel> = ["b", "b", "b"].into_iter().map(ClassLabel::from).collect();
        let m = compute_metrics(&labels, &preds).unwrap();
        let order: Vec<String> = m.iter().map(|(c, _)| c.to_string()).collect();
        assert_eq!(order, vec!["a", "b"]);
        let b = m.get(&ClassLabel::from("b")).unwrap();
        assert!(close(b.precision, 2.0 / 3.0));
        assert!(close(b.recall, 1.0));
    }
}
