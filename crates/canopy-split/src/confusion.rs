//! Label-keyed confusion matrix.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::CoreError;

/// A confusion matrix for multi-class classification.
///
/// Classes are the sorted union of every true and predicted label. Entry
/// `matrix[t][p]` counts samples whose true class is `classes[t]` and whose
/// predicted class is `classes[p]`.
#[derive(Debug, Clone)]
pub struct ConfusionMatrix<L> {
    classes: Vec<L>,
    matrix: Vec<Vec<usize>>,
}

impl<L: Ord + Clone> ConfusionMatrix<L> {
    /// Build a confusion matrix from index-aligned true and predicted labels.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`CoreError::LengthMismatch`] | lengths differ, or both are empty |
    pub fn from_labels(true_labels: &[L], predicted: &[L]) -> Result<Self, CoreError> {
        if true_labels.is_empty() || true_labels.len() != predicted.len() {
            return Err(CoreError::LengthMismatch {
                labels: true_labels.len(),
                predictions: predicted.len(),
            });
        }

        let classes: Vec<L> = true_labels
            .iter()
            .chain(predicted)
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let n_classes = classes.len();
        let mut matrix = vec![vec![0usize; n_classes]; n_classes];
        for (t, p) in true_labels.iter().zip(predicted) {
            // Both labels are in `classes` by construction.
            let (Ok(ti), Ok(pi)) = (classes.binary_search(t), classes.binary_search(p)) else {
                continue;
            };
            matrix[ti][pi] += 1;
        }
        Ok(Self { classes, matrix })
    }

    /// Return the position of `class` in [`ConfusionMatrix::classes`].
    #[must_use]
    pub fn class_index(&self, class: &L) -> Option<usize> {
        self.classes.binary_search(class).ok()
    }
}

impl<L> ConfusionMatrix<L> {
    /// Overall accuracy: proportion of correct predictions.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        let correct: usize = (0..self.n_classes()).map(|i| self.matrix[i][i]).sum();
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64
        }
    }

    /// Samples of class `c` predicted as `c`.
    #[must_use]
    pub fn true_positives(&self, c: usize) -> usize {
        self.matrix[c][c]
    }

    /// Samples of another class predicted as `c`.
    #[must_use]
    pub fn false_positives(&self, c: usize) -> usize {
        self.predicted_count(c) - self.matrix[c][c]
    }

    /// Samples of class `c` predicted as another class.
    #[must_use]
    pub fn false_negatives(&self, c: usize) -> usize {
        self.support(c) - self.matrix[c][c]
    }

    /// Number of samples whose true class is `c`.
    #[must_use]
    pub fn support(&self, c: usize) -> usize {
        self.matrix[c].iter().sum()
    }

    /// Number of samples predicted as `c`.
    #[must_use]
    pub fn predicted_count(&self, c: usize) -> usize {
        self.matrix.iter().map(|row| row[c]).sum()
    }

    /// Total number of samples.
    #[must_use]
    pub fn total(&self) -> usize {
        self.matrix.iter().flat_map(|row| row.iter()).sum()
    }

    /// Return the sorted class labels indexing rows and columns.
    #[must_use]
    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    /// Return the underlying matrix rows.
    #[must_use]
    pub fn as_rows(&self) -> &[Vec<usize>] {
        &self.matrix
    }

    /// Return the number of classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }
}

impl<L: fmt::Display> fmt::Display for ConfusionMatrix<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Header row
        write!(f, "{:>10}", "")?;
        for class in &self.classes {
            write!(f, " {:>10}", format!("pred_{class}"))?;
        }
        writeln!(f)?;

        for (class, row) in self.classes.iter().zip(&self.matrix) {
            write!(f, "{:>10}", format!("true_{class}"))?;
            for val in row {
                write!(f, " {val:>10}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::ClassLabel;

    #[test]
    fn perfect_predictions() {
        let labels = vec![0, 0, 1, 1, 2, 2];
        let cm = ConfusionMatrix::from_labels(&labels, &labels).unwrap();
        assert!((cm.accuracy() - 1.0).abs() < f64::EPSILON);
        for c in 0..cm.n_classes() {
            assert_eq!(cm.false_positives(c), 0);
            assert_eq!(cm.false_negatives(c), 0);
        }
    }

    #[test]
    fn known_confusion_counts() {
        // True: [0,0,0, 1,1,1, 2,2,2]
        // Pred: [0,0,1, 1,1,2, 2,2,0]
        let true_labels = vec![0, 0, 0, 1, 1, 1, 2, 2, 2];
        let predicted = vec![0, 0, 1, 1, 1, 2, 2, 2, 0];
        let cm = ConfusionMatrix::from_labels(&true_labels, &predicted).unwrap();

        for c in 0..3 {
            assert_eq!(cm.true_positives(c), 2);
            assert_eq!(cm.false_positives(c), 1);
            assert_eq!(cm.false_negatives(c), 1);
            assert_eq!(cm.support(c), 3);
        }
        assert!((cm.accuracy() - 6.0 / 9.0).abs() < 1e-10);
    }

    #[test]
    fn classes_include_prediction_only_labels() {
        let cm = ConfusionMatrix::from_labels(&[1, 1], &[1, 7]).unwrap();
        assert_eq!(cm.classes(), &[1, 7]);
        assert_eq!(cm.class_index(&7), Some(1));
        assert_eq!(cm.support(1), 0);
        assert_eq!(cm.predicted_count(1), 1);
    }

    #[test]
    fn as_rows_returns_matrix() {
        let cm = ConfusionMatrix::from_labels(&[0, 0, 1, 1], &[0, 1, 0, 1]).unwrap();
        let rows = cm.as_rows();
        assert_eq!(rows[0], vec![1, 1]);
        assert_eq!(rows[1], vec![1, 1]);
        assert_eq!(cm.total(), 4);
    }

    #[test]
    fn empty_labels_error() {
        let err = ConfusionMatrix::<i64>::from_labels(&[], &[]).unwrap_err();
        assert!(matches!(err, CoreError::LengthMismatch { labels: 0, predictions: 0 }));
    }

    #[test]
    fn length_mismatch_error() {
        let err = ConfusionMatrix::from_labels(&[0, 1, 1], &[0, 1]).unwrap_err();
        assert!(matches!(err, CoreError::LengthMismatch { labels: 3, predictions: 2 }));
    }

    #[test]
    fn display_formatting() {
        let labels = vec![ClassLabel::from("cat"), ClassLabel::from("dog")];
        let cm = ConfusionMatrix::from_labels(&labels, &labels).unwrap();
        let output = format!("{cm}");
        assert!(output.contains("pred_cat"));
        assert!(output.contains("true_dog"));
    }
}
