/// Errors from split search and metric evaluation.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Returned when a dataset is built with zero rows.
    #[error("dataset has zero rows")]
    EmptyDataset,

    /// Returned when a dataset is built with zero columns.
    #[error("dataset has zero columns")]
    NoColumns,

    /// Returned when two columns share the same name.
    #[error("duplicate column name \"{name}\"")]
    DuplicateColumn {
        /// The repeated column name.
        name: String,
    },

    /// Returned when a column has a different number of rows than the first column.
    #[error("column \"{name}\" has {got} rows, expected {expected}")]
    RaggedColumn {
        /// Name of the offending column.
        name: String,
        /// Row count of the first column.
        expected: usize,
        /// Row count of the offending column.
        got: usize,
    },

    /// Returned when a row has a different number of values than there are column names.
    #[error("row {sample_index} has {got} values, expected {expected}")]
    FeatureCountMismatch {
        /// The expected number of values.
        expected: usize,
        /// The actual number of values in the row.
        got: usize,
        /// The zero-based index of the offending row.
        sample_index: usize,
    },

    /// Returned when a numeric column holds NaN or an infinite value.
    #[error("non-finite value in column \"{column}\" at row {row_index}")]
    NonFiniteValue {
        /// Name of the offending column.
        column: String,
        /// Zero-based row index of the value.
        row_index: usize,
    },

    /// Returned when the requested target column does not exist.
    #[error("target column \"{column}\" not found in dataset")]
    MissingTargetColumn {
        /// The requested target column name.
        column: String,
    },

    /// Returned when the target column holds fewer than two distinct classes.
    #[error("target column \"{column}\" has {n_classes} distinct class(es), need at least 2")]
    SingleClassTarget {
        /// The target column name.
        column: String,
        /// Number of distinct classes found.
        n_classes: usize,
    },

    /// Returned when a numeric target value is not integral and cannot act as a class label.
    #[error("target column \"{column}\" has non-integral value {value} at row {row_index}")]
    NonDiscreteTarget {
        /// The target column name.
        column: String,
        /// Zero-based row index of the value.
        row_index: usize,
        /// The offending value.
        value: f64,
    },

    /// Returned when a non-target column is categorical and cannot be thresholded.
    #[error("feature column \"{column}\" is not numeric")]
    NonNumericFeature {
        /// Name of the categorical feature column.
        column: String,
    },

    /// Returned when label and prediction sequences differ in length or are empty.
    #[error("labels and predictions must be non-empty and equal in length, got {labels} labels and {predictions} predictions")]
    LengthMismatch {
        /// Number of ground-truth labels.
        labels: usize,
        /// Number of predictions.
        predictions: usize,
    },
}

impl CoreError {
    /// Return `true` for errors caused by a structurally invalid split-search input.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            CoreError::MissingTargetColumn { .. }
                | CoreError::SingleClassTarget { .. }
                | CoreError::NonDiscreteTarget { .. }
                | CoreError::NonNumericFeature { .. }
        )
    }
}
