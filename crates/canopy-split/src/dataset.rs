//! Column-major tabular dataset with named columns.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::label::ClassLabel;

/// Cell storage for a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    /// Finite numeric cells.
    Numeric(Vec<f64>),
    /// Free-text cells, usable only as a target column.
    Categorical(Vec<String>),
}

impl ColumnValues {
    fn len(&self) -> usize {
        match self {
            ColumnValues::Numeric(v) => v.len(),
            ColumnValues::Categorical(v) => v.len(),
        }
    }
}

/// A named dataset column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: ColumnValues,
}

impl Column {
    /// Create a numeric column.
    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Numeric(values),
        }
    }

    /// Create a categorical column.
    pub fn categorical(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Categorical(values),
        }
    }

    /// Return the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the column cells.
    #[must_use]
    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    /// Return the numeric cells, or `None` for a categorical column.
    #[must_use]
    pub fn as_numeric(&self) -> Option<&[f64]> {
        match &self.values {
            ColumnValues::Numeric(v) => Some(v.as_slice()),
            ColumnValues::Categorical(_) => None,
        }
    }

    /// Return the number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Return `true` if the column has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An immutable, validated table of named columns.
///
/// Every column holds exactly `n_rows()` cells; row `i` is the `i`-th cell
/// of each column. Column order is the order given at construction and is
/// the order in which split search visits features.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    /// Build a dataset from columns.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`CoreError::NoColumns`] | `columns` is empty |
    /// | [`CoreError::EmptyDataset`] | columns hold zero rows |
    /// | [`CoreError::DuplicateColumn`] | two columns share a name |
    /// | [`CoreError::RaggedColumn`] | column lengths differ |
    /// | [`CoreError::NonFiniteValue`] | a numeric cell is NaN or infinite |
    pub fn new(columns: Vec<Column>) -> Result<Self, CoreError> {
        let first = columns.first().ok_or(CoreError::NoColumns)?;
        let n_rows = first.len();
        if n_rows == 0 {
            return Err(CoreError::EmptyDataset);
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(CoreError::DuplicateColumn {
                    name: column.name.clone(),
                });
            }
            if column.len() != n_rows {
                return Err(CoreError::RaggedColumn {
                    name: column.name.clone(),
                    expected: n_rows,
                    got: column.len(),
                });
            }
            if let ColumnValues::Numeric(values) = &column.values
                && let Some(row_index) = values.iter().position(|v| !v.is_finite())
            {
                return Err(CoreError::NonFiniteValue {
                    column: column.name.clone(),
                    row_index,
                });
            }
        }

        Ok(Self { columns, n_rows })
    }

    /// Build an all-numeric dataset from row-major values.
    ///
    /// `rows[sample_idx][column_idx]`, with `names[column_idx]` naming each column.
    ///
    /// # Errors
    ///
    /// Same as [`Dataset::new`], plus [`CoreError::FeatureCountMismatch`]
    /// when a row's width differs from `names.len()`.
    pub fn from_rows(names: &[&str], rows: &[Vec<f64>]) -> Result<Self, CoreError> {
        let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(rows.len()); names.len()];
        for (sample_index, row) in rows.iter().enumerate() {
            if row.len() != names.len() {
                return Err(CoreError::FeatureCountMismatch {
                    expected: names.len(),
                    got: row.len(),
                    sample_index,
                });
            }
            for (col, &value) in columns.iter_mut().zip(row) {
                col.push(value);
            }
        }
        Self::new(
            names
                .iter()
                .zip(columns)
                .map(|(&name, values)| Column::numeric(name, values))
                .collect(),
        )
    }

    /// Return the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Return the number of columns, target included.
    #[must_use]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Return all columns in order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Return the column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    /// Look up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Read `target` as a sequence of class labels, one per row.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`CoreError::MissingTargetColumn`] | no column named `target` |
    /// | [`CoreError::NonDiscreteTarget`] | a numeric target cell is not integral |
    pub fn class_labels(&self, target: &str) -> Result<Vec<ClassLabel>, CoreError> {
        let column = self
            .column(target)
            .ok_or_else(|| CoreError::MissingTargetColumn {
                column: target.to_string(),
            })?;
        match &column.values {
            ColumnValues::Numeric(values) => values
                .iter()
                .enumerate()
                .map(|(row_index, &value)| {
                    ClassLabel::from_numeric(value).ok_or_else(|| CoreError::NonDiscreteTarget {
                        column: target.to_string(),
                        row_index,
                        value,
                    })
                })
                .collect(),
            ColumnValues::Categorical(values) => {
                Ok(values.iter().map(|raw| ClassLabel::parse(raw)).collect())
            }
        }
    }
}
