//! CSV reader for a single column of class labels.

use std::path::{Path, PathBuf};

use canopy_split::ClassLabel;
use tracing::{info, instrument};

use crate::IoError;
use crate::table_reader::read_records;

/// Reads one column of class labels from a CSV file with a header.
///
/// Reads the first column unless [`LabelReader::with_column`] names
/// another. Fits both a dataset's target column and a one-column
/// prediction file such as:
///
/// ```text
/// Predictions
/// 0
/// 2
/// ```
///
/// Integral cells become [`ClassLabel::Integer`], anything else
/// [`ClassLabel::Category`].
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::NoColumns`] | Header row is empty |
/// | [`IoError::MissingColumn`] | Named column is not in the header |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
pub struct LabelReader {
    path: PathBuf,
    column: Option<String>,
}

impl LabelReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            column: None,
        }
    }

    /// Read the column with this header name instead of the first column.
    #[must_use]
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Read the labels in row order.
    #[instrument(skip(self), fields(path = %self.path.display(), column = ?self.column))]
    pub fn read(&self) -> Result<Vec<ClassLabel>, IoError> {
        let (header, records) = read_records(&self.path)?;
        if header.is_empty() {
            return Err(IoError::NoColumns {
                path: self.path.clone(),
            });
        }

        let col_index = match &self.column {
            None => 0,
            Some(name) => header.iter().position(|h| h == name).ok_or_else(|| {
                IoError::MissingColumn {
                    path: self.path.clone(),
                    column: name.clone(),
                }
            })?,
        };

        let mut labels = Vec::with_capacity(records.len());
        for (row_index, record) in records.iter().enumerate() {
            if record.len() != header.len() {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: header.len(),
                    got: record.len(),
                });
            }
            labels.push(ClassLabel::parse(&record[col_index]));
        }

        if labels.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(n_labels = labels.len(), column = %header[col_index], "labels loaded");
        Ok(labels)
    }
}
