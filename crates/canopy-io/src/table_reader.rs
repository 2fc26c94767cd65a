//! CSV table reader producing a validated [`Dataset`].

use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use canopy_split::{Column, Dataset};
use tracing::{debug, info, instrument};

use crate::IoError;

/// Reads a labeled tabular dataset from a CSV file.
///
/// Expected CSV format:
/// - Header row required; every column is named
/// - `feature_0,feature_1,...,target`
/// - All rows must have the same number of columns as the header
///
/// A column is numeric when every cell parses as a number, otherwise it is
/// kept as categorical text. Surrounding whitespace is trimmed.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::NoColumns`] | Header row is empty |
/// | [`IoError::DuplicateColumn`] | Two header columns share a name |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::NonFiniteValue`] | Numeric column holds NaN or Inf |
pub struct TableReader {
    path: PathBuf,
}

impl TableReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the CSV file, returning a [`Dataset`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Dataset, IoError> {
        let (header, records) = read_records(&self.path)?;
        let n_cols = header.len();
        if n_cols == 0 {
            return Err(IoError::NoColumns {
                path: self.path.clone(),
            });
        }

        let mut seen = HashSet::with_capacity(n_cols);
        for name in &header {
            if !seen.insert(name.as_str()) {
                return Err(IoError::DuplicateColumn {
                    path: self.path.clone(),
                    name: name.clone(),
                });
            }
        }

        if records.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        let mut cells: Vec<Vec<String>> = vec![Vec::with_capacity(records.len()); n_cols];
        for (row_index, record) in records.iter().enumerate() {
            if record.len() != n_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: n_cols,
                    got: record.len(),
                });
            }
            for (col, cell) in cells.iter_mut().zip(record.iter()) {
                col.push(cell.to_string());
            }
        }

        let columns = header
            .into_iter()
            .zip(cells)
            .map(|(name, raw)| self.build_column(name, raw))
            .collect::<Result<Vec<_>, _>>()?;

        let dataset = Dataset::new(columns).map_err(|e| IoError::InvalidDataset {
            path: self.path.clone(),
            source: e,
        })?;

        info!(
            n_rows = dataset.n_rows(),
            n_columns = dataset.n_columns(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Type a column as numeric if every cell parses, categorical otherwise.
    fn build_column(&self, name: String, raw: Vec<String>) -> Result<Column, IoError> {
        let parsed: Option<Vec<f64>> = raw.iter().map(|s| s.parse::<f64>().ok()).collect();
        let Some(values) = parsed else {
            debug!(column = %name, "categorical column");
            return Ok(Column::categorical(name, raw));
        };
        if let Some(row_index) = values.iter().position(|v| !v.is_finite()) {
            return Err(IoError::NonFiniteValue {
                path: self.path.clone(),
                row_index,
                column: name,
                raw: raw[row_index].clone(),
            });
        }
        Ok(Column::numeric(name, values))
    }
}

/// Open `path` and return its trimmed header and every data record.
///
/// Rows may vary in width so callers can report their own
/// `InconsistentRowLength` instead of a low-level parse error.
pub(crate) fn read_records(
    path: &Path,
) -> Result<(Vec<String>, Vec<csv::StringRecord>), IoError> {
    let file = File::open(path).map_err(|e| IoError::FileNotFound {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let to_parse_error = |e: csv::Error| IoError::CsvParse {
        path: path.to_path_buf(),
        offset: e.position().map_or(0, |p| p.byte()),
        source: e,
    };

    let header: Vec<String> = rdr
        .headers()
        .map_err(to_parse_error)?
        .iter()
        .map(String::from)
        .collect();
    debug!(n_cols = header.len(), "read CSV header");

    let records = rdr
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_parse_error)?;
    Ok((header, records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn read_numeric_table() {
        let f = write_csv("x,z,target\n1.0,0.5,0\n2.0,0.25,0\n3.0,0.75,1\n");
        let ds = TableReader::new(f.path()).read().unwrap();
        assert_eq!(ds.n_rows(), 3);
        assert_eq!(ds.column_names().collect::<Vec<_>>(), vec!["x", "z", "target"]);
        assert_eq!(ds.column("z").unwrap().as_numeric().unwrap(), &[0.5, 0.25, 0.75]);
    }

    #[test]
    fn text_column_is_categorical() {
        let f = write_csv("petal,species\n1.4,setosa\n4.7,versicolor\n");
        let ds = TableReader::new(f.path()).read().unwrap();
        assert!(ds.column("petal").unwrap().as_numeric().is_some());
        assert!(ds.column("species").unwrap().as_numeric().is_none());
    }

    #[test]
    fn whitespace_is_trimmed() {
        let f = write_csv(" x , y \n 1 , 0 \n 2 , 1 \n");
        let ds = TableReader::new(f.path()).read().unwrap();
        assert_eq!(ds.column("x").unwrap().as_numeric().unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn error_file_not_found() {
        let result = TableReader::new(Path::new("/nonexistent/table.csv")).read();
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }

    #[test]
    fn error_empty_dataset() {
        let f = write_csv("x,target\n");
        let result = TableReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::EmptyDataset { .. })));
    }

    #[test]
    fn error_inconsistent_row_length() {
        let f = write_csv("x,y,target\n1,2,0\n1,2\n");
        let result = TableReader::new(f.path()).read();
        assert!(matches!(
            result,
            Err(IoError::InconsistentRowLength { row_index: 1, expected: 3, got: 2, .. })
        ));
    }

    #[test]
    fn error_non_finite() {
        let f = write_csv("x,target\n1.0,0\nNaN,1\n");
        let result = TableReader::new(f.path()).read();
        assert!(matches!(
            result,
            Err(IoError::NonFiniteValue { row_index: 1, .. })
        ));
    }

    #[test]
    fn error_duplicate_column() {
        let f = write_csv("x,x,target\n1,2,0\n");
        let result = TableReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::DuplicateColumn { name, .. }) if name == "x"));
    }
}
