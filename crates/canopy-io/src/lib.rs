//! CSV input and JSON report output for the canopy pipeline.

mod domain;
mod error;
mod label_reader;
mod table_reader;
mod writer;

pub use domain::ExperimentName;
pub use error::IoError;
pub use label_reader::LabelReader;
pub use table_reader::TableReader;
pub use writer::ReportWriter;
