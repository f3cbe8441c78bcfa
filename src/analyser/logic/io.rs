use crate::error::{AnalysisError, Result};
use polars::prelude::*;
use std::path::Path;

/// Rows scanned when inferring CSV column types.
const CSV_SCHEMA_INFERENCE_ROWS: usize = 10_000;

/// Loads a dataset from disk, picking the reader by file extension.
///
/// CSV (with a header row), Parquet and JSON are supported.
///
/// # Errors
///
/// [`AnalysisError::DataProcessing`] for spreadsheets, unknown extensions and
/// files polars cannot parse; [`AnalysisError::Io`] when the file cannot be opened.
pub fn load_df(path: &Path) -> Result<DataFrame> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    let df = match ext.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(Some(CSV_SCHEMA_INFERENCE_ROWS))
            .with_has_header(true)
            .finish()?
            .collect()?,
        "parquet" => ParquetReader::new(std::fs::File::open(path)?).finish()?,
        "json" => JsonReader::new(std::fs::File::open(path)?).finish()?,
        "xlsx" | "xls" => {
            return Err(AnalysisError::DataProcessing(format!(
                "Spreadsheet input (.{ext}) is not supported; export the sheet to CSV first"
            )));
        }
        _ => {
            return Err(AnalysisError::DataProcessing(format!(
                "Unsupported file extension: '{ext}'"
            )));
        }
    };

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Dataset loaded"
    );
    Ok(df)
}
