use super::types::ColumnClassification;
use crate::error::{AnalysisError, Result};
use polars::prelude::*;

/// Numeric iff stored as an integer or float. Booleans, strings and temporal
/// columns all count as categorical here.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    dtype.is_primitive_numeric()
}

/// Splits the requested columns into numeric and categorical, keeping request order.
///
/// Repeated names are kept once, at their first position.
///
/// # Errors
///
/// Returns [`AnalysisError::UnknownColumn`] for the first name missing from `df`.
pub fn classify<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> Result<ColumnClassification> {
    let mut classification = ColumnClassification::default();

    for name in columns {
        let name = name.as_ref();
        if classification.is_numeric(name) || classification.is_categorical(name) {
            continue;
        }
        let Ok(column) = df.column(name) else {
            return Err(AnalysisError::UnknownColumn(name.to_owned()));
        };

        if is_numeric_dtype(column.dtype()) {
            classification.numeric.push(name.to_owned());
        } else {
            classification.categorical.push(name.to_owned());
        }
    }

    Ok(classification)
}

/// Every numeric column of the dataset, in dataset order.
pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|c| is_numeric_dtype(c.dtype()))
        .map(|c| c.name().to_string())
        .collect()
}
