//! Error types for plotsight.
//!
//! Analysis failures fall into two tiers:
//!
//! - **Fatal to the request**: the caller asked for a column the dataset does
//!   not have. Nothing sensible can be classified, so the whole request fails
//!   with [`AnalysisError::UnknownColumn`].
//! - **Recoverable per artifact**: a single chart or insight step failed. These
//!   never surface as an `AnalysisError`; the step yields nothing and the rest
//!   of the pipeline carries on (see [`crate::utils::fail_soft`]).
//!
//! ```
//! use plotsight::error::AnalysisError;
//!
//! let err = AnalysisError::UnknownColumn("revenue".to_owned());
//! assert_eq!(err.to_string(), "Unknown column: 'revenue'");
//! ```
//!
//! The `From` conversions let `?` lift I/O, JSON, polars and `anyhow` errors
//! into [`AnalysisError`] at the boundaries that need a typed error.

use std::fmt;

/// Main error type for plotsight operations.
#[derive(Debug)]
pub enum AnalysisError {
    /// A requested column does not exist in the dataset.
    UnknownColumn(String),

    /// Data extraction or conversion failed (polars, loading, casting).
    DataProcessing(String),

    /// A chart could not be drawn or encoded.
    Render(String),

    /// I/O errors (reading datasets, writing artifacts, config files)
    Io(std::io::Error),

    /// Configuration errors
    Config(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownColumn(name) => write!(f, "Unknown column: '{name}'"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for AnalysisError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(format!("{err:#}"))
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for AnalysisError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

// Request handlers usually hand errors back as plain strings.
impl From<AnalysisError> for String {
    fn from(err: AnalysisError) -> Self {
        err.to_string()
    }
}

/// Result type alias for plotsight operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<AnalysisError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: AnalysisError = e.into();
            AnalysisError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: AnalysisError = e.into();
            AnalysisError::Other(format!("{}: {}", f(), err))
        })
    }
}
