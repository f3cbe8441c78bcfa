//! Classification, statistics, insights and the request flow.
//!
//! Everything here works on an in-memory polars [`DataFrame`](polars::prelude::DataFrame)
//! and never mutates it.

pub mod classify;
pub mod clustering;
pub mod flows;
pub mod insights;
pub mod io;
pub mod selection;
pub mod stats;
pub mod types;

pub use classify::{classify, numeric_columns};
pub use flows::{analyze_file_flow, run_analysis};
pub use insights::{InsightReport, discover_insights};
pub use io::load_df;
pub use selection::{merge_support, partition};
pub use types::{
    AnalysisRequest, AnalysisResult, ArtifactKey, ArtifactMap, ColumnClassification,
    CorrelationMatrix, Dataset, Insight, InsightKind, PlotKind, ResultPayload, VisualArtifact,
};
