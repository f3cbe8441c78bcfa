//! Dataset analysis: chart rendering in [`charts`], everything else in [`logic`].

pub mod charts;
pub mod logic;

pub use charts::{render_all, render_catalog};
pub use logic::{AnalysisRequest, AnalysisResult, analyze_file_flow, run_analysis};
