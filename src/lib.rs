//! # Plotsight - charts and automatic insights for tabular data
//!
//! Plotsight takes an in-memory dataset and a column selection and produces:
//!
//! - a catalog of PNG charts (correlation heatmap, per-column distribution or
//!   frequency plots, a pairplot), split into the plot kinds the caller asked
//!   for and everything else;
//! - a short list of insights: strong correlations, rare outliers and latent
//!   clusters, each pointing at a chart that backs it.
//!
//! ## Quick Start
//!
//! ```no_run
//! use plotsight::analyser::logic::{self, AnalysisRequest};
//! use plotsight::config::AnalysisConfig;
//!
//! # fn example() -> plotsight::error::Result<()> {
//! let df = logic::load_df(std::path::Path::new("data.csv"))?;
//! let request = AnalysisRequest::from_tokens(["price", "weight"], &["heatmap"], Some("light"));
//! let result = logic::run_analysis(&df, &request, &AnalysisConfig::default())?;
//!
//! for insight in &result.insights {
//!     println!("{}", insight.text);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`analyser`]: classification, statistics, insights and rendering
//!   - [`analyser::logic`]: the numeric side and the request flow
//!   - [`analyser::charts`]: plotters-based chart rendering
//! - [`theme`]: dark and light palettes
//! - [`config`]: figure sizes and the clustering capability flag
//! - [`error`]: error types and handling utilities
//! - [`logging`]: tracing setup
//! - [`utils`]: paths and the fail-soft helper
//!
//! ## Failure model
//!
//! Only an unknown column aborts a request. Any single chart or insight that
//! fails is logged and left out, so callers always get a well-formed
//! [`analyser::AnalysisResult`].

pub mod analyser;
pub mod config;
pub mod error;
pub mod logging;
pub mod theme;
pub mod utils;
