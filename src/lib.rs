//! Tabular Dataset Exploration Library
//!
//! Fast exploratory analysis of CSV datasets built with Rust and Polars.
//!
//! # Overview
//!
//! This library turns a loaded dataframe into serializable analysis views:
//!
//! - **Dataset Overview**: shape, per-column statistics, reproducible row sample
//! - **Quality Checks**: missing values, duplicate rows, outlier extraction (z-score or IQR)
//! - **Distribution Figures**: histogram, box plot and category bar grids
//! - **Correlation Figures**: Pearson heatmap and scatter matrix with optional color grouping
//! - **Group Aggregation**: mean, median or sum per category with a grouped bar figure
//!
//! Multi-panel figures are laid out by the grid planner in [`layout`], which
//! picks the most balanced rows x columns factorization for a panel count.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tablescope::{AnalysisCommand, AnalysisConfig, OutlierMethod, Schema, run_command};
//! use polars::prelude::*;
//!
//! let df = CsvReadOptions::default()
//!     .with_has_header(true)
//!     .try_into_reader_with_file_path(Some("data.csv".into()))?
//!     .finish()?;
//!
//! // The schema is inferred once, right after load.
//! let schema = Schema::infer(&df)?;
//! let config = AnalysisConfig::default();
//!
//! let output = run_command(
//!     &df,
//!     &schema,
//!     &config,
//!     &AnalysisCommand::ShowOutliers { method: OutlierMethod::Iqr },
//! )?;
//! println!("{}", serde_json::to_string_pretty(&output)?);
//! ```
//!
//! # Configuration
//!
//! Use [`AnalysisConfig`] to customize thresholds and figure geometry:
//!
//! ```rust,ignore
//! use tablescope::AnalysisConfig;
//!
//! let config = AnalysisConfig::builder()
//!     .histogram_bins(30)
//!     .zscore_threshold(2.5)
//!     .sample_fraction(0.05)
//!     .build()?;
//! ```

pub mod charts;
pub mod command;
pub mod config;
pub mod error;
pub mod groupby;
pub mod layout;
pub mod profile;
pub mod quality;
pub mod schema;
pub mod stats;

mod util;

// Re-exports for convenient access
pub use charts::{Figure, HeatmapMatrix, HistogramBin, BoxSummary, Trace, TraceData};
pub use command::{AnalysisCommand, AnalysisOutput, AnalysisReport, run_command};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError};
pub use error::{AnalysisError, Result, ResultExt};
pub use groupby::GroupStat;
pub use layout::{GridCell, GridPlan};
pub use profile::{DatasetOverview, RowSample};
pub use quality::{DuplicateReport, MissingReport, OutlierMethod};
pub use schema::{ColumnKind, Schema};
