//! Chart specifications.
//!
//! Figures are serializable descriptions consumed by an external charting
//! collaborator; nothing here renders pixels. Grid figures get their panel
//! coordinates from [`crate::layout`].

mod correlations;
mod distributions;

pub use correlations::{correlation_heatmap, scatter_matrix};
pub use distributions::{box_grid, category_bar_grid, histogram_grid};

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::layout::GridPlan;
use crate::quality::MissingReport;

/// The Dark24 qualitative palette; panel colors cycle through it.
pub const PALETTE: [&str; 24] = [
    "#2E91E5", "#E15F99", "#1CA71C", "#FB0D0D", "#DA16FF", "#222A2A", "#B68100", "#750D86",
    "#EB663B", "#511CFB", "#00A08B", "#FB00D1", "#FC0080", "#B2828D", "#6C7C32", "#778AAE",
    "#862A16", "#A777F1", "#620042", "#1616A7", "#DA60CA", "#6C4516", "#0D2A63", "#AF0038",
];

/// Color for the `i`-th panel, cycling through the palette.
pub fn palette_color(i: usize) -> &'static str {
    PALETTE[i % PALETTE.len()]
}

/// Histogram bin for numeric distributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Box plot summary values for numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
}

/// Heatmap matrix; `None` cells mark undefined correlations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapMatrix {
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

/// Payload of a single trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceData {
    Histogram {
        bins: Vec<HistogramBin>,
    },
    Box {
        summary: BoxSummary,
    },
    Bar {
        labels: Vec<String>,
        values: Vec<f64>,
    },
    Heatmap {
        matrix: HeatmapMatrix,
        /// Cell text, 3 decimal places; empty for undefined cells.
        text: Vec<Vec<String>>,
        color_scale: String,
    },
    Scatter {
        x: Vec<f64>,
        y: Vec<f64>,
        /// Group label per point when a color-by column was requested.
        #[serde(skip_serializing_if = "Option::is_none")]
        groups: Option<Vec<String>>,
    },
}

/// One visual placed in a figure cell. Coordinates are 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub name: String,
    pub row: usize,
    pub col: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub data: TraceData,
}

/// A complete figure specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub title: String,
    pub width: usize,
    pub height: usize,
    pub rows: usize,
    pub cols: usize,
    pub horizontal_spacing: f64,
    pub vertical_spacing: f64,
    pub traces: Vec<Trace>,
}

impl Figure {
    /// A figure laid out on a planned grid.
    pub(crate) fn on_grid(
        title: impl Into<String>,
        plan: &GridPlan,
        horizontal_spacing: f64,
        config: &AnalysisConfig,
    ) -> Self {
        Self {
            title: title.into(),
            width: config.figure_width,
            height: config.figure_height,
            rows: plan.rows,
            cols: plan.cols,
            horizontal_spacing,
            vertical_spacing: config.vertical_spacing,
            traces: Vec::new(),
        }
    }

    /// A single-panel figure.
    pub(crate) fn single(title: impl Into<String>, config: &AnalysisConfig) -> Self {
        Self {
            title: title.into(),
            width: config.figure_width,
            height: config.figure_height,
            rows: 1,
            cols: 1,
            horizontal_spacing: 0.0,
            vertical_spacing: 0.0,
            traces: Vec::new(),
        }
    }

    /// Number of panels with at least one trace.
    pub fn panel_count(&self) -> usize {
        let mut cells: Vec<(usize, usize)> = self.traces.iter().map(|t| (t.row, t.col)).collect();
        cells.sort_unstable();
        cells.dedup();
        cells.len()
    }
}

/// Bar chart of missing-value counts, one bar per column.
pub fn missing_bar(report: &MissingReport, config: &AnalysisConfig) -> Figure {
    let labels: Vec<String> = report.per_column.iter().map(|c| c.column.clone()).collect();
    let values: Vec<f64> = report
        .per_column
        .iter()
        .map(|c| c.missing_count as f64)
        .collect();

    let mut figure = Figure::single("Missing data representation of the dataset", config);
    figure.traces.push(Trace {
        name: "Missing Records".to_string(),
        row: 1,
        col: 1,
        color: Some(palette_color(0).to_string()),
        data: TraceData::Bar { labels, values },
    });
    figure
}
