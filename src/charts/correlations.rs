//! Correlation figures: Pearson heatmap and scatter matrix.

use polars::prelude::*;

use crate::charts::{Figure, HeatmapMatrix, Trace, TraceData, palette_color};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::schema::{ColumnKind, Schema};
use crate::stats::{pearson, to_f64_values};
use crate::util::format_cell;

/// Validate that every selected column exists and is numeric.
fn validate_numeric_selection(schema: &Schema, columns: &[String]) -> Result<()> {
    if columns.is_empty() {
        return Err(AnalysisError::EmptySelection(
            "correlation figures need at least one numeric column".to_string(),
        ));
    }
    for name in columns {
        match schema.kind_of(name) {
            None => return Err(AnalysisError::ColumnNotFound(name.clone())),
            Some(ColumnKind::Numeric) => {}
            Some(kind) => {
                return Err(AnalysisError::NotNumeric {
                    column: name.clone(),
                    kind: kind.label().to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Pearson correlation heatmap over the selected numeric columns.
///
/// Cells where the correlation is undefined (constant column, too few
/// complete pairs) are left null with empty cell text.
pub fn correlation_heatmap(
    df: &DataFrame,
    schema: &Schema,
    columns: &[String],
    config: &AnalysisConfig,
) -> Result<Figure> {
    validate_numeric_selection(schema, columns)?;

    let mut column_values = Vec::with_capacity(columns.len());
    for name in columns {
        let col = df.column(name)?;
        column_values.push(to_f64_values(col.as_materialized_series())?);
    }

    let size = columns.len();
    let mut values = vec![vec![None; size]; size];
    for i in 0..size {
        for j in i..size {
            let r = if i == j {
                Some(1.0)
            } else {
                pearson(&column_values[i], &column_values[j])
            };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    let text = values
        .iter()
        .map(|row| {
            row.iter()
                .map(|v| v.map(|r| format!("{:.3}", r)).unwrap_or_default())
                .collect()
        })
        .collect();

    let labels: Vec<String> = columns.to_vec();
    let mut figure = Figure::single("Correlation Heatmap", config);
    figure.traces.push(Trace {
        name: "pearson".to_string(),
        row: 1,
        col: 1,
        color: None,
        data: TraceData::Heatmap {
            matrix: HeatmapMatrix {
                x_labels: labels.clone(),
                y_labels: labels,
                values,
            },
            text,
            color_scale: "Inferno".to_string(),
        },
    });

    Ok(figure)
}

/// Scatter-matrix (pair plot) over the selected numeric columns.
///
/// The k x k grid is fully populated: panel (i, j) plots column j on the
/// x-axis against column i on the y-axis. When `color_by` names a column,
/// every point carries that row's group label; no sentinel column is ever
/// injected into the data.
pub fn scatter_matrix(
    df: &DataFrame,
    schema: &Schema,
    columns: &[String],
    color_by: Option<&str>,
    config: &AnalysisConfig,
) -> Result<Figure> {
    validate_numeric_selection(schema, columns)?;

    let group_labels = match color_by {
        Some(name) => {
            if schema.kind_of(name).is_none() {
                return Err(AnalysisError::ColumnNotFound(name.to_string()));
            }
            let col = df.column(name)?;
            let series = col.as_materialized_series();
            let mut labels = Vec::with_capacity(df.height());
            for idx in 0..df.height() {
                labels.push(format_cell(&series.get(idx)?));
            }
            Some(labels)
        }
        None => None,
    };

    let mut column_values = Vec::with_capacity(columns.len());
    for name in columns {
        let col = df.column(name)?;
        column_values.push(to_f64_values(col.as_materialized_series())?);
    }

    let size = columns.len();
    let mut figure = Figure {
        title: "Pair Plots".to_string(),
        width: config.figure_width,
        height: config.figure_height,
        rows: size,
        cols: size,
        horizontal_spacing: 0.0,
        vertical_spacing: 0.0,
        traces: Vec::new(),
    };

    for i in 0..size {
        for j in 0..size {
            let mut x = Vec::new();
            let mut y = Vec::new();
            let mut groups = group_labels.as_ref().map(|_| Vec::new());
            for idx in 0..df.height() {
                if let (Some(xv), Some(yv)) = (column_values[j][idx], column_values[i][idx]) {
                    x.push(xv);
                    y.push(yv);
                    if let (Some(groups), Some(labels)) = (groups.as_mut(), group_labels.as_ref())
                    {
                        groups.push(labels[idx].clone());
                    }
                }
            }
            figure.traces.push(Trace {
                name: format!("{} vs {}", columns[j], columns[i]),
                row: i + 1,
                col: j + 1,
                color: Some(palette_color(i * size + j).to_string()),
                data: TraceData::Scatter { x, y, groups },
            });
        }
    }

    Ok(figure)
}
