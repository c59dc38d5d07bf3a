//! Group-by aggregation over a categorical key column.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::charts::{Figure, Trace, TraceData, palette_color};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::schema::{ColumnKind, Schema};
use crate::stats::to_f64_values;
use crate::util::format_cell;

/// Aggregation statistic applied to each value column within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupStat {
    Mean,
    Median,
    Sum,
}

impl GroupStat {
    pub fn label(&self) -> &'static str {
        match self {
            GroupStat::Mean => "mean",
            GroupStat::Median => "median",
            GroupStat::Sum => "sum",
        }
    }

    fn expr(&self, column: &str) -> Expr {
        match self {
            GroupStat::Mean => col(column).mean(),
            GroupStat::Median => col(column).median(),
            GroupStat::Sum => col(column).sum(),
        }
    }
}

/// Aggregate the value columns per distinct key, sorted by key.
///
/// The key must exist in the schema; every value column must be numeric.
pub fn group_aggregate(
    df: &DataFrame,
    schema: &Schema,
    group_col: &str,
    value_cols: &[String],
    stat: GroupStat,
) -> Result<DataFrame> {
    if schema.kind_of(group_col).is_none() {
        return Err(AnalysisError::ColumnNotFound(group_col.to_string()));
    }
    if value_cols.is_empty() {
        return Err(AnalysisError::EmptySelection(
            "group-by needs at least one value column".to_string(),
        ));
    }
    for name in value_cols {
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

    let aggs: Vec<Expr> = value_cols.iter().map(|name| stat.expr(name)).collect();
    let aggregated = df
        .clone()
        .lazy()
        .group_by([col(group_col)])
        .agg(aggs)
        .sort([group_col], SortMultipleOptions::default())
        .collect()?;

    tracing::debug!(
        group_col,
        stat = stat.label(),
        groups = aggregated.height(),
        "aggregated dataframe"
    );

    Ok(aggregated)
}

/// Single-panel grouped bar figure, one bar trace per value column.
pub fn grouped_bar(
    df: &DataFrame,
    schema: &Schema,
    group_col: &str,
    value_cols: &[String],
    stat: GroupStat,
    config: &AnalysisConfig,
) -> Result<(DataFrame, Figure)> {
    let aggregated = group_aggregate(df, schema, group_col, value_cols, stat)?;

    let key_series = aggregated.column(group_col)?.as_materialized_series();
    let mut labels = Vec::with_capacity(aggregated.height());
    for idx in 0..aggregated.height() {
        labels.push(format_cell(&key_series.get(idx)?));
    }

    let title = format!("{} by {}", stat.label(), group_col);
    let mut figure = Figure::single(&title, config);
    for (index, name) in value_cols.iter().enumerate() {
        let column = aggregated.column(name)?;
        let values = to_f64_values(column.as_materialized_series())?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        figure.traces.push(Trace {
            name: name.clone(),
            row: 1,
            col: 1,
            color: Some(palette_color(index).to_string()),
            data: TraceData::Bar {
                labels: labels.clone(),
                values,
            },
        });
    }

    Ok((aggregated, figure))
}
