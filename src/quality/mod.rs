//! Data-quality reports: missing values, duplicate rows, outliers.

mod outliers;

pub use outliers::{OutlierMethod, extract_outliers};

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::Result;
use crate::util::format_cell;

/// Missingness entry for a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingColumn {
    pub column: String,
    pub missing_count: usize,
    pub missing_percentage: f64,
}

/// Missingness report over the whole dataset, columns in dataframe order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingReport {
    pub total_missing_cells: usize,
    pub total_missing_percentage: f64,
    pub per_column: Vec<MissingColumn>,
}

/// Count missing values per column and overall.
pub fn missing_report(df: &DataFrame) -> Result<MissingReport> {
    let mut per_column = Vec::with_capacity(df.width());
    let mut total_missing_cells = 0;

    for col in df.get_columns() {
        let missing_count = col.null_count();
        total_missing_cells += missing_count;
        let missing_percentage = if df.height() > 0 {
            (missing_count as f64 / df.height() as f64) * 100.0
        } else {
            0.0
        };
        per_column.push(MissingColumn {
            column: col.name().to_string(),
            missing_count,
            missing_percentage,
        });
    }

    let total_cells = df.height() * df.width();
    let total_missing_percentage = if total_cells > 0 {
        (total_missing_cells as f64 / total_cells as f64) * 100.0
    } else {
        0.0
    };

    Ok(MissingReport {
        total_missing_cells,
        total_missing_percentage,
        per_column,
    })
}

/// Duplicate-rows report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateReport {
    pub duplicate_count: usize,
    pub duplicate_percentage: f64,
    /// 0-based indices of rows that repeat an earlier row.
    pub duplicate_indices: Vec<usize>,
}

/// Find rows that are exact repeats of an earlier row. The first
/// occurrence is not counted as a duplicate.
pub fn duplicate_report(df: &DataFrame) -> Result<DuplicateReport> {
    let series: Vec<Series> = df
        .get_columns()
        .iter()
        .map(|c| c.as_materialized_series().clone())
        .collect();

    let mut seen = HashSet::with_capacity(df.height());
    let mut duplicate_indices = Vec::new();

    for idx in 0..df.height() {
        let mut key = String::new();
        for s in &series {
            let value = s.get(idx)?;
            key.push_str(&format_cell(&value));
            // Unit separator keeps adjacent cells from gluing together.
            key.push('\u{1f}');
        }
        if !seen.insert(key) {
            duplicate_indices.push(idx);
        }
    }

    let duplicate_count = duplicate_indices.len();
    let duplicate_percentage = if df.height() > 0 {
        (duplicate_count as f64 / df.height() as f64) * 100.0
    } else {
        0.0
    };

    Ok(DuplicateReport {
        duplicate_count,
        duplicate_percentage,
        duplicate_indices,
    })
}
