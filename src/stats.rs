//! Statistical primitives shared across profiling, quality and charts.

use polars::prelude::*;

use crate::error::Result;

/// Quartile values of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quartiles {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
}

impl Quartiles {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Cast a series to f64 and collect its values, nulls preserved.
pub(crate) fn to_f64_values(series: &Series) -> Result<Vec<Option<f64>>> {
    let float_series = series.cast(&DataType::Float64)?;
    Ok(float_series.f64()?.into_iter().collect())
}

/// Calculate sample standard deviation of a series. Returns 0 for fewer
/// than two values.
pub(crate) fn calculate_std(series: &Series) -> Result<f64> {
    let mean = series.mean().unwrap_or(0.0);
    let n = (series.len() - series.null_count()) as f64;

    if n <= 1.0 {
        return Ok(0.0);
    }

    let float_series = series.cast(&DataType::Float64)?;
    let variance: f64 = float_series
        .f64()?
        .into_iter()
        .filter_map(|v| v.map(|val| (val - mean).powi(2)))
        .sum::<f64>()
        / (n - 1.0);

    Ok(variance.sqrt())
}

/// Calculate quartiles of a series by index into the sorted non-null
/// values: `floor(n * 0.25)`, `floor(n * 0.5)`, `floor(n * 0.75)`.
/// Returns `None` for an all-null or empty series.
pub(crate) fn calculate_quartiles(series: &Series) -> Result<Option<Quartiles>> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return Ok(None);
    }

    let float_series = non_null.cast(&DataType::Float64)?;
    let sorted = float_series.sort(SortOptions::default())?;
    let n = sorted.len();

    let q1_idx = (n as f64 * 0.25) as usize;
    let med_idx = (n as f64 * 0.5) as usize;
    let q3_idx = (n as f64 * 0.75) as usize;

    let q1 = sorted.get(q1_idx)?.try_extract::<f64>().unwrap_or(0.0);
    let median = sorted.get(med_idx)?.try_extract::<f64>().unwrap_or(0.0);
    let q3 = sorted.get(q3_idx)?.try_extract::<f64>().unwrap_or(0.0);

    Ok(Some(Quartiles { q1, median, q3 }))
}

/// Pearson correlation over pairwise complete observations.
///
/// Returns `None` when fewer than two complete pairs remain or either
/// column is constant.
pub(crate) fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter_map(|(a, b)| match (a, b) {
            (Some(a), Some(b)) => Some((*a, *b)),
            _ => None,
        })
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}
