//! Outlier extraction over numeric columns.
//!
//! A row is an outlier when any of its numeric values falls outside the
//! bounds of the selected method. Nulls never count as outliers.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::error::{Result, ResultExt};
use crate::schema::Schema;
use crate::stats::{calculate_quartiles, calculate_std, to_f64_values};

/// Method used to flag outlying values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierMethod {
    /// |(x - mean) / std| above the configured threshold.
    ZScore,
    /// Outside the Tukey fences Q1 - k*IQR / Q3 + k*IQR.
    Iqr,
}

impl OutlierMethod {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ZScore => "z-score",
            Self::Iqr => "IQR",
        }
    }
}

/// Extract the rows where any numeric column is an outlier under `method`.
///
/// Returns a dataframe with the same columns as the input, containing only
/// the flagged rows. A dataset without numeric columns yields no rows.
pub fn extract_outliers(
    df: &DataFrame,
    schema: &Schema,
    method: OutlierMethod,
    config: &AnalysisConfig,
) -> Result<DataFrame> {
    if df.height() == 0 {
        return Ok(df.clone());
    }

    let mut mask_values = vec![false; df.height()];

    for name in schema.numeric_columns() {
        let col = df.column(name)?;
        let series = col.as_materialized_series();
        match method {
            OutlierMethod::ZScore => {
                flag_zscore(series, config.zscore_threshold, &mut mask_values)?
            }
            OutlierMethod::Iqr => flag_iqr(series, config.iqr_multiplier, &mut mask_values)?,
        }
    }

    let flagged = mask_values.iter().filter(|v| **v).count();
    debug!(
        "Flagged {} outlier rows using the {} method",
        flagged,
        method.label()
    );

    let mask = BooleanChunked::from_slice("mask".into(), &mask_values);
    df.filter(&mask).context("filtering outlier rows")
}

/// Flag values whose absolute z-score exceeds `threshold`. Columns with
/// zero standard deviation contribute nothing.
fn flag_zscore(series: &Series, threshold: f64, mask: &mut [bool]) -> Result<()> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return Ok(());
    }

    let float_series = series.cast(&DataType::Float64)?;
    let mean = float_series.mean().unwrap_or(0.0);
    let std = calculate_std(&float_series)?;
    if std == 0.0 {
        return Ok(());
    }

    for (idx, value) in to_f64_values(series)?.into_iter().enumerate() {
        if let Some(val) = value
            && ((val - mean) / std).abs() > threshold
        {
            mask[idx] = true;
        }
    }

    Ok(())
}

/// Flag values outside the Tukey fences.
fn flag_iqr(series: &Series, multiplier: f64, mask: &mut [bool]) -> Result<()> {
    let Some(quartiles) = calculate_quartiles(series)? else {
        return Ok(());
    };

    let iqr = quartiles.iqr();
    let lower_bound = quartiles.q1 - multiplier * iqr;
    let upper_bound = quartiles.q3 + multiplier * iqr;

    for (idx, value) in to_f64_values(series)?.into_iter().enumerate() {
        if let Some(val) = value
            && (val < lower_bound || val > upper_bound)
        {
            mask[idx] = true;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(df: &DataFrame, method: OutlierMethod) -> DataFrame {
        let schema = Schema::infer(df).unwrap();
        extract_outliers(df, &schema, method, &AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn test_iqr_flags_extreme_value() {
        // Index quartiles: Q1=3, Q3=8, IQR=5, fences [-4.5, 15.5]; 100 is out.
        let df = df![
            "value" => [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0],
        ]
        .unwrap();

        let outliers = extract(&df, OutlierMethod::Iqr);
        assert_eq!(outliers.height(), 1);
        let max = outliers.column("value").unwrap().f64().unwrap().max();
        assert_eq!(max, Some(100.0));
    }

    #[test]
    fn test_iqr_no_outliers() {
        let df = df![
            "value" => [1.0, 2.0, 3.0, 4.0, 5.0],
        ]
        .unwrap();

        assert_eq!(extract(&df, OutlierMethod::Iqr).height(), 0);
    }

    #[test]
    fn test_iqr_identical_values() {
        // IQR = 0, fences collapse to the value itself; nothing is out.
        let df = df![
            "value" => [5.0, 5.0, 5.0, 5.0, 5.0],
        ]
        .unwrap();

        assert_eq!(extract(&df, OutlierMethod::Iqr).height(), 0);
    }

    #[test]
    fn test_zscore_constant_column_skipped() {
        let df = df![
            "value" => [5.0, 5.0, 5.0, 5.0],
        ]
        .unwrap();

        assert_eq!(extract(&df, OutlierMethod::ZScore).height(), 0);
    }

    #[test]
    fn test_zscore_flags_far_value() {
        // 19 ones and one 1000: z of 1000 is far above 3.
        let mut values = vec![1.0; 19];
        values.push(1000.0);
        let df = df![
            "value" => values,
        ]
        .unwrap();

        let outliers = extract(&df, OutlierMethod::ZScore);
        assert_eq!(outliers.height(), 1);
    }

    #[test]
    fn test_any_numeric_column_flags_row() {
        let df = df![
            "a" => [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
            "b" => [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 500.0],
        ]
        .unwrap();

        let outliers = extract(&df, OutlierMethod::Iqr);
        assert_eq!(outliers.height(), 1);
        // The full row is returned, including the unremarkable column.
        let a = outliers.column("a").unwrap().f64().unwrap().get(0);
        assert_eq!(a, Some(10.0));
    }

    #[test]
    fn test_nulls_never_flagged() {
        let df = df![
            "value" => [Some(1.0), Some(2.0), None, Some(3.0), Some(4.0), Some(5.0)],
        ]
        .unwrap();

        assert_eq!(extract(&df, OutlierMethod::Iqr).height(), 0);
    }

    #[test]
    fn test_categorical_only_dataset_has_no_outliers() {
        let df = df![
            "city" => ["a", "b", "c"],
        ]
        .unwrap();

        assert_eq!(extract(&df, OutlierMethod::ZScore).height(), 0);
    }

    #[test]
    fn test_empty_dataframe() {
        let df = DataFrame::empty();
        assert_eq!(extract(&df, OutlierMethod::Iqr).height(), 0);
    }
}
