//! Dataset overview: shape, feature lists, per-column descriptive
//! statistics and a reproducible row sample.

use polars::prelude::*;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::schema::{ColumnKind, Schema};
use crate::stats::{calculate_quartiles, calculate_std};
use crate::util::format_cell;

/// Descriptive statistics of a numeric column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericSummary {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Descriptive statistics of a categorical column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalSummary {
    /// Most frequent value, if any non-null value exists.
    pub most_frequent: Option<String>,
    /// Occurrence count of the most frequent value.
    pub frequency: usize,
}

/// Per-column description within a dataset overview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDescription {
    pub name: String,
    pub kind: ColumnKind,
    /// Count of non-null values.
    pub count: usize,
    pub null_count: usize,
    pub null_percentage: f64,
    pub unique_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorical: Option<CategoricalSummary>,
}

/// A small sample of rows rendered as strings, for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowSample {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Full dataset overview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetOverview {
    /// (rows, columns)
    pub shape: (usize, usize),
    pub features: Vec<String>,
    pub numeric_features: Vec<String>,
    pub categorical_features: Vec<String>,
    pub columns: Vec<ColumnDescription>,
    pub sample: RowSample,
}

/// Describe a dataset: shape, feature lists, per-column statistics and a
/// seeded random sample of roughly `sample_fraction` of the rows.
pub fn describe_dataset(
    df: &DataFrame,
    schema: &Schema,
    config: &AnalysisConfig,
) -> Result<DatasetOverview> {
    let mut columns = Vec::with_capacity(df.width());
    for name in schema.column_names() {
        columns.push(describe_column(df, name, schema)?);
    }

    Ok(DatasetOverview {
        shape: (df.height(), df.width()),
        features: schema.column_names().iter().map(|s| s.to_string()).collect(),
        numeric_features: schema
            .numeric_columns()
            .iter()
            .map(|s| s.to_string())
            .collect(),
        categorical_features: schema
            .categorical_columns()
            .iter()
            .map(|s| s.to_string())
            .collect(),
        columns,
        sample: sample_rows(df, config.sample_fraction)?,
    })
}

fn describe_column(df: &DataFrame, name: &str, schema: &Schema) -> Result<ColumnDescription> {
    let col = df.column(name)?;
    let series = col.as_materialized_series();
    let null_count = series.null_count();
    let count = series.len() - null_count;
    let null_percentage = if df.height() > 0 {
        (null_count as f64 / df.height() as f64) * 100.0
    } else {
        0.0
    };
    let unique_count = series.n_unique()?;
    let kind = schema.kind_of(name).unwrap_or(ColumnKind::Categorical);

    let (numeric, categorical) = match kind {
        ColumnKind::Numeric => (summarize_numeric(series)?, None),
        ColumnKind::Categorical => (None, Some(summarize_categorical(series)?)),
    };

    Ok(ColumnDescription {
        name: name.to_string(),
        kind,
        count,
        null_count,
        null_percentage,
        unique_count,
        numeric,
        categorical,
    })
}

fn summarize_numeric(series: &Series) -> Result<Option<NumericSummary>> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return Ok(None);
    }

    let float_series = non_null.cast(&DataType::Float64)?;
    let values = float_series.f64()?;
    let quartiles = calculate_quartiles(&non_null)?;

    Ok(quartiles.map(|q| NumericSummary {
        mean: float_series.mean().unwrap_or(0.0),
        std: calculate_std(&float_series).unwrap_or(0.0),
        min: values.min().unwrap_or(0.0),
        q1: q.q1,
        median: q.median,
        q3: q.q3,
        max: values.max().unwrap_or(0.0),
    }))
}

fn summarize_categorical(series: &Series) -> Result<CategoricalSummary> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return Ok(CategoricalSummary {
            most_frequent: None,
            frequency: 0,
        });
    }

    let value_counts = non_null.value_counts(true, false, "count".into(), false)?;
    if value_counts.height() == 0 {
        return Ok(CategoricalSummary {
            most_frequent: None,
            frequency: 0,
        });
    }

    let values_col = value_counts.column(non_null.name())?;
    let counts_col = value_counts.column("count")?;

    let most_frequent = values_col
        .as_materialized_series()
        .get(0)
        .map(|v| format_cell(&v))
        .ok();
    let frequency = counts_col
        .as_materialized_series()
        .get(0)?
        .try_extract::<u64>()
        .unwrap_or(0) as usize;

    Ok(CategoricalSummary {
        most_frequent,
        frequency,
    })
}

/// Draw a reproducible random sample of rows, formatted as strings.
/// A non-empty dataframe always yields at least one row.
fn sample_rows(df: &DataFrame, fraction: f64) -> Result<RowSample> {
    let columns: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    if df.height() == 0 {
        return Ok(RowSample {
            columns,
            rows: Vec::new(),
        });
    }

    let sample_size = ((df.height() as f64 * fraction) as usize)
        .max(1)
        .min(df.height());

    let mut rng = StdRng::seed_from_u64(42);
    let indices: Vec<usize> = (0..df.height()).collect();
    let mut sampled: Vec<usize> = indices
        .choose_multiple(&mut rng, sample_size)
        .copied()
        .collect();
    sampled.sort_unstable();

    let series: Vec<Series> = df
        .get_columns()
        .iter()
        .map(|c| c.as_materialized_series().clone())
        .collect();

    let mut rows = Vec::with_capacity(sampled.len());
    for idx in sampled {
        let mut row = Vec::with_capacity(series.len());
        for s in &series {
            let value = s.get(idx)?;
            row.push(format_cell(&value));
        }
        rows.push(row);
    }

    Ok(RowSample { columns, rows })
}
