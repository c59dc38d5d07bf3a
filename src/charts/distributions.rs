//! Distribution grids: histograms and box plots for numeric columns,
//! bar panels of top categories for categorical columns.
//!
//! Each figure places one panel per column through the grid planner.

use polars::prelude::*;
use tracing::debug;

use crate::charts::{BoxSummary, Figure, HistogramBin, Trace, TraceData, palette_color};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::layout;
use crate::schema::Schema;
use crate::stats::calculate_quartiles;
use crate::util::format_cell;

/// Histogram grid over the numeric columns.
pub fn histogram_grid(df: &DataFrame, schema: &Schema, config: &AnalysisConfig) -> Result<Figure> {
    let columns = schema.numeric_columns();
    let plan = layout::plan(columns.len());
    debug!(
        "Histogram grid: {} columns on a {}x{} grid",
        columns.len(),
        plan.rows,
        plan.cols
    );

    let mut figure = Figure::on_grid(
        "Histograms of Numerical Data",
        &plan,
        layout::horizontal_spacing(columns.len()),
        config,
    );

    for (i, (name, cell)) in columns.iter().zip(plan.cells.iter()).enumerate() {
        let col = df.column(name)?;
        let series = col.as_materialized_series();
        figure.traces.push(Trace {
            name: name.to_string(),
            row: cell.row,
            col: cell.col,
            color: Some(palette_color(i).to_string()),
            data: TraceData::Histogram {
                bins: bin_values(series, config.histogram_bins)?,
            },
        });
    }

    Ok(figure)
}

/// Box-plot grid over the numeric columns.
///
/// Horizontal spacing is a fixed 0.13 here; box panels share a y-axis
/// scale and tolerate a wider gap than histograms.
pub fn box_grid(df: &DataFrame, schema: &Schema, config: &AnalysisConfig) -> Result<Figure> {
    let columns = schema.numeric_columns();
    let plan = layout::plan(columns.len());

    let mut figure = Figure::on_grid("Box Plots of Numerical Data", &plan, 0.13, config);

    for (i, (name, cell)) in columns.iter().zip(plan.cells.iter()).enumerate() {
        let col = df.column(name)?;
        let series = col.as_materialized_series();
        let Some(summary) = box_summary(series)? else {
            continue;
        };
        figure.traces.push(Trace {
            name: name.to_string(),
            row: cell.row,
            col: cell.col,
            color: Some(palette_color(i).to_string()),
            data: TraceData::Box { summary },
        });
    }

    Ok(figure)
}

/// Bar-panel grid of the most frequent categories per categorical column.
pub fn category_bar_grid(
    df: &DataFrame,
    schema: &Schema,
    config: &AnalysisConfig,
) -> Result<Figure> {
    let columns = schema.categorical_columns();
    let plan = layout::plan(columns.len());

    let mut figure = Figure::on_grid(
        "Categories",
        &plan,
        layout::horizontal_spacing(columns.len()),
        config,
    );

    for (i, (name, cell)) in columns.iter().zip(plan.cells.iter()).enumerate() {
        let col = df.column(name)?;
        let series = col.as_materialized_series();
        let (labels, values) = top_categories(series, config.top_categories)?;
        figure.traces.push(Trace {
            name: name.to_string(),
            row: cell.row,
            col: cell.col,
            color: Some(palette_color(i).to_string()),
            data: TraceData::Bar { labels, values },
        });
    }

    Ok(figure)
}

/// Equal-width bins over the non-null values of a numeric series.
fn bin_values(series: &Series, bin_count: usize) -> Result<Vec<HistogramBin>> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return Ok(Vec::new());
    }

    let float_series = non_null.cast(&DataType::Float64)?;
    let values: Vec<f64> = float_series.f64()?.into_iter().flatten().collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // A constant column collapses to a single bin holding everything.
    if min == max {
        return Ok(vec![HistogramBin {
            start: min,
            end: max,
            count: values.len(),
        }]);
    }

    let width = (max - min) / bin_count as f64;
    let mut bins: Vec<HistogramBin> = (0..bin_count)
        .map(|i| HistogramBin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for val in values {
        let idx = (((val - min) / width) as usize).min(bin_count - 1);
        bins[idx].count += 1;
    }

    Ok(bins)
}

/// Five-number summary plus mean, or `None` for an all-null column.
fn box_summary(series: &Series) -> Result<Option<BoxSummary>> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return Ok(None);
    }

    let float_series = non_null.cast(&DataType::Float64)?;
    let values = float_series.f64()?;
    let Some(quartiles) = calculate_quartiles(&non_null)? else {
        return Ok(None);
    };

    Ok(Some(BoxSummary {
        min: values.min().unwrap_or(0.0),
        q1: quartiles.q1,
        median: quartiles.median,
        q3: quartiles.q3,
        max: values.max().unwrap_or(0.0),
        mean: float_series.mean().unwrap_or(0.0),
    }))
}

/// The `top_n` most frequent values of a series with their counts,
/// most frequent first.
fn top_categories(series: &Series, top_n: usize) -> Result<(Vec<String>, Vec<f64>)> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    let value_counts = non_null.value_counts(true, false, "count".into(), false)?;
    let take = value_counts.height().min(top_n);
    let values_col = value_counts.column(non_null.name())?.as_materialized_series();
    let counts_col = value_counts.column("count")?.as_materialized_series();

    let mut labels = Vec::with_capacity(take);
    let mut counts = Vec::with_capacity(take);
    for idx in 0..take {
        labels.push(format_cell(&values_col.get(idx)?));
        counts.push(counts_col.get(idx)?.try_extract::<f64>().unwrap_or(0.0));
    }

    Ok((labels, counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_df() -> DataFrame {
        df![
            "age" => [22.0, 35.0, 58.0, 41.0, 29.0, 33.0],
            "fare" => [7.25, 66.6, 26.55, 8.05, 13.0, 7.9],
            "city" => ["Lisbon", "Porto", "Lisbon", "Faro", "Lisbon", "Porto"],
        ]
        .unwrap()
    }

    #[test]
    fn test_histogram_grid_panel_per_numeric_column() {
        let df = sample_df();
        let schema = Schema::infer(&df).unwrap();
        let figure = histogram_grid(&df, &schema, &AnalysisConfig::default()).unwrap();

        // Two numeric columns: 2 is prime, bumped to 3, grid 1x3.
        assert_eq!((figure.rows, figure.cols), (1, 3));
        assert_eq!(figure.traces.len(), 2);
        assert_eq!(figure.traces[0].name, "age");
        assert_eq!(figure.traces[1].name, "fare");
        assert_eq!(figure.horizontal_spacing, 1.0);
    }

    #[test]
    fn test_histogram_bins_cover_all_values() {
        let series = Series::new("v".into(), &[0.0f64, 1.0, 2.0, 3.0, 4.0, 5.0, 10.0]);
        let bins = bin_values(&series, 5).unwrap();
        assert_eq!(bins.len(), 5);
        let total: usize = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, 7);
        // Max value lands in the last bin.
        assert!(bins.last().unwrap().count >= 1);
    }

    #[test]
    fn test_histogram_constant_column_single_bin() {
        let series = Series::new("v".into(), &[5.0f64, 5.0, 5.0]);
        let bins = bin_values(&series, 20).unwrap();
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
    }

    #[test]
    fn test_box_grid_summaries() {
        let df = sample_df();
        let schema = Schema::infer(&df).unwrap();
        let figure = box_grid(&df, &schema, &AnalysisConfig::default()).unwrap();

        assert_eq!(figure.horizontal_spacing, 0.13);
        assert_eq!(figure.traces.len(), 2);
        match &figure.traces[0].data {
            TraceData::Box { summary } => {
                assert_eq!(summary.min, 22.0);
                assert_eq!(summary.max, 58.0);
            }
            other => panic!("expected box trace, got {:?}", other),
        }
    }

    #[test]
    fn test_category_bar_grid_top_counts() {
        let df = sample_df();
        let schema = Schema::infer(&df).unwrap();
        let figure = category_bar_grid(&df, &schema, &AnalysisConfig::default()).unwrap();

        // One categorical column: 1x1 grid, spacing guard kicks in.
        assert_eq!((figure.rows, figure.cols), (1, 1));
        assert_eq!(figure.horizontal_spacing, 0.0);
        match &figure.traces[0].data {
            TraceData::Bar { labels, values } => {
                assert_eq!(labels[0], "Lisbon");
                assert_eq!(values[0], 3.0);
                assert_eq!(labels.len(), 3);
            }
            other => panic!("expected bar trace, got {:?}", other),
        }
    }

    #[test]
    fn test_top_categories_truncates() {
        let series = Series::new(
            "v".into(),
            &["a", "a", "a", "b", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k"],
        );
        let (labels, counts) = top_categories(&series, 10).unwrap();
        assert_eq!(labels.len(), 10);
        assert_eq!(labels[0], "a");
        assert_eq!(counts[0], 3.0);
    }

    #[test]
    fn test_grids_with_no_matching_columns_are_empty() {
        let df = df![
            "city" => ["a", "b"],
        ]
        .unwrap();
        let schema = Schema::infer(&df).unwrap();
        let config = AnalysisConfig::default();

        let hist = histogram_grid(&df, &schema, &config).unwrap();
        assert_eq!(hist.traces.len(), 0);
        assert_eq!((hist.rows, hist.cols), (0, 0));

        let bars = category_bar_grid(&df, &schema, &config).unwrap();
        assert_eq!(bars.traces.len(), 1);
    }

    #[test]
    fn test_seven_numeric_columns_use_two_by_four() {
        let df = df![
            "a" => [1.0, 2.0], "b" => [1.0, 2.0], "c" => [1.0, 2.0],
            "d" => [1.0, 2.0], "e" => [1.0, 2.0], "f" => [1.0, 2.0],
            "g" => [1.0, 2.0],
        ]
        .unwrap();
        let schema = Schema::infer(&df).unwrap();
        let figure = histogram_grid(&df, &schema, &AnalysisConfig::default()).unwrap();

        assert_eq!((figure.rows, figure.cols), (2, 4));
        assert_eq!(figure.traces.len(), 7);
        let last = figure.traces.last().unwrap();
        assert_eq!((last.row, last.col), (2, 3));
    }
}
