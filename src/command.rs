//! Analysis commands and the single dispatch handler.
//!
//! Every view the tool can produce is a variant of [`AnalysisCommand`], and
//! [`run_command`] is the only place commands are interpreted. Output types
//! are plain serializable data so callers can render them however they like.

use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::charts::{
    Figure, box_grid, category_bar_grid, correlation_heatmap, histogram_grid, missing_bar,
    scatter_matrix,
};
use crate::config::AnalysisConfig;
use crate::error::{Result, ResultExt};
use crate::groupby::{GroupStat, grouped_bar};
use crate::profile::{DatasetOverview, RowSample, describe_dataset};
use crate::quality::{DuplicateReport, MissingReport, OutlierMethod, duplicate_report,
    extract_outliers, missing_report};
use crate::schema::Schema;
use crate::util::format_cell;

/// One requested analysis view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AnalysisCommand {
    ShowInfo,
    ShowDuplicates,
    ShowMissing,
    ShowOutliers {
        method: OutlierMethod,
    },
    ShowDistributions,
    ShowCorrelations {
        /// Numeric columns to correlate; empty means all numeric columns.
        #[serde(default)]
        columns: Vec<String>,
        /// Optional column whose values color the scatter points.
        #[serde(default)]
        color_by: Option<String>,
    },
    ShowGroupBy {
        group_col: String,
        value_cols: Vec<String>,
        stat: GroupStat,
    },
}

impl AnalysisCommand {
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisCommand::ShowInfo => "info",
            AnalysisCommand::ShowDuplicates => "duplicates",
            AnalysisCommand::ShowMissing => "missing",
            AnalysisCommand::ShowOutliers { .. } => "outliers",
            AnalysisCommand::ShowDistributions => "distributions",
            AnalysisCommand::ShowCorrelations { .. } => "correlations",
            AnalysisCommand::ShowGroupBy { .. } => "group_by",
        }
    }
}

/// Result of running one command, tagged for serialization.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum AnalysisOutput {
    Overview {
        overview: DatasetOverview,
    },
    Duplicates {
        report: DuplicateReport,
        rows: RowSample,
    },
    Missing {
        report: MissingReport,
        figure: Figure,
    },
    Outliers {
        method: OutlierMethod,
        rows: RowSample,
        figures: Vec<Figure>,
    },
    Distributions {
        figures: Vec<Figure>,
    },
    Correlations {
        figures: Vec<Figure>,
    },
    GroupBy {
        table: RowSample,
        figure: Figure,
    },
}

/// A finished report: the command that produced it plus its output.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub generated_at: String,
    pub command: String,
    pub output: AnalysisOutput,
}

impl AnalysisReport {
    pub fn new(command: &AnalysisCommand, output: AnalysisOutput) -> Self {
        AnalysisReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            command: command.label().to_string(),
            output,
        }
    }
}

/// Materialize every row of a dataframe as formatted table cells.
pub(crate) fn table_from_dataframe(df: &DataFrame) -> Result<RowSample> {
    let columns: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let series: Vec<&Series> = df
        .get_columns()
        .iter()
        .map(|col| col.as_materialized_series())
        .collect();

    let mut rows = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let mut row = Vec::with_capacity(series.len());
        for s in &series {
            row.push(format_cell(&s.get(idx)?));
        }
        rows.push(row);
    }

    Ok(RowSample { columns, rows })
}

/// Run one command against a loaded dataframe.
pub fn run_command(
    df: &DataFrame,
    schema: &Schema,
    config: &AnalysisConfig,
    command: &AnalysisCommand,
) -> Result<AnalysisOutput> {
    tracing::info!(command = command.label(), "running analysis command");

    match command {
        AnalysisCommand::ShowInfo => Ok(AnalysisOutput::Overview {
            overview: describe_dataset(df, schema, config)?,
        }),
        AnalysisCommand::ShowDuplicates => {
            let report = duplicate_report(df)?;
            let mask: Vec<bool> = (0..df.height())
                .map(|idx| report.duplicate_indices.contains(&idx))
                .collect();
            let mask = BooleanChunked::from_slice("mask".into(), &mask);
            let duplicates = df.filter(&mask).context("filtering duplicate rows")?;
            Ok(AnalysisOutput::Duplicates {
                report,
                rows: table_from_dataframe(&duplicates)?,
            })
        }
        AnalysisCommand::ShowMissing => {
            let report = missing_report(df)?;
            let figure = missing_bar(&report, config);
            Ok(AnalysisOutput::Missing { report, figure })
        }
        AnalysisCommand::ShowOutliers { method } => {
            let outliers = extract_outliers(df, schema, *method, config)?;
            let figures = vec![
                histogram_grid(df, schema, config)?,
                box_grid(df, schema, config)?,
            ];
            Ok(AnalysisOutput::Outliers {
                method: *method,
                rows: table_from_dataframe(&outliers)?,
                figures,
            })
        }
        AnalysisCommand::ShowDistributions => Ok(AnalysisOutput::Distributions {
            figures: vec![
                histogram_grid(df, schema, config)?,
                category_bar_grid(df, schema, config)?,
            ],
        }),
        AnalysisCommand::ShowCorrelations { columns, color_by } => {
            let selected: Vec<String> = if columns.is_empty() {
                schema.numeric_columns().into_iter().map(String::from).collect()
            } else {
                columns.clone()
            };
            let figures = vec![
                scatter_matrix(df, schema, &selected, color_by.as_deref(), config)?,
                correlation_heatmap(df, schema, &selected, config)?,
            ];
            Ok(AnalysisOutput::Correlations { figures })
        }
        AnalysisCommand::ShowGroupBy {
            group_col,
            value_cols,
            stat,
        } => {
            let (table, figure) = grouped_bar(df, schema, group_col, value_cols, *stat, config)?;
            Ok(AnalysisOutput::GroupBy {
                table: table_from_dataframe(&table)?,
                figure,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use pretty_assertions::assert_eq;

    fn sample_df() -> DataFrame {
        df![
            "price" => [10.0, 20.0, 30.0, 10.0],
            "rooms" => [1i64, 2, 3, 1],
            "city" => ["porto", "lisbon", "porto", "porto"],
        ]
        .unwrap()
    }

    fn run(command: AnalysisCommand) -> Result<AnalysisOutput> {
        let df = sample_df();
        let schema = Schema::infer(&df)?;
        run_command(&df, &schema, &AnalysisConfig::default(), &command)
    }

    // ==================== Dispatch ====================

    #[test]
    fn test_show_info_returns_overview() {
        let output = run(AnalysisCommand::ShowInfo).unwrap();
        match output {
            AnalysisOutput::Overview { overview } => {
                assert_eq!(overview.shape, (4, 3));
                assert_eq!(overview.numeric_features, vec!["price", "rooms"]);
            }
            other => panic!("expected overview, got {:?}", other),
        }
    }

    #[test]
    fn test_show_duplicates_filters_rows() {
        let output = run(AnalysisCommand::ShowDuplicates).unwrap();
        match output {
            AnalysisOutput::Duplicates { report, rows } => {
                assert_eq!(report.duplicate_count, 1);
                assert_eq!(rows.rows.len(), 1);
                assert_eq!(rows.rows[0], vec!["10.0", "1", "porto"]);
            }
            other => panic!("expected duplicates, got {:?}", other),
        }
    }

    #[test]
    fn test_show_missing_includes_figure() {
        let output = run(AnalysisCommand::ShowMissing).unwrap();
        match output {
            AnalysisOutput::Missing { report, figure } => {
                assert_eq!(report.total_missing_cells, 0);
                assert_eq!(figure.panel_count(), 1);
            }
            other => panic!("expected missing view, got {:?}", other),
        }
    }

    #[test]
    fn test_show_outliers_builds_two_figures() {
        let output = run(AnalysisCommand::ShowOutliers {
            method: OutlierMethod::Iqr,
        })
        .unwrap();
        match output {
            AnalysisOutput::Outliers { method, figures, .. } => {
                assert_eq!(method, OutlierMethod::Iqr);
                assert_eq!(figures.len(), 2);
            }
            other => panic!("expected outliers, got {:?}", other),
        }
    }

    #[test]
    fn test_show_correlations_defaults_to_all_numeric() {
        let output = run(AnalysisCommand::ShowCorrelations {
            columns: Vec::new(),
            color_by: None,
        })
        .unwrap();
        match output {
            AnalysisOutput::Correlations { figures } => {
                assert_eq!(figures.len(), 2);
                // Scatter matrix over price and rooms is a 2 x 2 grid.
                assert_eq!((figures[0].rows, figures[0].cols), (2, 2));
            }
            other => panic!("expected correlations, got {:?}", other),
        }
    }

    #[test]
    fn test_show_group_by_returns_table_and_figure() {
        let output = run(AnalysisCommand::ShowGroupBy {
            group_col: "city".to_string(),
            value_cols: vec!["price".to_string()],
            stat: GroupStat::Mean,
        })
        .unwrap();
        match output {
            AnalysisOutput::GroupBy { table, figure } => {
                assert_eq!(table.rows.len(), 2);
                assert_eq!(figure.traces.len(), 1);
            }
            other => panic!("expected group-by, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_column_propagates() {
        let result = run(AnalysisCommand::ShowGroupBy {
            group_col: "nope".to_string(),
            value_cols: vec!["price".to_string()],
            stat: GroupStat::Mean,
        });
        assert!(matches!(result, Err(AnalysisError::ColumnNotFound(_))));
    }

    // ==================== Serialization ====================

    #[test]
    fn test_command_round_trips_through_json() {
        let command = AnalysisCommand::ShowOutliers {
            method: OutlierMethod::ZScore,
        };
        let json = serde_json::to_string(&command).unwrap();
        assert!(json.contains("\"command\":\"show_outliers\""));
        let back: AnalysisCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, command);
    }

    #[test]
    fn test_output_is_tagged() {
        let output = run(AnalysisCommand::ShowInfo).unwrap();
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["view"], "overview");
    }

    #[test]
    fn test_report_carries_command_label() {
        let command = AnalysisCommand::ShowInfo;
        let output = run(command.clone()).unwrap();
        let report = AnalysisReport::new(&command, output);
        assert_eq!(report.command, "info");
        assert!(!report.generated_at.is_empty());
    }
}
