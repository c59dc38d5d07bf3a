//! Shared helpers used across analysis modules.

use polars::prelude::*;

/// Render a single cell value for display or grouping keys.
///
/// `AnyValue`'s `Display` wraps strings in quotes; reports and group labels
/// want the bare text.
pub fn format_cell(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => "null".to_string(),
        AnyValue::String(s) => (*s).to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => format!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cell_strings_unquoted() {
        let series = Series::new("s".into(), &["Lisbon"]);
        let value = series.get(0).unwrap();
        assert_eq!(format_cell(&value), "Lisbon");
    }

    #[test]
    fn test_format_cell_null() {
        let series = Series::new("s".into(), &[None::<f64>]);
        let value = series.get(0).unwrap();
        assert_eq!(format_cell(&value), "null");
    }

    #[test]
    fn test_format_cell_numeric() {
        let series = Series::new("s".into(), &[42i64]);
        let value = series.get(0).unwrap();
        assert_eq!(format_cell(&value), "42");
    }
}
