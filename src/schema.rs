//! Explicit column-kind schema.
//!
//! Column kinds are inferred once when the dataset is loaded and passed
//! explicitly to every analysis function, instead of re-inspecting dtypes
//! on each call.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Declared kind of a column for analysis purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or floating point numbers.
    Numeric,
    /// Everything else: strings, booleans, temporal values.
    Categorical,
}

impl ColumnKind {
    /// Short lowercase label for display and serialization contexts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
        }
    }
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Kind of a single dtype.
pub fn kind_of_dtype(dtype: &DataType) -> ColumnKind {
    if is_numeric_dtype(dtype) {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}

/// A dataset schema: every column name with its declared kind, in
/// dataframe order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<(String, ColumnKind)>,
}

impl Schema {
    /// Infer the schema from a dataframe's dtypes. Done once at load time.
    pub fn infer(df: &DataFrame) -> Result<Self> {
        let mut columns = Vec::with_capacity(df.width());
        for col in df.get_columns() {
            let kind = kind_of_dtype(col.dtype());
            columns.push((col.name().to_string(), kind));
        }
        Ok(Self { columns })
    }

    /// All column names, in dataframe order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Names of numeric columns, in dataframe order.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|(_, kind)| *kind == ColumnKind::Numeric)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Names of categorical columns, in dataframe order.
    pub fn categorical_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|(_, kind)| *kind == ColumnKind::Categorical)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Declared kind of a column, if it exists.
    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.columns
            .iter()
            .find(|(col, _)| col == name)
            .map(|(_, kind)| *kind)
    }

    /// Number of columns in the schema.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
