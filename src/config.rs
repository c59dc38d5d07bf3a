//! Configuration for analysis and figure generation.
//!
//! Uses the builder pattern for flexible and ergonomic setup.

use serde::{Deserialize, Serialize};

/// Configuration for the analysis toolkit.
///
/// Use [`AnalysisConfig::builder()`] to create a new configuration with a
/// fluent API; values are validated on `build()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Number of bins for histogram panels.
    /// Default: 20
    pub histogram_bins: usize,

    /// How many of the most frequent categories to show per bar panel.
    /// Default: 10
    pub top_categories: usize,

    /// Absolute z-score above which a value counts as an outlier.
    /// Default: 3.0
    pub zscore_threshold: f64,

    /// IQR multiplier for the Tukey fences (Q1 - k*IQR, Q3 + k*IQR).
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Fraction of rows included in the overview sample (0.0 - 1.0].
    /// Default: 0.1
    pub sample_fraction: f64,

    /// Width of generated figures in pixels.
    /// Default: 900
    pub figure_width: usize,

    /// Height of generated figures in pixels.
    /// Default: 900
    pub figure_height: usize,

    /// Vertical spacing fraction between grid panels [0.0, 1.0).
    /// Default: 0.17
    pub vertical_spacing: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            histogram_bins: 20,
            top_categories: 10,
            zscore_threshold: 3.0,
            iqr_multiplier: 1.5,
            sample_fraction: 0.1,
            figure_width: 900,
            figure_height: 900,
            vertical_spacing: 0.17,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.histogram_bins == 0 {
            return Err(ConfigValidationError::InvalidCount {
                field: "histogram_bins",
                value: self.histogram_bins,
            });
        }
        if self.top_categories == 0 {
            return Err(ConfigValidationError::InvalidCount {
                field: "top_categories",
                value: self.top_categories,
            });
        }
        if self.zscore_threshold <= 0.0 {
            return Err(ConfigValidationError::NonPositive {
                field: "zscore_threshold",
                value: self.zscore_threshold,
            });
        }
        if self.iqr_multiplier <= 0.0 {
            return Err(ConfigValidationError::NonPositive {
                field: "iqr_multiplier",
                value: self.iqr_multiplier,
            });
        }
        if !(self.sample_fraction > 0.0 && self.sample_fraction <= 1.0) {
            return Err(ConfigValidationError::InvalidFraction {
                field: "sample_fraction",
                value: self.sample_fraction,
            });
        }
        if !(0.0..1.0).contains(&self.vertical_spacing) {
            return Err(ConfigValidationError::InvalidFraction {
                field: "vertical_spacing",
                value: self.vertical_spacing,
            });
        }
        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid '{field}': {value} (must be at least 1)")]
    InvalidCount { field: &'static str, value: usize },

    #[error("Invalid '{field}': {value} (must be positive)")]
    NonPositive { field: &'static str, value: f64 },

    #[error("Invalid '{field}': {value} (must be a fraction within range)")]
    InvalidFraction { field: &'static str, value: f64 },
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    histogram_bins: Option<usize>,
    top_categories: Option<usize>,
    zscore_threshold: Option<f64>,
    iqr_multiplier: Option<f64>,
    sample_fraction: Option<f64>,
    figure_width: Option<usize>,
    figure_height: Option<usize>,
    vertical_spacing: Option<f64>,
}

impl AnalysisConfigBuilder {
    /// Set the number of histogram bins.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set how many top categories appear in bar panels.
    pub fn top_categories(mut self, n: usize) -> Self {
        self.top_categories = Some(n);
        self
    }

    /// Set the z-score outlier threshold.
    pub fn zscore_threshold(mut self, threshold: f64) -> Self {
        self.zscore_threshold = Some(threshold);
        self
    }

    /// Set the IQR fence multiplier.
    pub fn iqr_multiplier(mut self, k: f64) -> Self {
        self.iqr_multiplier = Some(k);
        self
    }

    /// Set the overview sample fraction.
    pub fn sample_fraction(mut self, fraction: f64) -> Self {
        self.sample_fraction = Some(fraction);
        self
    }

    /// Set the figure dimensions in pixels.
    pub fn figure_size(mut self, width: usize, height: usize) -> Self {
        self.figure_width = Some(width);
        self.figure_height = Some(height);
        self
    }

    /// Set the vertical spacing fraction between grid panels.
    pub fn vertical_spacing(mut self, spacing: f64) -> Self {
        self.vertical_spacing = Some(spacing);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
            top_categories: self.top_categories.unwrap_or(defaults.top_categories),
            zscore_threshold: self.zscore_threshold.unwrap_or(defaults.zscore_threshold),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(defaults.iqr_multiplier),
            sample_fraction: self.sample_fraction.unwrap_or(defaults.sample_fraction),
            figure_width: self.figure_width.unwrap_or(defaults.figure_width),
            figure_height: self.figure_height.unwrap_or(defaults.figure_height),
            vertical_spacing: self.vertical_spacing.unwrap_or(defaults.vertical_spacing),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.histogram_bins, 20);
        assert_eq!(config.top_categories, 10);
        assert_eq!(config.zscore_threshold, 3.0);
        assert_eq!(config.iqr_multiplier, 1.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = AnalysisConfig::builder()
            .histogram_bins(30)
            .top_categories(5)
            .zscore_threshold(2.5)
            .figure_size(1200, 800)
            .build()
            .unwrap();

        assert_eq!(config.histogram_bins, 30);
        assert_eq!(config.top_categories, 5);
        assert_eq!(config.zscore_threshold, 2.5);
        assert_eq!(config.figure_width, 1200);
        assert_eq!(config.figure_height, 800);
    }

    #[test]
    fn test_validation_rejects_zero_bins() {
        let result = AnalysisConfig::builder().histogram_bins(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidCount { field: "histogram_bins", .. }
        ));
    }

    #[test]
    fn test_validation_rejects_bad_sample_fraction() {
        let result = AnalysisConfig::builder().sample_fraction(1.5).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidFraction { field: "sample_fraction", .. }
        ));
    }

    #[test]
    fn test_validation_rejects_negative_threshold() {
        let result = AnalysisConfig::builder().zscore_threshold(-1.0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = AnalysisConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: AnalysisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.histogram_bins, deserialized.histogram_bins);
        assert_eq!(config.zscore_threshold, deserialized.zscore_threshold);
    }
}
