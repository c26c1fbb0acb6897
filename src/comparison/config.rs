// Configuration for statistical metric comparison

use serde::{Deserialize, Serialize};

use crate::comparison::signed_rank::PValueMethod;

/// Configuration for comparing candidate metrics against a baseline
///
/// # Example
/// ```
/// use cotejar::comparison::ComparisonConfig;
///
/// let config = ComparisonConfig::default();
/// assert_eq!(config.significance_level, 0.05); // 95% confidence
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// Statistical significance level (alpha) for the signed-rank test
    ///
    /// - 0.05 (default): 95% confidence level
    /// - 0.01: 99% confidence level, stricter
    /// - 0.10: 90% confidence level, looser
    pub significance_level: f64,

    /// Minimum trials per metric before a test is attempted
    ///
    /// The signed-rank test is defined from one non-zero difference upward,
    /// but a two-sided p-value below conventional thresholds needs roughly
    /// five usable pairs.
    ///
    /// Default: 5 trials minimum
    pub min_sample_size: usize,

    /// P-value computation policy
    ///
    /// `Auto` (default) selects exact enumeration when the effective sample
    /// is small enough and free of rank ties, and falls back to the normal
    /// approximation otherwise. See [`PValueMethod`].
    pub method: PValueMethod,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            significance_level: 0.05, // 95% confidence (standard in science)
            min_sample_size: 5,
            method: PValueMethod::Auto,
        }
    }
}

impl ComparisonConfig {
    /// Create a strict configuration (fewer false positives, more false negatives)
    ///
    /// Use when you want high confidence in a reported difference.
    pub fn strict() -> Self {
        Self {
            significance_level: 0.01, // 99% confidence
            min_sample_size: 10,
            method: PValueMethod::Auto,
        }
    }

    /// Create a permissive configuration (more false positives, fewer false negatives)
    ///
    /// Use when you want to surface potential differences early.
    pub fn permissive() -> Self {
        Self {
            significance_level: 0.10, // 90% confidence
            min_sample_size: 3,
            method: PValueMethod::Auto,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.significance_level) {
            return Err(format!(
                "significance_level must be in [0, 1], got {}",
                self.significance_level
            ));
        }

        if self.min_sample_size < 1 {
            return Err(format!(
                "min_sample_size must be >= 1, got {}",
                self.min_sample_size
            ));
        }

        Ok(())
    }
}
