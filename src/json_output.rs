//! JSON output format for comparison reports.

use serde::{Deserialize, Serialize};

use crate::comparison::{ComparisonAssessment, ComparisonVerdict, PValueMethod};
use crate::metrics::MetricLabel;

/// A single metric's test result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonMetricTest {
    /// Stable metric identifier (e.g., "macro_precision")
    pub metric: String,
    /// Human-readable label (e.g., "Macro Precision")
    pub label: String,
    pub mean: f64,
    pub median: f64,
    pub stddev: f64,
    pub baseline: f64,
    /// W+: sum of positive-difference ranks
    pub statistic: f64,
    pub p_value: f64,
    /// Effective sample size after zero-difference removal
    pub n_used: usize,
    pub n_zeros: usize,
    pub method: PValueMethod,
    pub significant: bool,
}

/// A metric whose test failed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonMetricFailure {
    pub metric: String,
    pub error: String,
}

/// Aggregate verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonVerdict {
    /// "significant_difference" | "no_significant_difference" | "insufficient_data"
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub significant_metrics: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Full machine-readable comparison report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub tool: String,
    pub version: String,
    pub candidate: String,
    pub baseline: String,
    pub significance_level: f64,
    pub metrics: Vec<JsonMetricTest>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub failures: Vec<JsonMetricFailure>,
    pub verdict: JsonVerdict,
}

/// Build the JSON report for an assessment.
///
/// Metrics appear in canonical label order regardless of map iteration.
pub fn build_report(assessment: &ComparisonAssessment) -> JsonReport {
    let mut metrics = Vec::new();
    let mut failures = Vec::new();

    for label in MetricLabel::ALL {
        if let Some(test) = assessment.tests.get(&label) {
            metrics.push(JsonMetricTest {
                metric: label.id().to_string(),
                label: label.to_string(),
                mean: test.mean,
                median: test.median,
                stddev: test.stddev,
                baseline: test.baseline,
                statistic: test.statistic,
                p_value: test.pvalue,
                n_used: test.n_used,
                n_zeros: test.n_zeros,
                method: test.method_used,
                significant: test.pvalue < assessment.config.significance_level,
            });
        }
        if let Some(error) = assessment.failures.get(&label) {
            failures.push(JsonMetricFailure {
                metric: label.id().to_string(),
                error: error.to_string(),
            });
        }
    }

    let verdict = match &assessment.verdict {
        ComparisonVerdict::NoSignificantDifference => JsonVerdict {
            status: "no_significant_difference".to_string(),
            significant_metrics: None,
            reason: None,
        },
        ComparisonVerdict::SignificantDifference { metrics } => JsonVerdict {
            status: "significant_difference".to_string(),
            significant_metrics: Some(metrics.iter().map(|m| m.id().to_string()).collect()),
            reason: None,
        },
        ComparisonVerdict::InsufficientData { reason } => JsonVerdict {
            status: "insufficient_data".to_string(),
            significant_metrics: None,
            reason: Some(reason.clone()),
        },
    };

    JsonReport {
        tool: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        candidate: assessment.candidate_name.clone(),
        baseline: assessment.baseline_name.clone(),
        significance_level: assessment.config.significance_level,
        metrics,
        failures,
        verdict,
    }
}
