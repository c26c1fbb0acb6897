// Comparison verdict assessment
//
// Drives the per-metric tests, isolates per-metric failures, and produces
// the aggregate verdict plus the human-readable report.

use std::collections::BTreeMap;

use anyhow::Result;

use crate::comparison::config::ComparisonConfig;
use crate::comparison::statistics::{compare_sample, ComparisonError, MetricTest};
use crate::metrics::{BaselineResults, CandidateResults, MetricLabel};

/// Aggregate verdict for a candidate-vs-baseline comparison
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonVerdict {
    /// No metric shows a statistically significant difference
    NoSignificantDifference,

    /// At least one metric differs significantly (p < significance level)
    SignificantDifference { metrics: Vec<MetricLabel> },

    /// No metric produced a valid test statistic
    InsufficientData { reason: String },
}

/// Detailed comparison assessment result
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonAssessment {
    pub candidate_name: String,
    pub baseline_name: String,

    /// Final verdict
    pub verdict: ComparisonVerdict,

    /// Per-metric tests, keyed in canonical label order
    pub tests: BTreeMap<MetricLabel, MetricTest>,

    /// Metrics whose test failed; failures never abort the batch
    pub failures: BTreeMap<MetricLabel, ComparisonError>,

    /// Configuration used for the assessment
    pub config: ComparisonConfig,
}

impl ComparisonAssessment {
    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        match &self.verdict {
            ComparisonVerdict::NoSignificantDifference => {
                report.push_str("✅ NO SIGNIFICANT DIFFERENCE\n\n");
            }
            ComparisonVerdict::SignificantDifference { metrics } => {
                report.push_str(&format!(
                    "❌ SIGNIFICANT DIFFERENCE ({} of {} metrics)\n\n",
                    metrics.len(),
                    MetricLabel::ALL.len()
                ));
            }
            ComparisonVerdict::InsufficientData { reason } => {
                report.push_str("⚠️  INSUFFICIENT DATA\n\n");
                report.push_str(&format!("Reason: {}\n\n", reason));
            }
        }

        report.push_str(&format!("Candidate: {}\n", self.candidate_name));
        report.push_str(&format!("Baseline:  {}\n", self.baseline_name));
        report.push_str(&format!(
            "Significance level: {} ({}% confidence)\n",
            self.config.significance_level,
            (1.0 - self.config.significance_level) * 100.0
        ));

        if !self.tests.is_empty() {
            report.push_str("\n📊 Metric Tests:\n");
            for label in MetricLabel::ALL {
                if let Some(test) = self.tests.get(&label) {
                    report.push_str(&format!(
                        "  {:<19} mean={:.6}  baseline={:.6}  p={:.6}{}  ({}, n={})\n",
                        label.to_string(),
                        test.mean,
                        test.baseline,
                        test.pvalue,
                        significance_stars(test.pvalue),
                        test.method_used.as_str(),
                        test.n_used
                    ));
                }
            }
        }

        if !self.failures.is_empty() {
            report.push_str(&format!(
                "\n⚠️  Skipped metrics ({}):\n",
                self.failures.len()
            ));
            for (label, error) in &self.failures {
                report.push_str(&format!("  - {}: {}\n", label, error));
            }
        }

        report
    }
}

/// Significance stars
fn significance_stars(p: f64) -> &'static str {
    if p < 0.001 {
        " ***"
    } else if p < 0.01 {
        " **"
    } else if p < 0.05 {
        " *"
    } else {
        ""
    }
}

/// Compare a candidate model's per-trial metric samples against a baseline
/// model's constant scores.
///
/// Every metric is tested independently; a failing metric is recorded under
/// its label and the remaining metrics still produce results.
///
/// # Example
/// ```
/// use std::collections::BTreeMap;
/// use cotejar::comparison::{compare_models, ComparisonConfig, ComparisonVerdict};
/// use cotejar::metrics::{BaselineResults, CandidateResults, MetricLabel};
///
/// let mut samples = BTreeMap::new();
/// let mut scores = BTreeMap::new();
/// for label in MetricLabel::ALL {
///     samples.insert(label, vec![0.50, 0.52, 0.51, 0.53, 0.50, 0.49]);
///     scores.insert(label, 0.515);
/// }
/// let candidate = CandidateResults { name: "candidate".into(), samples };
/// let baseline = BaselineResults { name: "baseline".into(), scores };
///
/// let assessment =
///     compare_models(&candidate, &baseline, &ComparisonConfig::default()).unwrap();
/// assert_eq!(assessment.tests.len(), 6);
/// ```
pub fn compare_models(
    candidate: &CandidateResults,
    baseline: &BaselineResults,
    config: &ComparisonConfig,
) -> Result<ComparisonAssessment> {
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let mut tests = BTreeMap::new();
    let mut failures = BTreeMap::new();

    for label in MetricLabel::ALL {
        let Some(sample) = candidate.samples.get(&label) else {
            failures.insert(label, ComparisonError::MissingSample);
            continue;
        };
        let Some(&base) = baseline.scores.get(&label) else {
            failures.insert(label, ComparisonError::MissingBaseline);
            continue;
        };

        if sample.len() < config.min_sample_size {
            failures.insert(
                label,
                ComparisonError::InsufficientSamples {
                    required: config.min_sample_size,
                    actual: sample.len(),
                },
            );
            continue;
        }

        match compare_sample(sample, base, config.method) {
            Ok(test) => {
                tests.insert(label, test);
            }
            Err(e) => {
                tracing::warn!("signed-rank test failed for {}: {}", label, e);
                failures.insert(label, e);
            }
        }
    }

    let significant: Vec<MetricLabel> = tests
        .iter()
        .filter(|(_, test)| test.pvalue < config.significance_level)
        .map(|(label, _)| *label)
        .collect();

    let verdict = if tests.is_empty() {
        ComparisonVerdict::InsufficientData {
            reason: format!(
                "no metric produced a valid test (min_sample_size={}, failed metrics={})",
                config.min_sample_size,
                failures.len()
            ),
        }
    } else if significant.is_empty() {
        ComparisonVerdict::NoSignificantDifference
    } else {
        ComparisonVerdict::SignificantDifference {
            metrics: significant,
        }
    };

    Ok(ComparisonAssessment {
        candidate_name: candidate.name.clone(),
        baseline_name: baseline.name.clone(),
        verdict,
        tests,
        failures,
        config: config.clone(),
    })
}
