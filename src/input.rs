//! Results file loading and validation.
//!
//! A results file is a JSON document with the candidate model's per-trial
//! samples and the baseline model's constant scores:
//!
//! ```json
//! {
//!   "candidate": {
//!     "name": "Random Forest",
//!     "samples": { "macro_precision": [0.2499, 0.2560], "...": [] }
//!   },
//!   "baseline": {
//!     "name": "SchemaTree",
//!     "scores": { "macro_precision": 0.3612, "...": 0.0 }
//!   }
//! }
//! ```
//!
//! Validation requires all six metrics on both sides, non-empty samples, and
//! every value in [0, 1] (precision/recall/F1 are bounded proportions).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metrics::{BaselineResults, CandidateResults, MetricLabel};

/// Errors for results file loading and validation
#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read results file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse results file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("metric {metric} missing from {section}")]
    MissingMetric {
        metric: MetricLabel,
        section: &'static str,
    },

    #[error("empty sample for {metric}: at least one trial score is required")]
    EmptySample { metric: MetricLabel },

    #[error("score {value} for {metric} is outside [0, 1]")]
    OutOfRange { metric: MetricLabel, value: f64 },
}

/// Validated input for one comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub candidate: CandidateResults,
    pub baseline: BaselineResults,
}

/// Load and validate a JSON results file.
pub fn load_results(path: &Path) -> Result<ComparisonInput, InputError> {
    let text = fs::read_to_string(path)?;
    let input: ComparisonInput = serde_json::from_str(&text)?;
    validate(&input)?;
    Ok(input)
}

/// Validate a deserialized comparison input.
///
/// Every metric must be present on both sides, every sample non-empty, and
/// every value a finite proportion in [0, 1].
pub fn validate(input: &ComparisonInput) -> Result<(), InputError> {
    for label in MetricLabel::ALL {
        let sample = input.candidate.samples.get(&label).ok_or(InputError::MissingMetric {
            metric: label,
            section: "candidate.samples",
        })?;
        if sample.is_empty() {
            return Err(InputError::EmptySample { metric: label });
        }
        for &value in sample {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(InputError::OutOfRange { metric: label, value });
            }
        }

        let &score = input.baseline.scores.get(&label).ok_or(InputError::MissingMetric {
            metric: label,
            section: "baseline.scores",
        })?;
        if !score.is_finite() || !(0.0..=1.0).contains(&score) {
            return Err(InputError::OutOfRange { metric: label, value: score });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn valid_input() -> ComparisonInput {
        let mut samples = BTreeMap::new();
        let mut scores = BTreeMap::new();
        for label in MetricLabel::ALL {
            samples.insert(label, vec![0.4, 0.5, 0.6]);
            scores.insert(label, 0.45);
        }
        ComparisonInput {
            candidate: CandidateResults {
                name: "candidate".to_string(),
                samples,
            },
            baseline: BaselineResults {
                name: "baseline".to_string(),
                scores,
            },
        }
    }

    #[test]
    fn test_validate_accepts_complete_input() {
        assert!(validate(&valid_input()).is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_candidate_metric() {
        let mut input = valid_input();
        input.candidate.samples.remove(&MetricLabel::MacroF1);
        match validate(&input) {
            Err(InputError::MissingMetric { metric, section }) => {
                assert_eq!(metric, MetricLabel::MacroF1);
                assert_eq!(section, "candidate.samples");
            }
            other => panic!("expected MissingMetric, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_missing_baseline_metric() {
        let mut input = valid_input();
        input.baseline.scores.remove(&MetricLabel::WeightedRecall);
        match validate(&input) {
            Err(InputError::MissingMetric { metric, section }) => {
                assert_eq!(metric, MetricLabel::WeightedRecall);
                assert_eq!(section, "baseline.scores");
            }
            other => panic!("expected MissingMetric, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_empty_sample() {
        let mut input = valid_input();
        input.candidate.samples.insert(MetricLabel::MacroRecall, vec![]);
        match validate(&input) {
            Err(InputError::EmptySample { metric }) => {
                assert_eq!(metric, MetricLabel::MacroRecall);
            }
            other => panic!("expected EmptySample, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range_sample_value() {
        let mut input = valid_input();
        input
            .candidate
            .samples
            .insert(MetricLabel::WeightedF1, vec![0.5, 1.2]);
        match validate(&input) {
            Err(InputError::OutOfRange { metric, value }) => {
                assert_eq!(metric, MetricLabel::WeightedF1);
                assert_eq!(value, 1.2);
            }
            other => panic!("expected OutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_non_finite_baseline() {
        let mut input = valid_input();
        input.baseline.scores.insert(MetricLabel::MacroPrecision, f64::NAN);
        assert!(matches!(
            validate(&input),
            Err(InputError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_parse_results_document() {
        let json = r#"{
            "candidate": {
                "name": "Random Forest",
                "samples": {
                    "macro_precision": [0.25, 0.26],
                    "macro_recall": [0.39, 0.40],
                    "macro_f1": [0.28, 0.29],
                    "weighted_precision": [0.61, 0.62],
                    "weighted_recall": [0.86, 0.87],
                    "weighted_f1": [0.70, 0.71]
                }
            },
            "baseline": {
                "name": "SchemaTree",
                "scores": {
                    "macro_precision": 0.3612,
                    "macro_recall": 0.3236,
                    "macro_f1": 0.3267,
                    "weighted_precision": 0.5657,
                    "weighted_recall": 0.5678,
                    "weighted_f1": 0.5588
                }
            }
        }"#;
        let input: ComparisonInput = serde_json::from_str(json).unwrap();
        assert!(validate(&input).is_ok());
        assert_eq!(input.candidate.name, "Random Forest");
        assert_eq!(
            input.baseline.scores[&MetricLabel::MacroPrecision],
            0.3612
        );
    }

    #[test]
    fn test_load_results_missing_file() {
        let err = load_results(Path::new("/nonexistent/results.json")).unwrap_err();
        assert!(matches!(err, InputError::Io(_)));
    }
}
