//! Metric label set and model result containers.
//!
//! The six labels form a fixed ordered set; every consumer (statistics, text
//! output, JSON output, charting) iterates in this order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification metric identifier.
///
/// Declaration order is the canonical iteration order. Serialized as
/// `snake_case` identifiers in results files and JSON reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricLabel {
    MacroPrecision,
    MacroRecall,
    MacroF1,
    WeightedPrecision,
    WeightedRecall,
    WeightedF1,
}

impl MetricLabel {
    /// All metrics in canonical order.
    pub const ALL: [MetricLabel; 6] = [
        MetricLabel::MacroPrecision,
        MetricLabel::MacroRecall,
        MetricLabel::MacroF1,
        MetricLabel::WeightedPrecision,
        MetricLabel::WeightedRecall,
        MetricLabel::WeightedF1,
    ];

    /// Human-readable label for text output and chart ticks.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricLabel::MacroPrecision => "Macro Precision",
            MetricLabel::MacroRecall => "Macro Recall",
            MetricLabel::MacroF1 => "Macro F1",
            MetricLabel::WeightedPrecision => "Weighted Precision",
            MetricLabel::WeightedRecall => "Weighted Recall",
            MetricLabel::WeightedF1 => "Weighted F1",
        }
    }

    /// Stable identifier used as the JSON key.
    pub fn id(&self) -> &'static str {
        match self {
            MetricLabel::MacroPrecision => "macro_precision",
            MetricLabel::MacroRecall => "macro_recall",
            MetricLabel::MacroF1 => "macro_f1",
            MetricLabel::WeightedPrecision => "weighted_precision",
            MetricLabel::WeightedRecall => "weighted_recall",
            MetricLabel::WeightedF1 => "weighted_f1",
        }
    }
}

impl fmt::Display for MetricLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-trial metric scores for the stochastic candidate model.
///
/// Each sample holds one score per independent training/evaluation trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResults {
    pub name: String,
    pub samples: BTreeMap<MetricLabel, Vec<f64>>,
}

/// Constant per-metric scores for the deterministic baseline model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineResults {
    pub name: String,
    pub scores: BTreeMap<MetricLabel, f64>,
}
