//! Cotejar - statistical comparison of classifier evaluation metrics
//!
//! Compares a stochastic candidate model's per-trial metric scores against a
//! deterministic baseline model using the one-sample Wilcoxon signed-rank
//! test, and renders grouped bar charts of the per-metric means.

pub mod chart;
pub mod cli;
pub mod comparison;
pub mod input;
pub mod json_output;
pub mod metrics;
