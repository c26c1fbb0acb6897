// Statistical comparison of a stochastic candidate model against a
// deterministic baseline.
//
// Each metric is tested independently with the one-sample Wilcoxon
// signed-rank test on the per-trial differences from the baseline constant.
// One metric's failure never aborts the batch; failures are collected per
// label alongside the successful tests.
//
// Implementation:
// - signed_rank: ranking, exact null distribution, normal approximation
// - statistics: per-metric mean/median/stddev and the MetricTest record
// - config: significance level, sample-size floor, p-value policy
// - verdict: batch driver, aggregate verdict, human-readable report

mod config;
mod signed_rank;
mod statistics;
mod verdict;

pub use config::ComparisonConfig;
pub use signed_rank::{signed_rank_test, PValueMethod, SignedRankTest, EXACT_N_LIMIT};
pub use statistics::{compare_sample, mean, median, stddev, ComparisonError, MetricTest};
pub use verdict::{compare_models, ComparisonAssessment, ComparisonVerdict};
