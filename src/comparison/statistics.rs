// Statistical functions for metric comparison
//
// The mean is computed in f64: it feeds the comparison result directly and
// must match sum/count to tight tolerance. Median and standard deviation are
// descriptive extras for reports and use aprender's DescriptiveStats and
// trueno's SIMD vector primitives.

use aprender::stats::DescriptiveStats;
use thiserror::Error;
use trueno::Vector;

use crate::comparison::signed_rank::{signed_rank_test, PValueMethod};

/// Errors for per-metric statistical comparison
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComparisonError {
    #[error("empty sample: at least one trial score is required")]
    EmptySample,

    #[error("insufficient samples: need at least {required} trials, got {actual}")]
    InsufficientSamples { required: usize, actual: usize },

    #[error("degenerate test: all {n} differences from the baseline are zero")]
    AllDifferencesZero { n: usize },

    #[error("metric missing from candidate samples")]
    MissingSample,

    #[error("metric missing from baseline scores")]
    MissingBaseline,

    #[error("descriptive statistics failed: {0}")]
    Descriptive(String),
}

/// Result of comparing one metric's trial sample against its baseline score
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTest {
    /// Arithmetic mean of the trial scores
    pub mean: f64,

    /// Median of the trial scores
    pub median: f64,

    /// Standard deviation of the trial scores
    pub stddev: f64,

    /// Baseline constant the sample was tested against
    pub baseline: f64,

    /// W+: sum of positive-difference ranks
    pub statistic: f64,

    /// Two-sided p-value - probability that the difference is due to chance
    /// - p < significance level: candidate and baseline differ
    /// - p >= significance level: no evidence of a difference
    pub pvalue: f64,

    /// Effective sample size after zero-difference removal
    pub n_used: usize,

    /// Zero differences discarded before ranking
    pub n_zeros: usize,

    /// P-value method actually used
    pub method_used: PValueMethod,
}

/// Arithmetic mean in f64.
///
/// Matches sum of elements divided by count to within 1e-9.
pub fn mean(values: &[f64]) -> Result<f64, ComparisonError> {
    if values.is_empty() {
        return Err(ComparisonError::EmptySample);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median using aprender's DescriptiveStats.
///
/// Median is more robust to outliers than the mean, so reports carry both.
pub fn median(values: &[f64]) -> Result<f64, ComparisonError> {
    if values.is_empty() {
        return Err(ComparisonError::EmptySample);
    }
    let v32: Vec<f32> = values.iter().map(|&v| v as f32).collect();
    let vector = Vector::from_slice(&v32);
    let stats = DescriptiveStats::new(&vector);
    stats
        .quantile(0.5)
        .map(f64::from)
        .map_err(|e| ComparisonError::Descriptive(format!("failed to compute median: {}", e)))
}

/// Standard deviation using trueno's SIMD vector statistics.
pub fn stddev(values: &[f64]) -> f64 {
    let v32: Vec<f32> = values.iter().map(|&v| v as f32).collect();
    let vector = Vector::from_slice(&v32);
    vector.stddev().map(f64::from).unwrap_or(0.0)
}

/// Compare one metric's trial sample against its baseline constant.
///
/// # Arguments
/// * `sample` - Trial scores for this metric (one per independent run)
/// * `baseline` - The deterministic model's constant score
/// * `method` - P-value policy for the signed-rank test
///
/// # Example
/// ```
/// use cotejar::comparison::{compare_sample, PValueMethod};
///
/// let sample = vec![0.40, 0.42, 0.41, 0.43, 0.44, 0.39, 0.45, 0.41, 0.40, 0.43];
/// let test = compare_sample(&sample, 0.30, PValueMethod::Auto).unwrap();
/// assert!(test.pvalue < 0.01); // consistent one-directional shift
/// ```
pub fn compare_sample(
    sample: &[f64],
    baseline: f64,
    method: PValueMethod,
) -> Result<MetricTest, ComparisonError> {
    let mean = mean(sample)?;
    let median = median(sample)?;
    let stddev = stddev(sample);

    let diffs: Vec<f64> = sample.iter().map(|x| x - baseline).collect();
    let test = signed_rank_test(&diffs, method)?;

    Ok(MetricTest {
        mean,
        median,
        stddev,
        baseline,
        statistic: test.statistic,
        pvalue: test.pvalue,
        n_used: test.n_used,
        n_zeros: test.n_zeros,
        method_used: test.method_used,
    })
}
