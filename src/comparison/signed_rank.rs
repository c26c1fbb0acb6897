// One-sample Wilcoxon signed-rank test
//
// Tests whether a vector of differences is distributed symmetrically around
// zero. Non-parametric: no normality assumption on the differences, which is
// what makes it suitable for scores from repeated stochastic training runs.
//
// Conventions (these change results, so they are fixed here rather than left
// to a library default):
// - Zero differences are discarded before ranking (Wilcoxon convention);
//   the effective sample size shrinks accordingly and the discarded count is
//   reported in the result.
// - Absolute differences are ranked with average ranks for ties.
// - The statistic is W+, the sum of ranks of the positive differences.
// - Two-sided p-value: exact enumeration of the null distribution of W+
//   when n <= EXACT_N_LIMIT, no rank ties, and no zeros were discarded;
//   otherwise the normal approximation with tie-corrected variance and no
//   continuity correction.

use serde::{Deserialize, Serialize};

use crate::comparison::statistics::ComparisonError;

/// Largest effective sample size for which the exact null distribution is
/// enumerated under [`PValueMethod::Auto`].
pub const EXACT_N_LIMIT: usize = 25;

/// P-value computation policy for the signed-rank test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PValueMethod {
    /// Exact when the sample is small, untied, and zero-free; normal
    /// approximation otherwise.
    Auto,
    /// Exact enumeration. Falls back to the normal approximation (with a
    /// warning) when ties or discarded zeros make the exact distribution
    /// invalid.
    Exact,
    /// Normal approximation with tie-corrected variance.
    NormalApprox,
}

impl PValueMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PValueMethod::Auto => "auto",
            PValueMethod::Exact => "exact",
            PValueMethod::NormalApprox => "normal approximation",
        }
    }
}

/// Result of a one-sample signed-rank test.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedRankTest {
    /// W+: sum of the ranks of the positive differences.
    pub statistic: f64,

    /// Two-sided p-value in [0, 1].
    pub pvalue: f64,

    /// Effective sample size after discarding zero differences.
    pub n_used: usize,

    /// Number of zero differences discarded before ranking.
    pub n_zeros: usize,

    /// Method that actually produced the p-value (never `Auto`).
    pub method_used: PValueMethod,
}

/// Run the one-sample Wilcoxon signed-rank test on a difference vector.
///
/// # Arguments
/// * `diffs` - Per-trial differences from the baseline constant
/// * `method` - P-value policy; `Auto` picks exact vs. approximation
///
/// # Errors
/// `ComparisonError::EmptySample` for an empty input;
/// `ComparisonError::AllDifferencesZero` when every difference is zero and
/// no test statistic exists.
pub fn signed_rank_test(
    diffs: &[f64],
    method: PValueMethod,
) -> Result<SignedRankTest, ComparisonError> {
    if diffs.is_empty() {
        return Err(ComparisonError::EmptySample);
    }

    let nonzero: Vec<f64> = diffs.iter().copied().filter(|d| *d != 0.0).collect();
    let n_zeros = diffs.len() - nonzero.len();
    let n = nonzero.len();
    if n == 0 {
        return Err(ComparisonError::AllDifferencesZero { n: diffs.len() });
    }

    let abs: Vec<f64> = nonzero.iter().map(|d| d.abs()).collect();
    let (ranks, tie_sizes) = average_ranks(&abs);
    let has_ties = tie_sizes.iter().any(|&t| t > 1);

    let w_plus: f64 = nonzero
        .iter()
        .zip(&ranks)
        .filter(|(d, _)| **d > 0.0)
        .map(|(_, r)| *r)
        .sum();

    let exact_valid = n <= EXACT_N_LIMIT && !has_ties && n_zeros == 0;
    let use_exact = match method {
        PValueMethod::Auto => exact_valid,
        PValueMethod::NormalApprox => false,
        PValueMethod::Exact => {
            if !exact_valid {
                tracing::warn!(
                    "exact p-value unavailable (n={}, ties={}, zeros={}); \
                     using normal approximation",
                    n,
                    has_ties,
                    n_zeros
                );
            }
            exact_valid
        }
    };

    let (pvalue, method_used) = if use_exact {
        (exact_two_sided(w_plus, n), PValueMethod::Exact)
    } else {
        (
            normal_two_sided(w_plus, n, &tie_sizes),
            PValueMethod::NormalApprox,
        )
    };

    Ok(SignedRankTest {
        statistic: w_plus,
        pvalue,
        n_used: n,
        n_zeros,
        method_used,
    })
}

/// Rank values ascending, assigning tied values the average of their ranks.
///
/// Returns 1-based ranks in input order plus the size of each tie group
/// (group sizes are needed for the variance correction).
fn average_ranks(values: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0.0f64; n];
    let mut tie_sizes = Vec::new();
    let mut i = 0usize;
    while i < n {
        let mut j = i;
        while j + 1 < n && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // positions i..=j hold equal values; ranks i+1..=j+1 average out
        let avg = (i + j + 2) as f64 / 2.0;
        for k in i..=j {
            ranks[order[k]] = avg;
        }
        tie_sizes.push(j - i + 1);
        i = j + 1;
    }
    (ranks, tie_sizes)
}

/// Exact two-sided p-value by enumerating the null distribution of W+.
///
/// Under the null every rank carries its sign independently with probability
/// 1/2, so `counts[w]` (the number of subsets of {1..n} summing to w) over
/// 2^n is the exact probability mass. Valid only for untied integer ranks.
fn exact_two_sided(w_plus: f64, n: usize) -> f64 {
    let max_w = n * (n + 1) / 2;
    let mut counts = vec![0u64; max_w + 1];
    counts[0] = 1;
    for rank in 1..=n {
        for w in (rank..=max_w).rev() {
            counts[w] += counts[w - rank];
        }
    }

    let w = (w_plus.round() as usize).min(max_w);
    let lower: u64 = counts[..=w].iter().sum();
    let upper: u64 = counts[w..].iter().sum();
    let total = (1u64 << n) as f64;
    let tail = lower.min(upper) as f64;
    (2.0 * tail / total).min(1.0)
}

/// Two-sided p-value from the normal approximation of W+.
///
/// Mean n(n+1)/4, variance n(n+1)(2n+1)/24 reduced by sum(t^3 - t)/48 over
/// tie groups. No continuity correction.
fn normal_two_sided(w_plus: f64, n: usize, tie_sizes: &[usize]) -> f64 {
    let nf = n as f64;
    let mean = nf * (nf + 1.0) / 4.0;
    let tie_correction: f64 = tie_sizes
        .iter()
        .map(|&t| {
            let t = t as f64;
            (t * t * t - t) / 48.0
        })
        .sum();
    let var = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0 - tie_correction;
    let z = (w_plus - mean) / var.sqrt();

    // 2 * (1 - Phi(|z|)) collapses to 1 - erf(|z| / sqrt(2))
    (1.0 - erf(z.abs() / std::f64::consts::SQRT_2)).clamp(0.0, 1.0)
}

/// Error function approximation (Abramowitz and Stegun 7.1.26, |err| < 1.5e-7)
fn erf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();
    sign * y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erf_reference_values() {
        assert!(erf(0.0).abs() < 1e-9);
        assert!((erf(1.0) - 0.842_700_79).abs() < 1e-6);
        assert!((erf(-1.0) + 0.842_700_79).abs() < 1e-6);
        assert!((erf(3.0) - 0.999_977_9).abs() < 1e-6);
    }

    #[test]
    fn test_average_ranks_distinct() {
        let (ranks, ties) = average_ranks(&[0.3, 0.1, 0.2]);
        assert_eq!(ranks, vec![3.0, 1.0, 2.0]);
        assert_eq!(ties, vec![1, 1, 1]);
    }

    #[test]
    fn test_average_ranks_with_ties() {
        // 0.05 and 0.05 share ranks 1 and 2 -> 1.5; 0.1 and 0.1 share 3 and 4 -> 3.5
        let (ranks, ties) = average_ranks(&[0.1, 0.1, 0.05, 0.05]);
        assert_eq!(ranks, vec![3.5, 3.5, 1.5, 1.5]);
        assert_eq!(ties, vec![2, 2]);
    }

    #[test]
    fn test_exact_one_directional_n10() {
        // All ten differences positive, distinct magnitudes: W+ takes its
        // maximum value and the exact two-sided p-value is 2/2^10.
        let diffs: Vec<f64> = (1..=10).map(|i| i as f64 / 100.0).collect();
        let test = signed_rank_test(&diffs, PValueMethod::Auto).unwrap();
        assert_eq!(test.method_used, PValueMethod::Exact);
        assert_eq!(test.statistic, 55.0);
        assert!((test.pvalue - 2.0 / 1024.0).abs() < 1e-12);
    }

    #[test]
    fn test_exact_mixed_signs() {
        // W+ = 1 + 3 + 5 = 9 with n = 5; exact two-sided p = 2 * 13 / 32.
        let diffs = [1.0, -2.0, 3.0, -4.0, 5.0];
        let test = signed_rank_test(&diffs, PValueMethod::Auto).unwrap();
        assert_eq!(test.method_used, PValueMethod::Exact);
        assert_eq!(test.statistic, 9.0);
        assert!((test.pvalue - 0.8125).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric_tied_sample_not_significant() {
        // Perfectly balanced around zero with tied magnitudes: ties force the
        // normal path, z = 0, p = 1.
        let diffs = [-0.1, 0.1, -0.05, 0.05];
        let test = signed_rank_test(&diffs, PValueMethod::Auto).unwrap();
        assert_eq!(test.method_used, PValueMethod::NormalApprox);
        assert!((test.pvalue - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zeros_are_discarded() {
        let diffs = [0.0, 0.1, -0.2, 0.3];
        let test = signed_rank_test(&diffs, PValueMethod::Auto).unwrap();
        assert_eq!(test.n_used, 3);
        assert_eq!(test.n_zeros, 1);
        // discarded zero invalidates the exact distribution
        assert_eq!(test.method_used, PValueMethod::NormalApprox);
        assert!(test.pvalue > 0.0 && test.pvalue <= 1.0);
    }

    #[test]
    fn test_all_zero_differences_degenerate() {
        let diffs = [0.0, 0.0, 0.0];
        match signed_rank_test(&diffs, PValueMethod::Auto) {
            Err(ComparisonError::AllDifferencesZero { n }) => assert_eq!(n, 3),
            other => panic!("expected AllDifferencesZero, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            signed_rank_test(&[], PValueMethod::Auto),
            Err(ComparisonError::EmptySample)
        ));
    }

    #[test]
    fn test_forced_normal_on_untied_data() {
        let diffs: Vec<f64> = (1..=10).map(|i| i as f64 / 100.0).collect();
        let test = signed_rank_test(&diffs, PValueMethod::NormalApprox).unwrap();
        assert_eq!(test.method_used, PValueMethod::NormalApprox);
        // approximation stays in the same significance regime as the exact value
        assert!(test.pvalue < 0.01);
    }

    #[test]
    fn test_forced_exact_falls_back_on_ties() {
        let diffs = [-0.1, 0.1, -0.05, 0.05];
        let test = signed_rank_test(&diffs, PValueMethod::Exact).unwrap();
        assert_eq!(test.method_used, PValueMethod::NormalApprox);
    }

    #[test]
    fn test_exact_distribution_is_symmetric() {
        // P(W+ <= w) doubling must give the same p for w and its mirror.
        let n = 8;
        for w in 0..=(n * (n + 1) / 2) {
            let p_low = exact_two_sided(w as f64, n);
            let p_high = exact_two_sided((n * (n + 1) / 2 - w) as f64, n);
            assert!((p_low - p_high).abs() < 1e-12);
        }
    }

    #[test]
    fn test_statistic_bounded_by_rank_sum() {
        let diffs = [0.02, -0.01, 0.05, 0.04, -0.03, 0.06, 0.07];
        let test = signed_rank_test(&diffs, PValueMethod::Auto).unwrap();
        let max_w = (test.n_used * (test.n_used + 1)) as f64 / 2.0;
        assert!(test.statistic >= 0.0 && test.statistic <= max_w);
    }

    #[test]
    fn test_normal_approximation_large_shift() {
        // Three tied pairs among the magnitudes; one-directional shift must
        // still come out strongly significant under the tie-corrected normal.
        let sample = [0.40, 0.42, 0.41, 0.43, 0.44, 0.39, 0.45, 0.41, 0.40, 0.43];
        let diffs: Vec<f64> = sample.iter().map(|x| x - 0.30).collect();
        let test = signed_rank_test(&diffs, PValueMethod::Auto).unwrap();
        assert_eq!(test.method_used, PValueMethod::NormalApprox);
        assert!(test.pvalue < 0.01, "p = {}", test.pvalue);
    }
}
