//! Property-based tests for the statistical core

use proptest::prelude::*;

use cotejar::comparison::{compare_sample, mean, signed_rank_test, PValueMethod};

fn score_vec() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..=1.0, 1..40)
}

proptest! {
    #[test]
    fn prop_mean_matches_naive_sum(sample in score_vec()) {
        let naive = sample.iter().sum::<f64>() / sample.len() as f64;
        let m = mean(&sample).unwrap();
        prop_assert!((m - naive).abs() < 1e-9);
    }

    #[test]
    fn prop_pvalue_in_unit_interval(sample in score_vec(), baseline in 0.0f64..=1.0) {
        let diffs: Vec<f64> = sample.iter().map(|x| x - baseline).collect();
        if let Ok(test) = signed_rank_test(&diffs, PValueMethod::Auto) {
            prop_assert!((0.0..=1.0).contains(&test.pvalue));
        }
    }

    #[test]
    fn prop_statistic_bounded_by_rank_sum(sample in score_vec(), baseline in 0.0f64..=1.0) {
        let diffs: Vec<f64> = sample.iter().map(|x| x - baseline).collect();
        if let Ok(test) = signed_rank_test(&diffs, PValueMethod::Auto) {
            let max_w = (test.n_used * (test.n_used + 1)) as f64 / 2.0;
            prop_assert!(test.statistic >= 0.0);
            prop_assert!(test.statistic <= max_w);
        }
    }

    #[test]
    fn prop_effective_sample_accounts_for_zeros(sample in score_vec(), baseline in 0.0f64..=1.0) {
        let diffs: Vec<f64> = sample.iter().map(|x| x - baseline).collect();
        if let Ok(test) = signed_rank_test(&diffs, PValueMethod::Auto) {
            prop_assert_eq!(test.n_used + test.n_zeros, sample.len());
        }
    }

    #[test]
    fn prop_comparison_deterministic(sample in score_vec(), baseline in 0.0f64..=1.0) {
        let first = compare_sample(&sample, baseline, PValueMethod::Auto);
        let second = compare_sample(&sample, baseline, PValueMethod::Auto);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_methods_agree_on_significance_regime(
        shift in 0.2f64..0.4,
        noise in prop::collection::vec(-0.01f64..0.01, 10..20)
    ) {
        // one-directional shift well clear of the noise: both p-value paths
        // must land under conventional alpha
        let diffs: Vec<f64> = noise.iter().map(|e| shift + e).collect();
        let auto = signed_rank_test(&diffs, PValueMethod::Auto).unwrap();
        let normal = signed_rank_test(&diffs, PValueMethod::NormalApprox).unwrap();
        prop_assert!(auto.pvalue < 0.05);
        prop_assert!(normal.pvalue < 0.05);
    }
}
