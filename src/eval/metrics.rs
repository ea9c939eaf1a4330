//! Detection and mitigation quality metrics (`spec.md` §6, grounded on
//! `examples/original_source/src/ms_satshield/metrics.py`).
//!
//! Pure functions only, consumed by the sweep CLI; the core detector never
//! calls into this module.

use std::collections::HashSet;
use std::hash::Hash;

/// Precision, recall, and F1 of `pred` against `truth`, treating both as
/// sets.
pub fn precision_recall_f1<T, I, J>(pred: I, truth: J) -> (f64, f64, f64)
where
    T: Eq + Hash,
    I: IntoIterator<Item = T>,
    J: IntoIterator<Item = T>,
{
    let pred_set: HashSet<T> = pred.into_iter().collect();
    let truth_set: HashSet<T> = truth.into_iter().collect();
    let tp = pred_set.intersection(&truth_set).count();
    let fp = pred_set.difference(&truth_set).count();
    let fn_ = truth_set.difference(&pred_set).count();

    let precision = if tp + fp > 0 {
        tp as f64 / (tp + fp) as f64
    } else {
        0.0
    };
    let recall = if tp + fn_ > 0 {
        tp as f64 / (tp + fn_) as f64
    } else {
        0.0
    };
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };
    (precision, recall, f1)
}

/// Mean relative error between paired estimates and ground-truth values,
/// skipping any pair whose truth is zero. Returns `0.0` if the inputs are
/// empty, mismatched in length, or every truth is zero.
pub fn average_relative_error(estimates: &[f64], truths: &[f64]) -> f64 {
    if estimates.is_empty() || estimates.len() != truths.len() {
        return 0.0;
    }
    let errors: Vec<f64> = estimates
        .iter()
        .zip(truths.iter())
        .filter(|(_, &truth)| truth != 0.0)
        .map(|(&est, &truth)| (est - truth).abs() / truth)
        .collect();
    if errors.is_empty() {
        return 0.0;
    }
    errors.iter().sum::<f64>() / errors.len() as f64
}

/// Time from attack onset to mitigation onset, clamped at zero.
pub fn reaction_time(attack_start_ms: f64, mitigation_start_ms: f64) -> f64 {
    (mitigation_start_ms - attack_start_ms).max(0.0)
}

/// Fractional throughput drop from `before` to `during`, clamped at zero.
/// Returns `0.0` if `before` is non-positive.
pub fn throughput_drop(before: f64, during: f64) -> f64 {
    if before <= 0.0 {
        return 0.0;
    }
    ((before - during) / before).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_match_gives_f1_of_one() {
        let (p, r, f1) = precision_recall_f1(vec![1, 2, 3], vec![1, 2, 3]);
        assert_eq!(p, 1.0);
        assert_eq!(r, 1.0);
        assert_eq!(f1, 1.0);
    }

    #[test]
    fn disjoint_sets_give_zero_f1() {
        let (_, _, f1) = precision_recall_f1(vec![1, 2], vec![3, 4]);
        assert_eq!(f1, 0.0);
    }

    #[test]
    fn partial_overlap_computes_expected_precision_recall() {
        let (p, r, _) = precision_recall_f1(vec![1, 2, 3], vec![2, 3, 4]);
        assert!((p - 2.0 / 3.0).abs() < 1e-9);
        assert!((r - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn average_relative_error_skips_zero_truths() {
        let err = average_relative_error(&[10.0, 5.0], &[0.0, 10.0]);
        assert!((err - 0.5).abs() < 1e-9);
    }

    #[test]
    fn average_relative_error_empty_is_zero() {
        assert_eq!(average_relative_error(&[], &[]), 0.0);
        assert_eq!(average_relative_error(&[1.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn reaction_time_clamps_at_zero() {
        assert_eq!(reaction_time(100.0, 50.0), 0.0);
        assert_eq!(reaction_time(100.0, 150.0), 50.0);
    }

    #[test]
    fn throughput_drop_clamps_and_handles_non_positive_before() {
        assert_eq!(throughput_drop(0.0, 5.0), 0.0);
        assert_eq!(throughput_drop(100.0, 120.0), 0.0);
        assert!((throughput_drop(100.0, 40.0) - 0.6).abs() < 1e-9);
    }
}
