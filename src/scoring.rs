//! Suspicion score model fusing rate, fan-out, and persistence (`spec.md` §4.4).

use crate::core::config::{NormMode, ScoreConfig};

/// Per-epoch normalization statistics computed from the candidate feature
/// columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormStats {
    /// 99th-percentile (or max, depending on `norm_mode`) rate scale.
    pub rate_p99: f64,
    /// 99th-percentile (or max) fan-out scale.
    pub fanout_p99: f64,
    /// Maximum observed persistence.
    pub persist_max: f64,
}

/// Fuses `(rate, fanout, persist)` into a single suspicion score.
pub struct ScoreModel {
    config: ScoreConfig,
}

impl ScoreModel {
    /// Construct a score model from the given weights/configuration.
    pub fn new(config: ScoreConfig) -> Self {
        Self { config }
    }

    /// Compute per-epoch normalization stats over the candidate feature
    /// columns. Returns `1.0` for every field when the input is empty.
    pub fn compute_stats<I, J, K>(&self, rates: I, fanouts: J, persists: K) -> NormStats
    where
        I: IntoIterator<Item = f64>,
        J: IntoIterator<Item = f64>,
        K: IntoIterator<Item = f64>,
    {
        let scale = |values: Vec<f64>| match self.config.norm_mode {
            NormMode::Max => values.iter().cloned().fold(f64::MIN, f64::max),
            NormMode::P99 | NormMode::Zscore => percentile(values, 0.99),
        };
        let rates: Vec<f64> = rates.into_iter().collect();
        let fanouts: Vec<f64> = fanouts.into_iter().collect();
        let persists: Vec<f64> = persists.into_iter().collect();
        NormStats {
            rate_p99: if rates.is_empty() { 1.0 } else { scale(rates) },
            fanout_p99: if fanouts.is_empty() { 1.0 } else { scale(fanouts) },
            persist_max: if persists.is_empty() {
                1.0
            } else {
                persists.iter().cloned().fold(f64::MIN, f64::max)
            },
        }
    }

    /// Score a single key's features against the epoch's normalization stats.
    pub fn score(&self, rate: f64, fanout: f64, persist: f64, stats: &NormStats) -> f64 {
        let nr = normalize(rate, stats.rate_p99);
        let nf = normalize(fanout, stats.fanout_p99);
        let np = normalize(persist, stats.persist_max);
        self.config.alpha * nr + self.config.beta * nf + self.config.gamma * np
    }
}

/// 99th-percentile by `index = floor(0.99 * (n - 1))` on a sorted ascending
/// list. Returns `1.0` for an empty input.
fn percentile(mut values: Vec<f64>, q: f64) -> f64 {
    if values.is_empty() {
        return 1.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let idx = (q * (values.len() - 1) as f64) as usize;
    values[idx]
}

fn normalize(value: f64, scale: f64) -> f64 {
    if scale <= 0.0 {
        0.0
    } else {
        (value / scale).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ScoreConfig {
        ScoreConfig {
            alpha: 0.6,
            beta: 0.3,
            gamma: 0.1,
            persist_k: 3,
            norm_mode: NormMode::P99,
        }
    }

    #[test]
    fn empty_stats_default_to_one() {
        let model = ScoreModel::new(cfg());
        let stats = model.compute_stats(vec![], vec![], vec![]);
        assert_eq!(stats.rate_p99, 1.0);
        assert_eq!(stats.fanout_p99, 1.0);
        assert_eq!(stats.persist_max, 1.0);
    }

    #[test]
    fn score_is_weighted_sum_of_normalized_features() {
        let model = ScoreModel::new(cfg());
        let stats = NormStats {
            rate_p99: 100.0,
            fanout_p99: 10.0,
            persist_max: 3.0,
        };
        let score = model.score(50.0, 5.0, 3.0, &stats);
        assert!((score - (0.6 * 0.5 + 0.3 * 0.5 + 0.1 * 1.0)).abs() < 1e-9);
    }

    #[test]
    fn normalize_clamps_to_one() {
        assert_eq!(normalize(200.0, 100.0), 1.0);
        assert_eq!(normalize(0.0, 100.0), 0.0);
        assert_eq!(normalize(50.0, 0.0), 0.0);
    }

    #[test]
    fn percentile_matches_sorted_index() {
        let values = vec![5.0, 1.0, 3.0, 2.0, 4.0];
        // n = 5, idx = floor(0.99 * 4) = 3 -> sorted[3] = 4.0
        assert_eq!(percentile(values, 0.99), 4.0);
    }
}
