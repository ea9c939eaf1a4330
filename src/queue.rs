//! Mitigation queue mapper (`spec.md` §4.5).

use crate::core::config::{QueueConfig, QueueMapping};

/// Maps suspicion scores to one of `num_queues` mitigation queues, either
/// statelessly (sigmoid) or via per-epoch learned quantile thresholds.
pub struct QueueMapper {
    config: QueueConfig,
    thresholds: Vec<f64>,
}

impl QueueMapper {
    /// Construct a mapper from the given configuration.
    pub fn new(config: QueueConfig) -> Self {
        Self {
            config,
            thresholds: Vec::new(),
        }
    }

    /// Recompute the learned thresholds (quantile mode only; a no-op under
    /// sigmoid mode).
    pub fn update<I: IntoIterator<Item = f64>>(&mut self, scores: I) {
        self.thresholds = match self.config.mapping {
            QueueMapping::Quantile => {
                quantile_thresholds(scores.into_iter().collect(), self.config.num_queues)
            }
            QueueMapping::Sigmoid => Vec::new(),
        };
    }

    /// Map a single score to a queue index in `0..num_queues`.
    pub fn map_score(&self, score: f64) -> usize {
        match self.config.mapping {
            QueueMapping::Quantile => {
                for (idx, &thr) in self.thresholds.iter().enumerate() {
                    if score <= thr {
                        return idx;
                    }
                }
                self.config.num_queues - 1
            }
            QueueMapping::Sigmoid => sigmoid_bucket(score, self.config.num_queues),
        }
    }
}

/// Thresholds are the sorted score array indexed at `floor(q * n / Q)` for
/// `q in 1..Q`, sort ascending and stable, inclusive from below.
fn quantile_thresholds(mut scores: Vec<f64>, num_queues: usize) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }
    scores.sort_by(|a, b| a.partial_cmp(b).unwrap());
    (1..num_queues)
        .map(|q| {
            let idx = (q * scores.len()) / num_queues;
            scores[idx.min(scores.len() - 1)]
        })
        .collect()
}

fn sigmoid_bucket(score: f64, num_queues: usize) -> usize {
    const K: f64 = 6.0;
    let s = 1.0 / (1.0 + (-K * (score - 0.5)).exp());
    let bucket = (s * (num_queues - 1) as f64) as isize;
    bucket.clamp(0, num_queues as isize - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(mapping: QueueMapping) -> QueueConfig {
        QueueConfig {
            num_queues: 4,
            mapping,
        }
    }

    #[test]
    fn sigmoid_is_monotone() {
        let mapper = QueueMapper::new(cfg(QueueMapping::Sigmoid));
        let mut prev = mapper.map_score(0.0);
        for i in 1..=100 {
            let score = i as f64 / 100.0;
            let cur = mapper.map_score(score);
            assert!(cur >= prev);
            prev = cur;
        }
    }

    #[test]
    fn sigmoid_high_score_reaches_top_queue() {
        let mapper = QueueMapper::new(cfg(QueueMapping::Sigmoid));
        assert_eq!(mapper.map_score(1.0), 3);
    }

    #[test]
    fn quantile_thresholds_match_sorted_indices() {
        let scores = vec![0.1, 0.5, 0.9, 0.2, 0.8, 0.3, 0.95, 0.05];
        let thresholds = quantile_thresholds(scores.clone(), 4);
        let mut sorted = scores.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let expected: Vec<f64> = (1..4)
            .map(|q| sorted[(q * sorted.len() / 4).min(sorted.len() - 1)])
            .collect();
        assert_eq!(thresholds, expected);
    }

    #[test]
    fn quantile_is_monotone() {
        let mut mapper = QueueMapper::new(cfg(QueueMapping::Quantile));
        let scores: Vec<f64> = (0..50).map(|i| i as f64 / 50.0).collect();
        mapper.update(scores.clone());
        let mut prev = mapper.map_score(scores[0]);
        for &s in &scores {
            let cur = mapper.map_score(s);
            assert!(cur >= prev);
            prev = cur;
        }
    }

    #[test]
    fn quantile_update_is_noop_for_sigmoid() {
        let mut mapper = QueueMapper::new(cfg(QueueMapping::Sigmoid));
        mapper.update(vec![0.1, 0.9]);
        assert!(mapper.thresholds.is_empty());
    }
}
