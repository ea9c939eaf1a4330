//! Epoch-based controller tying the detector, fan-out estimator, score model,
//! and queue mapper together (`spec.md` §4.6).

use std::collections::HashMap;

use crate::core::config::{EpochConfig, FanoutConfig, QueueConfig, ScoreConfig, TopKConfig};
use crate::detector::{FlowDetector, FlowRecord};
use crate::fanout::FanoutEstimator;
use crate::queue::QueueMapper;
use crate::scoring::ScoreModel;

/// Per-candidate feature vector built at epoch close.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateFeatures {
    /// Bytes/sec observed for this candidate during the epoch.
    pub rate: f64,
    /// Estimated distinct-peer fan-out for this candidate during the epoch.
    pub fanout: f64,
    /// Persistence count carried over from prior epochs.
    pub persist: f64,
}

/// Output of one epoch's worth of processing.
#[derive(Debug, Clone)]
pub struct EpochResult {
    /// Heavy-hitter records reported by the top-k filter this epoch.
    pub heavy_keys: Vec<FlowRecord>,
    /// Suspicion score per candidate key.
    pub scores: HashMap<u64, f64>,
    /// Mitigation queue assignment per candidate key.
    pub queue_map: HashMap<u64, usize>,
}

/// Drives one key dimension (e.g. `src` or `dst`) through detection, scoring,
/// and queue assignment, epoch by epoch.
pub struct EpochManager {
    detector: FlowDetector,
    fanout: FanoutEstimator,
    score_model: ScoreModel,
    queue_mapper: QueueMapper,
    epoch_cfg: EpochConfig,
    candidates: std::collections::HashSet<u64>,
    persist: HashMap<u64, u32>,
    bytes: HashMap<u64, u64>,
}

impl EpochManager {
    /// Construct a manager from its subsystem configurations.
    pub fn new(
        topk_cfg: &TopKConfig,
        fanout_cfg: &FanoutConfig,
        score_cfg: &ScoreConfig,
        queue_cfg: &QueueConfig,
        epoch_cfg: &EpochConfig,
    ) -> Self {
        Self {
            detector: FlowDetector::new(topk_cfg),
            fanout: FanoutEstimator::new(fanout_cfg),
            score_model: ScoreModel::new(*score_cfg),
            queue_mapper: QueueMapper::new(*queue_cfg),
            epoch_cfg: *epoch_cfg,
            candidates: std::collections::HashSet::new(),
            persist: HashMap::new(),
            bytes: HashMap::new(),
        }
    }

    /// Feed one packet: `key` always goes through the detector; fan-out and
    /// byte-rate bookkeeping only accrue once `key` is an active candidate
    /// from the prior epoch's heavy set.
    pub fn on_packet(&mut self, key: u64, other: u64, size: u64) {
        self.detector.on_packet(key, size);
        if self.candidates.contains(&key) {
            self.fanout.update(key, other);
            *self.bytes.entry(key).or_insert(0) += size;
        }
    }

    /// Close the epoch: snapshot heavy keys, build features, score, map to
    /// queues, then rotate persistence/candidate state for the next epoch.
    pub fn end_epoch(&mut self) -> EpochResult {
        let heavy = dedup_by_max_count(self.detector.end_epoch());
        let heavy_keys: std::collections::HashSet<u64> = heavy.iter().map(|r| r.key).collect();
        let features = self.build_features(&heavy);

        let stats = self.score_model.compute_stats(
            features.values().map(|f| f.rate),
            features.values().map(|f| f.fanout),
            features.values().map(|f| f.persist),
        );
        let scores: HashMap<u64, f64> = features
            .iter()
            .map(|(&key, f)| (key, self.score_model.score(f.rate, f.fanout, f.persist, &stats)))
            .collect();

        self.queue_mapper.update(scores.values().copied());
        let queue_map: HashMap<u64, usize> = scores
            .iter()
            .map(|(&key, &score)| (key, self.queue_mapper.map_score(score)))
            .collect();

        self.rotate_epoch(&heavy_keys);

        EpochResult {
            heavy_keys: heavy,
            scores,
            queue_map,
        }
    }

    fn build_features(&self, heavy: &[FlowRecord]) -> HashMap<u64, CandidateFeatures> {
        let epoch_secs = (self.epoch_cfg.epoch_ms as f64 / 1000.0).max(1.0);
        heavy
            .iter()
            .map(|rec| {
                let persist = *self.persist.get(&rec.key).unwrap_or(&0) as f64;
                let rate = *self.bytes.get(&rec.key).unwrap_or(&0) as f64 / epoch_secs;
                let fanout = self.fanout.estimate(rec.key);
                (rec.key, CandidateFeatures { rate, fanout, persist })
            })
            .collect()
    }

    fn rotate_epoch(&mut self, heavy_keys: &std::collections::HashSet<u64>) {
        for &key in heavy_keys {
            let entry = self.persist.entry(key).or_insert(0);
            *entry = (*entry + 1).min(self.epoch_cfg.persist_k);
        }
        self.persist.retain(|key, count| {
            if !heavy_keys.contains(key) {
                *count = count.saturating_sub(1);
            }
            *count > 0
        });
        self.candidates = heavy_keys.clone();
        self.bytes.clear();
        self.fanout.reset();
        self.detector.reset();
    }

    /// Current persistence counts, keyed by candidate key. Exposed for
    /// testing and introspection; not part of the per-epoch result.
    pub fn persist_snapshot(&self) -> HashMap<u64, u32> {
        self.persist.clone()
    }
}

/// The top-k filter's raw snapshot may report the same key from more than
/// one stage bucket; keep the maximum count per key rather than the last
/// one encountered.
fn dedup_by_max_count(records: Vec<FlowRecord>) -> Vec<FlowRecord> {
    let mut by_key: HashMap<u64, FlowRecord> = HashMap::new();
    for rec in records {
        by_key
            .entry(rec.key)
            .and_modify(|existing| {
                if rec.count > existing.count {
                    existing.count = rec.count;
                }
            })
            .or_insert(rec);
    }
    by_key.into_values().collect()
}
