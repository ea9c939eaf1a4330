//! Runs MS-SatShield detection for `src` and/or `dst` keys in parallel
//! (`spec.md` §4.7).

use std::collections::HashMap;

use crate::core::config::{Config, KeyMode};
use crate::epoch::{EpochManager, EpochResult};

/// Combined result of one epoch across every active key dimension.
#[derive(Debug, Clone)]
pub struct MultiEpochResult {
    /// Epoch result per key dimension (`"src"` and/or `"dst"`).
    pub results: HashMap<&'static str, EpochResult>,
}

/// Owns one [`EpochManager`] per configured key dimension and fans packets
/// out to each.
pub struct MultiKeyEpochManager {
    key_mode: KeyMode,
    managers: HashMap<&'static str, EpochManager>,
}

impl MultiKeyEpochManager {
    /// Construct managers for whichever dimensions `config.key_mode` selects.
    pub fn new(config: &Config) -> Self {
        let mut managers = HashMap::new();
        if matches!(config.key_mode, KeyMode::Src | KeyMode::SrcDst) {
            managers.insert(
                "src",
                EpochManager::new(
                    &config.topk,
                    &config.fanout,
                    &config.score,
                    &config.queue,
                    &config.epoch,
                ),
            );
        }
        if matches!(config.key_mode, KeyMode::Dst | KeyMode::SrcDst) {
            managers.insert(
                "dst",
                EpochManager::new(
                    &config.topk,
                    &config.fanout,
                    &config.score,
                    &config.queue,
                    &config.epoch,
                ),
            );
        }
        Self {
            key_mode: config.key_mode,
            managers,
        }
    }

    /// Feed a packet to every active dimension, swapping `src`/`dst` as the
    /// key/peer pair for each.
    pub fn on_packet(&mut self, src: u64, dst: u64, size: u64) {
        if let Some(mgr) = self.managers.get_mut("src") {
            mgr.on_packet(src, dst, size);
        }
        if let Some(mgr) = self.managers.get_mut("dst") {
            mgr.on_packet(dst, src, size);
        }
    }

    /// Close the epoch on every active dimension.
    pub fn end_epoch(&mut self) -> MultiEpochResult {
        let results = self
            .managers
            .iter_mut()
            .map(|(&dim, mgr)| (dim, mgr.end_epoch()))
            .collect();
        MultiEpochResult { results }
    }

    /// The key mode this manager was constructed with.
    pub fn key_mode(&self) -> KeyMode {
        self.key_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{FanoutMode, NormMode, QueueMapping};
    use crate::core::config::{EpochConfig, FanoutConfig, QueueConfig, ScoreConfig, TopKConfig};

    fn config(key_mode: KeyMode) -> Config {
        Config {
            topk: TopKConfig {
                stages: 4,
                buckets_per_stage: 64,
                epoch_ms: 1000,
                heavy_threshold_bytes: 0,
            },
            fanout: FanoutConfig {
                mode: FanoutMode::Bitmap,
                bitmap_bits: 256,
                hll_p: 6,
                hll_reg_bits: 6,
            },
            score: ScoreConfig {
                alpha: 0.6,
                beta: 0.3,
                gamma: 0.1,
                persist_k: 3,
                norm_mode: NormMode::P99,
            },
            queue: QueueConfig {
                num_queues: 4,
                mapping: QueueMapping::Sigmoid,
            },
            epoch: EpochConfig {
                epoch_ms: 1000,
                persist_k: 3,
            },
            key_mode,
        }
    }

    #[test]
    fn src_dst_mode_creates_both_managers() {
        let mgr = MultiKeyEpochManager::new(&config(KeyMode::SrcDst));
        assert!(mgr.managers.contains_key("src"));
        assert!(mgr.managers.contains_key("dst"));
    }

    #[test]
    fn src_only_mode_creates_one_manager() {
        let mgr = MultiKeyEpochManager::new(&config(KeyMode::Src));
        assert!(mgr.managers.contains_key("src"));
        assert!(!mgr.managers.contains_key("dst"));
    }

    #[test]
    fn end_epoch_reports_one_result_per_active_dimension() {
        let mut mgr = MultiKeyEpochManager::new(&config(KeyMode::SrcDst));
        for _ in 0..100 {
            mgr.on_packet(1, 2, 1000);
        }
        let result = mgr.end_epoch();
        assert_eq!(result.results.len(), 2);
        assert!(result.results["src"].heavy_keys.iter().any(|r| r.key == 1));
        assert!(result.results["dst"].heavy_keys.iter().any(|r| r.key == 2));
    }
}
