//! Fan-out / fan-in cardinality estimators for candidate keys (`spec.md` §4.2).
//!
//! Both backends share the contract `update(key, other)`, `estimate(key)`,
//! `reset()`. Per Design Note §9 this is modeled as a tagged variant
//! (`FanoutEstimator`) rather than dynamic dispatch through a shared heap
//! pointer, since the call site already knows the configured mode.

mod bitmap;
mod hll_lite;

pub use bitmap::BitmapEstimator;
pub use hll_lite::HllLiteEstimator;

use crate::core::config::{FanoutConfig, FanoutMode};

/// Per-candidate fan-out estimator, dispatching statically to whichever
/// backend the configuration selects.
pub enum FanoutEstimator {
    /// Linear-counting bitmap backend.
    Bitmap(BitmapEstimator),
    /// HyperLogLog-lite backend.
    HllLite(HllLiteEstimator),
}

impl FanoutEstimator {
    /// Construct the estimator selected by `config.mode`.
    pub fn new(config: &FanoutConfig) -> Self {
        match config.mode {
            FanoutMode::Bitmap => Self::Bitmap(BitmapEstimator::new(config)),
            FanoutMode::HllLite => Self::HllLite(HllLiteEstimator::new(config)),
        }
    }

    /// Record that `key` was observed fanning out to peer `other`.
    pub fn update(&mut self, key: u64, other: u64) {
        match self {
            Self::Bitmap(b) => b.update(key, other),
            Self::HllLite(h) => h.update(key, other),
        }
    }

    /// Estimate the cardinality of distinct peers seen for `key`.
    pub fn estimate(&self, key: u64) -> f64 {
        match self {
            Self::Bitmap(b) => b.estimate(key),
            Self::HllLite(h) => h.estimate(key),
        }
    }

    /// Clear all per-key state.
    pub fn reset(&mut self) {
        match self {
            Self::Bitmap(b) => b.reset(),
            Self::HllLite(h) => h.reset(),
        }
    }
}
