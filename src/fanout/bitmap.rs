//! Linear-counting bitmap fan-out estimator (`spec.md` §4.2.1).

use std::collections::HashMap;

use crate::core::config::FanoutConfig;
use crate::hash::hash_value;

const WORD_BITS: usize = 64;

/// Per-key bitmap of `m` bits. `update` sets one bit per distinct peer seen;
/// `estimate` applies the linear-counting cardinality formula.
pub struct BitmapEstimator {
    bits: usize,
    words_per_key: usize,
    maps: HashMap<u64, Vec<u64>>,
}

impl BitmapEstimator {
    /// Construct an estimator with `config.bitmap_bits` bits per key.
    pub fn new(config: &FanoutConfig) -> Self {
        Self {
            bits: config.bitmap_bits,
            words_per_key: config.bitmap_bits.div_ceil(WORD_BITS),
            maps: HashMap::new(),
        }
    }

    /// Record that `key` was observed sending to peer `other`.
    pub fn update(&mut self, key: u64, other: u64) {
        let idx = (hash_value(other) as usize) % self.bits;
        let words = self
            .maps
            .entry(key)
            .or_insert_with(|| vec![0u64; self.words_per_key]);
        words[idx / WORD_BITS] |= 1u64 << (idx % WORD_BITS);
    }

    /// Estimate the cardinality of distinct peers seen for `key`.
    ///
    /// Returns `m` (the saturation sentinel) once every bit is set.
    pub fn estimate(&self, key: u64) -> f64 {
        let Some(words) = self.maps.get(&key) else {
            return 0.0;
        };
        let set_bits: u32 = words.iter().map(|w| w.count_ones()).sum();
        let zeros = self.bits as i64 - set_bits as i64;
        if zeros <= 0 {
            return self.bits as f64;
        }
        let m = self.bits as f64;
        -m * (zeros as f64 / m).ln()
    }

    /// Clear all per-key bitmaps.
    pub fn reset(&mut self) {
        self.maps.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(bits: usize) -> FanoutConfig {
        FanoutConfig {
            mode: crate::core::config::FanoutMode::Bitmap,
            bitmap_bits: bits,
            hll_p: 6,
            hll_reg_bits: 6,
        }
    }

    #[test]
    fn empty_estimate_is_zero() {
        let est = BitmapEstimator::new(&cfg(256));
        assert_eq!(est.estimate(1), 0.0);
    }

    #[test]
    fn saturates_at_m_when_all_bits_set() {
        let mut est = BitmapEstimator::new(&cfg(8));
        // Insert enough distinct peers to guarantee full saturation
        // regardless of hash collisions within the small 8-bit space.
        for other in 0..5000u64 {
            est.update(1, other);
        }
        assert_eq!(est.estimate(1), 8.0);
    }

    #[test]
    fn estimate_grows_with_distinct_peers() {
        let mut est = BitmapEstimator::new(&cfg(4096));
        for other in 0..50u64 {
            est.update(1, other);
        }
        let e50 = est.estimate(1);
        for other in 50..500u64 {
            est.update(1, other);
        }
        let e500 = est.estimate(1);
        assert!(e500 > e50);
    }

    #[test]
    fn reset_clears_all_keys() {
        let mut est = BitmapEstimator::new(&cfg(256));
        est.update(1, 10);
        est.update(2, 20);
        est.reset();
        assert_eq!(est.estimate(1), 0.0);
        assert_eq!(est.estimate(2), 0.0);
    }
}
