//! HyperLogLog-lite fan-out estimator (`spec.md` §4.2.2).
//!
//! No small-range or large-range corrections are applied — this is the
//! "lite" variant and must match that behavior exactly to stay comparable
//! with published results (see `spec.md` §4.2.2).

use std::collections::HashMap;

use crate::core::config::FanoutConfig;
use crate::hash::hash_value;

/// Per-key HyperLogLog-lite register bank.
pub struct HllLiteEstimator {
    p: u8,
    m: usize,
    alpha: f64,
    maps: HashMap<u64, Vec<u8>>,
}

impl HllLiteEstimator {
    /// Construct an estimator with `m = 2^config.hll_p` registers per key.
    pub fn new(config: &FanoutConfig) -> Self {
        let m = 1usize << config.hll_p;
        Self {
            p: config.hll_p,
            m,
            alpha: alpha_m(m),
            maps: HashMap::new(),
        }
    }

    /// Record that `key` was observed sending to peer `other`.
    pub fn update(&mut self, key: u64, other: u64) {
        let y = hash_value(other) as u64;
        let j = (y as usize) & (self.m - 1);
        let w = y >> self.p;
        let rank = rho(w, 32 - self.p as u32);
        let regs = self.maps.entry(key).or_insert_with(|| vec![0u8; self.m]);
        if rank > regs[j] {
            regs[j] = rank;
        }
    }

    /// Estimate the cardinality of distinct peers seen for `key`.
    pub fn estimate(&self, key: u64) -> f64 {
        let Some(regs) = self.maps.get(&key) else {
            return 0.0;
        };
        let inv_sum: f64 = regs.iter().map(|&r| 2f64.powi(-(r as i32))).sum();
        if inv_sum == 0.0 {
            return 0.0;
        }
        self.alpha * (self.m as f64).powi(2) / inv_sum
    }

    /// Clear all per-key register banks.
    pub fn reset(&mut self) {
        self.maps.clear();
    }
}

/// Position of the leading 1 bit in the `bits`-bit value `value`, i.e. the
/// HLL "rho" function: `bits + 1` when `value == 0`.
fn rho(value: u64, bits: u32) -> u8 {
    if value == 0 {
        return (bits + 1) as u8;
    }
    (bits - (64 - value.leading_zeros()) + 1) as u8
}

fn alpha_m(m: usize) -> f64 {
    match m {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / m as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(p: u8) -> FanoutConfig {
        FanoutConfig {
            mode: crate::core::config::FanoutMode::HllLite,
            bitmap_bits: 256,
            hll_p: p,
            hll_reg_bits: 6,
        }
    }

    #[test]
    fn empty_estimate_is_zero() {
        let est = HllLiteEstimator::new(&cfg(6));
        assert_eq!(est.estimate(1), 0.0);
    }

    #[test]
    fn estimate_is_within_relative_error_at_mid_range() {
        let mut est = HllLiteEstimator::new(&cfg(10));
        let n = 5000u64;
        for other in 0..n {
            est.update(1, other);
        }
        let estimate = est.estimate(1);
        let rel_err = (estimate - n as f64).abs() / n as f64;
        // ~1.04/sqrt(m) for m = 1024, with slack for the lack of bias
        // correction that this "lite" variant intentionally omits.
        assert!(rel_err < 0.15, "relative error too high: {rel_err}");
    }

    #[test]
    fn reset_clears_all_keys() {
        let mut est = HllLiteEstimator::new(&cfg(6));
        est.update(1, 10);
        est.reset();
        assert_eq!(est.estimate(1), 0.0);
    }

    #[test]
    fn rho_of_zero_is_bits_plus_one() {
        assert_eq!(rho(0, 26), 27);
    }

    #[test]
    fn alpha_m_matches_known_constants() {
        assert_eq!(alpha_m(16), 0.673);
        assert_eq!(alpha_m(32), 0.697);
        assert_eq!(alpha_m(64), 0.709);
    }
}
