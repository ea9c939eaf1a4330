//! Synthetic benign and attack traffic generators used by the separability
//! sweeps (`spec.md` §6, grounded on
//! `examples/original_source/src/sim/synthetic.py`).

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::sim::flow::{FlowKey, Packet};
use crate::sim::traffic::TrafficSource;

/// Configuration for [`SyntheticBenign`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticBenignConfig {
    /// Number of distinct benign flows.
    pub flows: usize,
    /// Mean of the per-flow lognormal rate distribution (kbps, log-space).
    pub rate_kbps_mu: f64,
    /// Standard deviation of the per-flow lognormal rate distribution.
    pub rate_kbps_sigma: f64,
    /// Total duration of the generated traffic, in milliseconds.
    pub duration_ms: u64,
    /// Epoch length in milliseconds.
    pub epoch_ms: u64,
    /// RNG seed.
    pub seed: u64,
}

impl Default for SyntheticBenignConfig {
    fn default() -> Self {
        Self {
            flows: 5000,
            rate_kbps_mu: 4.5,
            rate_kbps_sigma: 1.0,
            duration_ms: 5000,
            epoch_ms: 1000,
            seed: 1,
        }
    }
}

/// Generates one packet per flow per epoch at a per-flow lognormal rate.
pub struct SyntheticBenign {
    config: SyntheticBenignConfig,
    flows: Vec<FlowKey>,
    rates_kbps: Vec<f64>,
}

const SRC_BASE: u64 = 100_000;
const DST_BASE: u64 = 200_000;

impl SyntheticBenign {
    /// Construct a generator from the given configuration.
    pub fn new(config: SyntheticBenignConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut flows = Vec::with_capacity(config.flows);
        let mut rates_kbps = Vec::with_capacity(config.flows);
        for idx in 0..config.flows as u64 {
            flows.push(FlowKey {
                src: SRC_BASE + idx,
                dst: DST_BASE + idx,
            });
            rates_kbps.push(lognormal(&mut rng, config.rate_kbps_mu, config.rate_kbps_sigma));
        }
        Self {
            config,
            flows,
            rates_kbps,
        }
    }
}

impl TrafficSource for SyntheticBenign {
    fn packets(&self) -> Vec<Packet> {
        let epoch_ms = self.config.epoch_ms;
        let epoch_count = (self.config.duration_ms / epoch_ms).max(1);
        let mut out = Vec::new();
        for epoch in 0..epoch_count {
            let base_ts = (epoch * epoch_ms) as f64;
            for (idx, (&flow, &rate_kbps)) in
                self.flows.iter().zip(self.rates_kbps.iter()).enumerate()
            {
                let mut size = (rate_kbps * 1000.0 / 8.0 * (epoch_ms as f64 / 1000.0)) as u64;
                if size == 0 {
                    size = 1;
                }
                let ts_ms = base_ts
                    + (idx as f64 / self.flows.len().max(1) as f64) * (epoch_ms as f64 - 1.0);
                out.push(Packet {
                    ts_ms,
                    src: flow.src,
                    dst: flow.dst,
                    size,
                    flow,
                });
            }
        }
        out
    }
}

/// Configuration for [`SyntheticAttack`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticAttackConfig {
    /// Number of attacking bots.
    pub bots: u64,
    /// Per-bot send rate in megabits/sec.
    pub rate_mbps: f64,
    /// Number of decoy destinations.
    pub decoys: u64,
    /// Attack start time in milliseconds.
    pub attack_start_ms: u64,
    /// Attack end time in milliseconds.
    pub attack_end_ms: u64,
    /// Epoch length in milliseconds.
    pub epoch_ms: u64,
    /// RNG seed.
    pub seed: u64,
    /// Number of decoys each bot fans out to; `None` means every decoy.
    pub decoy_sample: Option<u64>,
}

impl Default for SyntheticAttackConfig {
    fn default() -> Self {
        Self {
            bots: 100,
            rate_mbps: 100.0,
            decoys: 1,
            attack_start_ms: 0,
            attack_end_ms: 5000,
            epoch_ms: 1000,
            seed: 7,
            decoy_sample: None,
        }
    }
}

/// Generates bots-x-decoys LFA-style attack traffic.
pub struct SyntheticAttack {
    config: SyntheticAttackConfig,
    /// Bot source addresses.
    pub attack_srcs: Vec<u64>,
    /// Decoy destination addresses.
    pub attack_dsts: Vec<u64>,
    bot_decoys: HashMap<u64, Vec<u64>>,
    decoy_sample: usize,
}

const ATTACK_SRC_BASE: u64 = 10_000_000;
const ATTACK_DST_BASE: u64 = 20_000_000;

impl SyntheticAttack {
    /// Construct a generator from the given configuration.
    pub fn new(config: SyntheticAttackConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let attack_srcs: Vec<u64> = (0..config.bots).map(|i| ATTACK_SRC_BASE + i).collect();
        let attack_dsts: Vec<u64> = (0..config.decoys).map(|i| ATTACK_DST_BASE + i).collect();
        let sample = config.decoy_sample.unwrap_or(config.decoys);
        let decoy_sample = (sample.max(1).min(config.decoys)) as usize;

        let mut bot_decoys = HashMap::new();
        for &bot in &attack_srcs {
            let decoys = if decoy_sample == attack_dsts.len() {
                attack_dsts.clone()
            } else {
                sample_without_replacement(&mut rng, &attack_dsts, decoy_sample)
            };
            bot_decoys.insert(bot, decoys);
        }

        Self {
            config,
            attack_srcs,
            attack_dsts,
            bot_decoys,
            decoy_sample,
        }
    }
}

impl TrafficSource for SyntheticAttack {
    fn packets(&self) -> Vec<Packet> {
        let epoch_ms = self.config.epoch_ms;
        let bytes_per_bot =
            self.config.rate_mbps * 1_000_000.0 / 8.0 * (epoch_ms as f64 / 1000.0);
        let bytes_per_flow = bytes_per_bot / self.decoy_sample as f64;
        let mut out = Vec::new();

        let mut ts_ms = self.config.attack_start_ms;
        while ts_ms < self.config.attack_end_ms {
            for (bot_idx, &bot) in self.attack_srcs.iter().enumerate() {
                let decoys = &self.bot_decoys[&bot];
                for (decoy_idx, &decoy) in decoys.iter().enumerate() {
                    let mut size = bytes_per_flow as u64;
                    if size == 0 {
                        size = 1;
                    }
                    let flow = FlowKey { src: bot, dst: decoy };
                    let offset = (bot_idx as f64 + decoy_idx as f64 / decoys.len().max(1) as f64)
                        / self.config.bots.max(1) as f64;
                    out.push(Packet {
                        ts_ms: ts_ms as f64 + offset * (epoch_ms as f64 - 1.0),
                        src: bot,
                        dst: decoy,
                        size,
                        flow,
                    });
                }
            }
            ts_ms += epoch_ms;
        }
        out
    }
}

/// Box-Muller standard normal sample transformed into a lognormal draw.
fn lognormal(rng: &mut StdRng, mu: f64, sigma: f64) -> f64 {
    let u1: f64 = rng.random_range(f64::EPSILON..1.0);
    let u2: f64 = rng.random_range(0.0..1.0);
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    (mu + sigma * z).exp()
}

/// Sample `k` distinct elements from `items` without replacement (partial
/// Fisher-Yates).
fn sample_without_replacement(rng: &mut StdRng, items: &[u64], k: usize) -> Vec<u64> {
    let mut pool = items.to_vec();
    let n = pool.len();
    let k = k.min(n);
    for i in 0..k {
        let j = rng.random_range(i..n);
        pool.swap(i, j);
    }
    pool.truncate(k);
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn benign_generates_one_packet_per_flow_per_epoch() {
        let config = SyntheticBenignConfig {
            flows: 3,
            duration_ms: 3000,
            epoch_ms: 1000,
            ..SyntheticBenignConfig::default()
        };
        let gen = SyntheticBenign::new(config);
        let packets = gen.packets();
        assert_eq!(packets.len(), 3 * 3);
    }

    #[test]
    fn attack_with_full_decoy_sample_hits_every_decoy_each_round() {
        let config = SyntheticAttackConfig {
            bots: 2,
            decoys: 4,
            attack_start_ms: 0,
            attack_end_ms: 2000,
            epoch_ms: 1000,
            decoy_sample: None,
            ..SyntheticAttackConfig::default()
        };
        let gen = SyntheticAttack::new(config);
        let packets = gen.packets();
        assert_eq!(packets.len(), 2 * 2 * 4);
    }

    #[test]
    fn decoy_sample_limits_fanout_per_bot() {
        let config = SyntheticAttackConfig {
            bots: 5,
            decoys: 100,
            attack_start_ms: 0,
            attack_end_ms: 1000,
            epoch_ms: 1000,
            decoy_sample: Some(3),
            ..SyntheticAttackConfig::default()
        };
        let gen = SyntheticAttack::new(config);
        for decoys in gen.bot_decoys.values() {
            assert_eq!(decoys.len(), 3);
        }
    }

    #[test]
    fn deterministic_given_same_seed() {
        let config = SyntheticBenignConfig::default();
        let a = SyntheticBenign::new(config).packets();
        let b = SyntheticBenign::new(config).packets();
        assert_eq!(a.len(), b.len());
        for (pa, pb) in a.iter().zip(b.iter()) {
            assert_eq!(pa.size, pb.size);
        }
    }
}
