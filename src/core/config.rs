//! Configuration for MS-SatShield
//!
//! Mirrors the configuration surface in `spec.md` §6 and
//! `examples/original_source/src/ms_satshield/config.py` field-for-field,
//! loadable from TOML the way the teacher's `core/config.rs` loads its
//! own `Config` from a file path.

use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Key selection mode for the multi-key manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    /// Key on `src` only.
    Src,
    /// Key on `dst` only.
    Dst,
    /// Key on both `src` and `dst` independently (two parallel managers).
    #[serde(rename = "src+dst")]
    SrcDst,
}

impl std::str::FromStr for KeyMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "src" => Ok(Self::Src),
            "dst" => Ok(Self::Dst),
            "src+dst" => Ok(Self::SrcDst),
            other => Err(Error::InvalidKeyMode(other.to_string())),
        }
    }
}

/// Fan-out estimator backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FanoutMode {
    /// Linear-counting bitmap estimator (§4.2.1).
    Bitmap,
    /// HyperLogLog-lite estimator (§4.2.2).
    HllLite,
}

/// Score normalization mode. Only `P99` is fully specified by `spec.md`
/// §4.4; `Max` and `Zscore` are declared configuration surface but their
/// exact behavior is left undefined ("implementers MAY accept the other
/// modes but this spec does not define them"). This crate treats `Max` as
/// normalizing against the per-epoch maximum and treats `Zscore` identically
/// to `P99` rather than inventing undefined semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormMode {
    /// 99th-percentile normalization (the specified default).
    P99,
    /// Normalize against the per-epoch maximum.
    Max,
    /// Not specified by `spec.md`; currently behaves like `P99`.
    Zscore,
}

/// Queue mapping strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueMapping {
    /// Stateless sigmoid mapping (§4.5).
    Sigmoid,
    /// Learned per-epoch quantile thresholds (§4.5).
    Quantile,
}

/// Top-k heavy-hitter filter configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TopKConfig {
    /// Number of displacement-sketch stages.
    pub stages: usize,
    /// Buckets per stage (and size of the auxiliary row).
    pub buckets_per_stage: usize,
    /// Epoch length in milliseconds.
    pub epoch_ms: u64,
    /// Minimum byte count for a bucket to be reported as heavy.
    pub heavy_threshold_bytes: u64,
}

impl Default for TopKConfig {
    fn default() -> Self {
        Self {
            stages: 8,
            buckets_per_stage: 2048,
            epoch_ms: 1000,
            heavy_threshold_bytes: 0,
        }
    }
}

/// Fan-out estimator configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FanoutConfig {
    /// Estimator backend.
    pub mode: FanoutMode,
    /// Bitmap width in bits (`bitmap` mode).
    pub bitmap_bits: usize,
    /// Register count exponent (`hll-lite` mode): `m = 2^p`.
    pub hll_p: u8,
    /// Bits per HLL-lite register.
    pub hll_reg_bits: u8,
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            mode: FanoutMode::Bitmap,
            bitmap_bits: 256,
            hll_p: 6,
            hll_reg_bits: 6,
        }
    }
}

/// Scoring weights and normalization configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreConfig {
    /// Weight on normalized rate.
    pub alpha: f64,
    /// Weight on normalized fan-out.
    pub beta: f64,
    /// Weight on normalized persistence.
    pub gamma: f64,
    /// Maximum persistence count.
    pub persist_k: u32,
    /// Normalization strategy.
    pub norm_mode: NormMode,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            alpha: 0.6,
            beta: 0.3,
            gamma: 0.1,
            persist_k: 3,
            norm_mode: NormMode::P99,
        }
    }
}

/// Mitigation queue mapper configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Number of mitigation queues.
    pub num_queues: usize,
    /// Mapping strategy.
    pub mapping: QueueMapping,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            num_queues: 4,
            mapping: QueueMapping::Sigmoid,
        }
    }
}

/// Epoch manager configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EpochConfig {
    /// Epoch length in milliseconds (kept in sync with `TopKConfig::epoch_ms`).
    pub epoch_ms: u64,
    /// Maximum persistence count.
    pub persist_k: u32,
}

impl Default for EpochConfig {
    fn default() -> Self {
        Self {
            epoch_ms: 1000,
            persist_k: 3,
        }
    }
}

/// Top-level configuration composed of every subsystem's settings, plus
/// `key_mode` for the multi-key manager.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Config {
    /// Top-k filter settings.
    pub topk: TopKConfig,
    /// Fan-out estimator settings.
    pub fanout: FanoutConfig,
    /// Scoring settings.
    pub score: ScoreConfig,
    /// Queue mapper settings.
    pub queue: QueueConfig,
    /// Epoch manager settings.
    pub epoch: EpochConfig,
    /// Key selection mode for the multi-key manager.
    pub key_mode: KeyMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            topk: TopKConfig::default(),
            fanout: FanoutConfig::default(),
            score: ScoreConfig::default(),
            queue: QueueConfig::default(),
            epoch: EpochConfig::default(),
            key_mode: KeyMode::SrcDst,
        }
    }
}

/// Load configuration from a TOML file.
pub fn load_config(path: &str) -> Result<Config> {
    let config_str = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}

/// Load configuration from a file path, falling back to defaults on any
/// error (missing file, parse failure) — logged, not propagated, matching
/// the teacher's `load_config_or_default`.
pub fn load_config_or_default(path: Option<&str>) -> Config {
    match path {
        Some(path) => match load_config(path) {
            Ok(config) => {
                tracing::info!("loaded configuration from: {}", path);
                config
            }
            Err(e) => {
                tracing::warn!("failed to load config from {}: {}. using defaults.", path, e);
                Config::default()
            }
        },
        None => {
            tracing::info!("no config file specified, using defaults");
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let cfg = Config::default();
        assert_eq!(cfg.topk.stages, 8);
        assert_eq!(cfg.topk.buckets_per_stage, 2048);
        assert_eq!(cfg.topk.epoch_ms, 1000);
        assert_eq!(cfg.topk.heavy_threshold_bytes, 0);
        assert_eq!(cfg.fanout.bitmap_bits, 256);
        assert_eq!(cfg.fanout.hll_p, 6);
        assert_eq!(cfg.fanout.hll_reg_bits, 6);
        assert_eq!(cfg.score.alpha, 0.6);
        assert_eq!(cfg.score.beta, 0.3);
        assert_eq!(cfg.score.gamma, 0.1);
        assert_eq!(cfg.score.persist_k, 3);
        assert_eq!(cfg.queue.num_queues, 4);
        assert_eq!(cfg.key_mode, KeyMode::SrcDst);
    }

    #[test]
    fn key_mode_parses() {
        assert_eq!("src".parse::<KeyMode>().unwrap(), KeyMode::Src);
        assert_eq!("dst".parse::<KeyMode>().unwrap(), KeyMode::Dst);
        assert_eq!("src+dst".parse::<KeyMode>().unwrap(), KeyMode::SrcDst);
        assert!("bogus".parse::<KeyMode>().is_err());
    }

    #[test]
    fn round_trips_through_toml() {
        let cfg = Config::default();
        let serialized = toml::to_string(&cfg).expect("serialize");
        let parsed: Config = toml::from_str(&serialized).expect("parse");
        assert_eq!(parsed.topk.stages, cfg.topk.stages);
        assert_eq!(parsed.key_mode, cfg.key_mode);
    }
}
