//! MS-SatShield - a multi-signature volumetric-attack detector and mitigator
//! for high-rate packet streams.
//!
//! Combines a min-displacement top-k heavy-hitter filter, per-candidate
//! fan-out cardinality estimation, and epoch-based persistence tracking into
//! a single suspicion score, which a mitigation queue mapper turns into a
//! traffic-shaping decision.
#![warn(missing_docs)]

pub mod core;
pub mod detector;
pub mod epoch;
pub mod eval;
pub mod fanout;
pub mod hash;
pub mod multikey;
pub mod queue;
pub mod scoring;
pub mod sim;

pub use core::{Config, Error, Result};
pub use epoch::{CandidateFeatures, EpochManager, EpochResult};
pub use multikey::{MultiEpochResult, MultiKeyEpochManager};

/// Crate version, as reported by Cargo.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Crate name, as reported by Cargo.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Install the `tracing` subscriber used by the binaries, honoring
/// `RUST_LOG` if set and defaulting to `info` otherwise.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("{} v{}", NAME, VERSION);
}
