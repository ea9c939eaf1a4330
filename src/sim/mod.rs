//! Traffic generation, topology, and experiment orchestration collaborators.
//!
//! None of this module is part of the core detector contract — it exists so
//! the CLI binaries have something runnable. Traffic generation, routing,
//! and trace replay are explicitly out of scope for the detector itself.

pub mod flow;
pub mod lfa_attack;
pub mod runner;
pub mod synthetic;
pub mod topology;
pub mod traffic;

pub use flow::{FlowKey, Packet};
pub use runner::{EpochDriven, ExperimentConfig, ExperimentRunner};
pub use synthetic::{SyntheticAttack, SyntheticAttackConfig, SyntheticBenign, SyntheticBenignConfig};
pub use traffic::{AttackParams, BenignReplay, LfaBase, TrafficSource};
