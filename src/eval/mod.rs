//! Evaluation-only metrics consumed by the sweep CLI.

pub mod metrics;

pub use metrics::{average_relative_error, precision_recall_f1, reaction_time, throughput_drop};
