//! Skeleton entry point; wiring deferred (see original's own TODO).
//!
//! CLI entry for running MS-SatShield experiments (skeleton), mirroring
//! `examples/original_source/experiments/run_experiment.py`.

use clap::Parser;

use ms_satshield::core::config::{EpochConfig, FanoutConfig, QueueConfig, ScoreConfig, TopKConfig};
use ms_satshield::epoch::EpochManager;
use ms_satshield::sim::{ExperimentConfig, ExperimentRunner, TrafficSource};

#[derive(Parser)]
#[command(name = "ms-satshield-run", about = "Run an MS-SatShield experiment")]
struct Args {
    /// Epoch length in milliseconds.
    #[arg(long, default_value_t = 1000)]
    epoch_ms: u64,
}

fn main() {
    ms_satshield::init_tracing();
    let args = Args::parse();

    let topk_cfg = TopKConfig {
        epoch_ms: args.epoch_ms,
        ..TopKConfig::default()
    };
    let fanout_cfg = FanoutConfig::default();
    let score_cfg = ScoreConfig::default();
    let queue_cfg = QueueConfig::default();
    let epoch_cfg = EpochConfig {
        epoch_ms: args.epoch_ms,
        ..EpochConfig::default()
    };

    let detector = EpochManager::new(&topk_cfg, &fanout_cfg, &score_cfg, &queue_cfg, &epoch_cfg);
    let mut runner = ExperimentRunner::new(detector, ExperimentConfig { epoch_ms: args.epoch_ms });

    // TODO: wire traffic sources and topology routing.
    let sources: Vec<Box<dyn TrafficSource>> = Vec::new();
    let results = runner.run(&sources);
    tracing::info!("ran {} epoch(s)", results.len());
}
