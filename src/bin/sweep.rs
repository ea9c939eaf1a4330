//! Sweeps bots x rate x decoys to show rate-only separability collapse and
//! multi-signature recovery, mirroring
//! `examples/original_source/experiments/sweep_rate_collapse.py`.

use clap::Parser;
use serde::Serialize;

use ms_satshield::core::config::{
    EpochConfig, FanoutConfig, FanoutMode, KeyMode, QueueConfig, QueueMapping, ScoreConfig,
    TopKConfig,
};
use ms_satshield::eval::precision_recall_f1;
use ms_satshield::multikey::{MultiEpochResult, MultiKeyEpochManager};
use ms_satshield::sim::{
    ExperimentConfig, ExperimentRunner, SyntheticAttack, SyntheticAttackConfig, SyntheticBenign,
    SyntheticBenignConfig, TrafficSource,
};

#[derive(Parser)]
#[command(name = "ms-satshield-sweep", about = "Rate-collapse separability sweep")]
struct Args {
    #[arg(long, default_value = "100,500,2000,10000")]
    bots: String,
    #[arg(long, default_value = "100,20,5,1")]
    rates: String,
    #[arg(long, default_value = "1,10,100,1000")]
    decoys: String,
    #[arg(long, default_value_t = 1000)]
    epoch_ms: u64,
    #[arg(long, default_value_t = 5000)]
    duration_ms: u64,
    #[arg(long, default_value_t = 5000)]
    benign_flows: usize,
    #[arg(long, default_value_t = 4.5)]
    benign_mu: f64,
    #[arg(long, default_value_t = 1.0)]
    benign_sigma: f64,
    #[arg(long, default_value_t = 256)]
    bitmap_bits: usize,
    #[arg(long, default_value_t = 0.6)]
    alpha: f64,
    #[arg(long, default_value_t = 0.3)]
    beta: f64,
    #[arg(long, default_value_t = 0.1)]
    gamma: f64,
    #[arg(long, default_value_t = 3)]
    persist_k: u32,
    #[arg(long, default_value_t = 4)]
    queues: usize,
    #[arg(long)]
    decoy_sample: Option<u64>,
    #[arg(long, default_value_t = 1)]
    warmup_epochs: usize,
    #[arg(long, default_value = "sweep_results.csv")]
    output: String,
}

fn parse_list<T: std::str::FromStr>(values: &str) -> Vec<T> {
    values
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect()
}

#[derive(Debug, Serialize)]
struct SweepRow {
    bots: u64,
    rate_mbps: f64,
    decoys: u64,
    rate_only_src_f1: f64,
    multi_src_f1: f64,
    rate_only_dst_f1: f64,
    multi_dst_f1: f64,
}

struct EpochMetrics {
    rate_only_src: (f64, f64, f64),
    multi_src: (f64, f64, f64),
    rate_only_dst: (f64, f64, f64),
    multi_dst: (f64, f64, f64),
}

fn epoch_metrics(
    results: &[MultiEpochResult],
    truth_src: &[u64],
    truth_dst: &[u64],
    num_queues: usize,
    warmup_epochs: usize,
) -> EpochMetrics {
    let mut rate_only_src = Vec::new();
    let mut rate_only_dst = Vec::new();
    let mut multi_src = Vec::new();
    let mut multi_dst = Vec::new();

    for epoch in results.iter().skip(warmup_epochs) {
        if let Some(src) = epoch.results.get("src") {
            let src_keys: Vec<u64> = src.heavy_keys.iter().map(|r| r.key).collect();
            rate_only_src.push(precision_recall_f1(src_keys, truth_src.iter().copied()));
            let multi_keys: Vec<u64> = src
                .queue_map
                .iter()
                .filter(|&(_, &q)| q == num_queues - 1)
                .map(|(&k, _)| k)
                .collect();
            multi_src.push(precision_recall_f1(multi_keys, truth_src.iter().copied()));
        }
        if let Some(dst) = epoch.results.get("dst") {
            let dst_keys: Vec<u64> = dst.heavy_keys.iter().map(|r| r.key).collect();
            rate_only_dst.push(precision_recall_f1(dst_keys, truth_dst.iter().copied()));
            let multi_keys: Vec<u64> = dst
                .queue_map
                .iter()
                .filter(|&(_, &q)| q == num_queues - 1)
                .map(|(&k, _)| k)
                .collect();
            multi_dst.push(precision_recall_f1(multi_keys, truth_dst.iter().copied()));
        }
    }

    let avg = |values: &[(f64, f64, f64)]| -> (f64, f64, f64) {
        if values.is_empty() {
            return (0.0, 0.0, 0.0);
        }
        let n = values.len() as f64;
        let p = values.iter().map(|v| v.0).sum::<f64>() / n;
        let r = values.iter().map(|v| v.1).sum::<f64>() / n;
        let f = values.iter().map(|v| v.2).sum::<f64>() / n;
        (p, r, f)
    };

    EpochMetrics {
        rate_only_src: avg(&rate_only_src),
        multi_src: avg(&multi_src),
        rate_only_dst: avg(&rate_only_dst),
        multi_dst: avg(&multi_dst),
    }
}

fn run_sweep(args: &Args) -> Vec<SweepRow> {
    let bots_list: Vec<u64> = parse_list(&args.bots);
    let rates_list: Vec<f64> = parse_list(&args.rates);
    let decoys_list: Vec<u64> = parse_list(&args.decoys);

    let topk_cfg = TopKConfig {
        epoch_ms: args.epoch_ms,
        ..TopKConfig::default()
    };
    let fanout_cfg = FanoutConfig {
        mode: FanoutMode::Bitmap,
        bitmap_bits: args.bitmap_bits,
        ..FanoutConfig::default()
    };
    let score_cfg = ScoreConfig {
        alpha: args.alpha,
        beta: args.beta,
        gamma: args.gamma,
        persist_k: args.persist_k,
        ..ScoreConfig::default()
    };
    let queue_cfg = QueueConfig {
        num_queues: args.queues,
        mapping: QueueMapping::Sigmoid,
    };
    let epoch_cfg = EpochConfig {
        epoch_ms: args.epoch_ms,
        persist_k: args.persist_k,
    };

    let benign_cfg = SyntheticBenignConfig {
        flows: args.benign_flows,
        rate_kbps_mu: args.benign_mu,
        rate_kbps_sigma: args.benign_sigma,
        duration_ms: args.duration_ms,
        epoch_ms: args.epoch_ms,
        seed: 1,
    };

    let mut rows = Vec::new();
    for &b in &bots_list {
        for &r in &rates_list {
            for &m in &decoys_list {
                let config = ms_satshield::core::Config {
                    topk: topk_cfg,
                    fanout: fanout_cfg,
                    score: score_cfg,
                    queue: queue_cfg,
                    epoch: epoch_cfg,
                    key_mode: KeyMode::SrcDst,
                };
                let detector = MultiKeyEpochManager::new(&config);
                let mut runner =
                    ExperimentRunner::new(detector, ExperimentConfig { epoch_ms: args.epoch_ms });

                let attack_cfg = SyntheticAttackConfig {
                    bots: b,
                    rate_mbps: r,
                    decoys: m,
                    attack_start_ms: 0,
                    attack_end_ms: args.duration_ms,
                    epoch_ms: args.epoch_ms,
                    seed: 7,
                    decoy_sample: args.decoy_sample,
                };
                let attack = SyntheticAttack::new(attack_cfg);
                let benign = SyntheticBenign::new(benign_cfg);
                let attack_srcs = attack.attack_srcs.clone();
                let attack_dsts = attack.attack_dsts.clone();

                let sources: Vec<Box<dyn TrafficSource>> =
                    vec![Box::new(benign), Box::new(attack)];
                let results = runner.run(&sources);

                let metrics = epoch_metrics(
                    &results,
                    &attack_srcs,
                    &attack_dsts,
                    queue_cfg.num_queues,
                    args.warmup_epochs,
                );

                rows.push(SweepRow {
                    bots: b,
                    rate_mbps: r,
                    decoys: m,
                    rate_only_src_f1: metrics.rate_only_src.2,
                    multi_src_f1: metrics.multi_src.2,
                    rate_only_dst_f1: metrics.rate_only_dst.2,
                    multi_dst_f1: metrics.multi_dst.2,
                });
            }
        }
    }
    rows
}

fn write_csv(path: &str, rows: &[SweepRow]) -> ms_satshield::Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> ms_satshield::Result<()> {
    ms_satshield::init_tracing();
    let args = Args::parse();
    let rows = run_sweep(&args);
    write_csv(&args.output, &rows)?;
    tracing::info!("wrote {} row(s) to {}", rows.len(), args.output);
    Ok(())
}
