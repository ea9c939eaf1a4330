//! Experiment orchestration: k-way-merges traffic sources by timestamp and
//! drives a detector across epoch boundaries (`spec.md` §6, grounded on
//! `examples/original_source/src/sim/runner.py`).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::epoch::{EpochManager, EpochResult};
use crate::multikey::{MultiEpochResult, MultiKeyEpochManager};
use crate::sim::flow::Packet;
use crate::sim::traffic::TrafficSource;

/// Anything that can be driven packet-by-packet and closed out epoch-by-epoch.
///
/// Bridges [`EpochManager`] and [`MultiKeyEpochManager`] behind one runner so
/// [`ExperimentRunner`] doesn't need to pick sides.
pub trait EpochDriven {
    /// Per-epoch result type this driver produces.
    type Output;

    /// Feed one packet.
    fn on_packet(&mut self, src: u64, dst: u64, size: u64);

    /// Close the current epoch and return its result.
    fn end_epoch(&mut self) -> Self::Output;
}

impl EpochDriven for EpochManager {
    type Output = EpochResult;

    fn on_packet(&mut self, src: u64, dst: u64, size: u64) {
        EpochManager::on_packet(self, src, dst, size)
    }

    fn end_epoch(&mut self) -> EpochResult {
        EpochManager::end_epoch(self)
    }
}

impl EpochDriven for MultiKeyEpochManager {
    type Output = MultiEpochResult;

    fn on_packet(&mut self, src: u64, dst: u64, size: u64) {
        MultiKeyEpochManager::on_packet(self, src, dst, size)
    }

    fn end_epoch(&mut self) -> MultiEpochResult {
        MultiKeyEpochManager::end_epoch(self)
    }
}

/// Configuration for [`ExperimentRunner`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExperimentConfig {
    /// Epoch length in milliseconds.
    pub epoch_ms: u64,
}

/// Drives a detector through a merged packet stream, closing out an epoch
/// every time the stream crosses an `epoch_ms` boundary.
pub struct ExperimentRunner<D: EpochDriven> {
    detector: D,
    config: ExperimentConfig,
}

impl<D: EpochDriven> ExperimentRunner<D> {
    /// Construct a runner around `detector`.
    pub fn new(detector: D, config: ExperimentConfig) -> Self {
        Self { detector, config }
    }

    /// Run every source's packets, merged by timestamp, through the
    /// detector, returning one result per completed epoch.
    pub fn run(&mut self, sources: &[Box<dyn TrafficSource>]) -> Vec<D::Output> {
        let mut events = Vec::new();
        let mut current_epoch_ms = 0.0f64;
        for packet in merge_sources(sources) {
            while packet.ts_ms >= current_epoch_ms + self.config.epoch_ms as f64 {
                events.push(self.detector.end_epoch());
                current_epoch_ms += self.config.epoch_ms as f64;
            }
            self.detector.on_packet(packet.src, packet.dst, packet.size);
        }
        events.push(self.detector.end_epoch());
        events
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct HeapEntry {
    ts_ms: f64,
    source_idx: usize,
    packet_idx: usize,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap on `ts_ms`, tiebroken by source index.
        other
            .ts_ms
            .partial_cmp(&self.ts_ms)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.source_idx.cmp(&self.source_idx))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// K-way merge of every source's packets by `ts_ms`, with source index as a
/// secondary tiebreaker, via a min-heap.
fn merge_sources(sources: &[Box<dyn TrafficSource>]) -> Vec<Packet> {
    let packet_lists: Vec<Vec<Packet>> = sources.iter().map(|s| s.packets()).collect();
    let mut heap = BinaryHeap::new();
    for (source_idx, packets) in packet_lists.iter().enumerate() {
        if let Some(first) = packets.first() {
            heap.push(HeapEntry {
                ts_ms: first.ts_ms,
                source_idx,
                packet_idx: 0,
            });
        }
    }

    let mut out = Vec::new();
    while let Some(entry) = heap.pop() {
        out.push(packet_lists[entry.source_idx][entry.packet_idx]);
        let next_idx = entry.packet_idx + 1;
        if let Some(next) = packet_lists[entry.source_idx].get(next_idx) {
            heap.push(HeapEntry {
                ts_ms: next.ts_ms,
                source_idx: entry.source_idx,
                packet_idx: next_idx,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::flow::FlowKey;

    struct FixedSource {
        packets: Vec<Packet>,
    }

    impl TrafficSource for FixedSource {
        fn packets(&self) -> Vec<Packet> {
            self.packets.clone()
        }
    }

    fn pkt(ts_ms: f64, src: u64) -> Packet {
        Packet {
            ts_ms,
            src,
            dst: 0,
            size: 1,
            flow: FlowKey { src, dst: 0 },
        }
    }

    #[test]
    fn merge_preserves_global_timestamp_order() {
        let a: Box<dyn TrafficSource> = Box::new(FixedSource {
            packets: vec![pkt(0.0, 1), pkt(3.0, 1), pkt(6.0, 1)],
        });
        let b: Box<dyn TrafficSource> = Box::new(FixedSource {
            packets: vec![pkt(1.0, 2), pkt(2.0, 2)],
        });
        let merged = merge_sources(&[a, b]);
        let timestamps: Vec<f64> = merged.iter().map(|p| p.ts_ms).collect();
        let mut sorted = timestamps.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(timestamps, sorted);
        assert_eq!(merged.len(), 5);
    }

    #[test]
    fn equal_timestamps_tiebreak_by_source_index() {
        let a: Box<dyn TrafficSource> = Box::new(FixedSource {
            packets: vec![pkt(5.0, 1)],
        });
        let b: Box<dyn TrafficSource> = Box::new(FixedSource {
            packets: vec![pkt(5.0, 2)],
        });
        let merged = merge_sources(&[a, b]);
        assert_eq!(merged[0].src, 1);
        assert_eq!(merged[1].src, 2);
    }
}
