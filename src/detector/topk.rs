//! Min-displacement top-k sketch with a single auxiliary victim row.
//!
//! Ported from `examples/original_source/src/ms_satshield/detector.py`
//! (`TopKFilter`, `FlowDetector`). The hashing primitive is replaced per
//! `spec.md` §9 with the deterministic mixer in [`crate::hash`].

use crate::core::config::TopKConfig;
use crate::hash::hash_with_seed;

/// A flow's cumulative byte count as tracked by one stage bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowRecord {
    /// Flow key (e.g. a source or destination address).
    pub key: u64,
    /// Cumulative byte count attributed to this bucket.
    pub count: u64,
}

/// An entry in the auxiliary victim row (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuxEntry {
    /// Flow key currently occupying this auxiliary slot.
    pub key: u64,
    /// Running byte count accumulated for `key` while it has held the slot.
    pub r_cnt: u64,
    /// Victim-decay counter; the slot is reassigned once this reaches `<= 0`.
    pub v_cnt: i64,
}

/// `S` stages x `B` buckets min-displacement sketch plus one auxiliary row.
pub struct TopKFilter {
    stages: usize,
    buckets_per_stage: usize,
    heavy_threshold_bytes: u64,
    tables: Vec<Vec<Option<FlowRecord>>>,
    aux: Vec<Option<AuxEntry>>,
}

impl TopKFilter {
    /// Construct an empty filter from the given configuration.
    pub fn new(config: &TopKConfig) -> Self {
        Self {
            stages: config.stages,
            buckets_per_stage: config.buckets_per_stage,
            heavy_threshold_bytes: config.heavy_threshold_bytes,
            tables: (0..config.stages)
                .map(|_| vec![None; config.buckets_per_stage])
                .collect(),
            aux: vec![None; config.buckets_per_stage],
        }
    }

    /// Ingest `size` bytes observed for `key`.
    ///
    /// Visits every stage in order, displacing whichever bucket holds the
    /// smaller count; any record that survives displacement through every
    /// stage is forwarded to the auxiliary row.
    pub fn update(&mut self, key: u64, size: u64) {
        let mut record = FlowRecord { key, count: size };
        for stage in 0..self.stages {
            let idx = (hash_with_seed(key, stage as u64) as usize) % self.buckets_per_stage;
            match &mut self.tables[stage][idx] {
                slot @ None => {
                    *slot = Some(record);
                    return;
                }
                Some(bucket) if bucket.key == record.key => {
                    bucket.count += record.count;
                    return;
                }
                Some(bucket) if bucket.count < record.count => {
                    std::mem::swap(bucket, &mut record);
                }
                Some(_) => {}
            }
        }
        self.aux_update(record);
    }

    fn aux_update(&mut self, record: FlowRecord) {
        let idx = (hash_with_seed(record.key, self.stages as u64) as usize) % self.buckets_per_stage;
        match &mut self.aux[idx] {
            slot @ None => {
                *slot = Some(AuxEntry {
                    key: record.key,
                    r_cnt: record.count,
                    v_cnt: record.count as i64,
                });
            }
            Some(entry) if entry.key == record.key => {
                entry.r_cnt += record.count;
                entry.v_cnt += record.count as i64;
            }
            Some(entry) => {
                entry.v_cnt -= record.count as i64;
                if entry.v_cnt <= 0 {
                    entry.key = record.key;
                    entry.r_cnt = record.count;
                    entry.v_cnt = record.count as i64;
                }
            }
        }
    }

    /// Enumerate all occupied stage buckets with `count >= heavy_threshold_bytes`.
    ///
    /// Duplicate keys across stages are permitted in the returned list —
    /// callers that need a deduplicated view (the epoch manager does) pick
    /// the maximum count per key themselves.
    pub fn snapshot(&self) -> Vec<FlowRecord> {
        self.tables
            .iter()
            .flatten()
            .filter_map(|slot| *slot)
            .filter(|rec| rec.count >= self.heavy_threshold_bytes)
            .collect()
    }

    /// Clear every stage table and the auxiliary row.
    pub fn reset(&mut self) {
        for table in &mut self.tables {
            table.iter_mut().for_each(|slot| *slot = None);
        }
        self.aux.iter_mut().for_each(|slot| *slot = None);
    }
}

/// Wraps [`TopKFilter`] for epoch-based heavy-key reporting.
pub struct FlowDetector {
    filter: TopKFilter,
}

impl FlowDetector {
    /// Construct a detector from the given top-k configuration.
    pub fn new(config: &TopKConfig) -> Self {
        Self {
            filter: TopKFilter::new(config),
        }
    }

    /// Record `size` bytes for `key`.
    pub fn on_packet(&mut self, key: u64, size: u64) {
        self.filter.update(key, size);
    }

    /// Snapshot the heavy set at epoch close.
    pub fn end_epoch(&self) -> Vec<FlowRecord> {
        self.filter.snapshot()
    }

    /// Clear all sketch state.
    pub fn reset(&mut self) {
        self.filter.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(stages: usize, buckets: usize) -> TopKConfig {
        TopKConfig {
            stages,
            buckets_per_stage: buckets,
            epoch_ms: 1000,
            heavy_threshold_bytes: 0,
        }
    }

    #[test]
    fn single_hot_flow_is_heavy() {
        let mut detector = FlowDetector::new(&cfg(8, 2048));
        for _ in 0..1000 {
            detector.on_packet(1, 1000);
        }
        let heavy = detector.end_epoch();
        let total: u64 = heavy.iter().filter(|r| r.key == 1).map(|r| r.count).sum();
        assert_eq!(total, 1_000_000);
    }

    #[test]
    fn heavy_set_bounded_by_s_times_b() {
        let mut detector = FlowDetector::new(&cfg(4, 16));
        for key in 0..10_000u64 {
            detector.on_packet(key, 10);
        }
        let heavy = detector.end_epoch();
        assert!(heavy.len() <= 4 * 16);
    }

    #[test]
    fn snapshot_sum_bounded_by_total_times_stages() {
        let mut detector = FlowDetector::new(&cfg(4, 64));
        let mut total_bytes = 0u64;
        for key in 0..5_000u64 {
            let size = 1 + (key % 37);
            detector.on_packet(key, size);
            total_bytes += size;
        }
        let heavy = detector.end_epoch();
        let sum: u64 = heavy.iter().map(|r| r.count).sum();
        assert!(sum <= total_bytes * 4);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut detector = FlowDetector::new(&cfg(8, 2048));
        for key in 0..100u64 {
            detector.on_packet(key, 1000);
        }
        assert!(!detector.end_epoch().is_empty());
        detector.reset();
        assert!(detector.end_epoch().is_empty());
        detector.reset();
        assert!(detector.end_epoch().is_empty());
    }

    #[test]
    fn zero_size_packet_is_a_noop_accepted_insert() {
        let mut detector = FlowDetector::new(&cfg(8, 2048));
        detector.on_packet(7, 0);
        let heavy = detector.end_epoch();
        assert_eq!(heavy.len(), 1);
        assert_eq!(heavy[0].count, 0);
    }

    #[test]
    fn same_key_accumulates_in_place() {
        let mut filter = TopKFilter::new(&cfg(8, 2048));
        filter.update(9, 100);
        filter.update(9, 50);
        let heavy = filter.snapshot();
        assert_eq!(heavy.len(), 1);
        assert_eq!(heavy[0].count, 150);
    }
}
