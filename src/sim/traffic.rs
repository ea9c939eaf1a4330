//! Traffic generation interfaces, including out-of-scope stubs carried over
//! from the collaborator surface (see module docs on [`crate::sim`]).

use crate::sim::flow::Packet;

/// Anything that can produce a bounded sequence of packets.
pub trait TrafficSource {
    /// Materialize every packet this source produces.
    fn packets(&self) -> Vec<Packet>;
}

/// Parameters shared by the LFA attack family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackParams {
    /// Number of attacking bots.
    pub bots: u64,
    /// Per-bot send rate in megabits/sec.
    pub rate_mbps: f64,
    /// Number of decoy destinations.
    pub decoys: u64,
    /// Attack start time in milliseconds.
    pub attack_start_ms: f64,
    /// Attack end time in milliseconds.
    pub attack_end_ms: f64,
}

/// Base type for LFA (Link Flooding Attack) traffic generators.
///
/// Out of scope: no concrete LFA variant is implemented by this crate. See
/// [`crate::sim::lfa_attack`].
pub struct LfaBase {
    /// Shared attack parameters.
    pub params: AttackParams,
}

impl LfaBase {
    /// Construct a base with the given attack parameters.
    pub fn new(params: AttackParams) -> Self {
        Self { params }
    }
}

impl TrafficSource for LfaBase {
    fn packets(&self) -> Vec<Packet> {
        unimplemented!("LFA base traffic generation is out of scope")
    }
}

/// Replays a captured benign trace from disk.
///
/// Out of scope per the detector's non-goals ("no trace replay").
pub struct BenignReplay {
    /// Path to the trace file.
    pub trace_path: String,
}

impl BenignReplay {
    /// Construct a replay source for the trace at `trace_path`.
    pub fn new(trace_path: impl Into<String>) -> Self {
        Self {
            trace_path: trace_path.into(),
        }
    }
}

impl TrafficSource for BenignReplay {
    fn packets(&self) -> Vec<Packet> {
        unimplemented!("benign trace replay is out of scope")
    }
}
