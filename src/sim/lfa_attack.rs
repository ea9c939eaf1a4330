//! LFA attack variants aligned with degradation settings A/B/C. Not part of
//! the core contract (Design Note §9): these remain explicit stubs so a
//! future implementer doesn't silently wire an unimplemented variant into
//! the default sweep path.

use crate::sim::flow::Packet;
use crate::sim::traffic::{AttackParams, TrafficSource};

/// Pulse timing for the on/off attack variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseParams {
    /// Pulse period in milliseconds.
    pub period_ms: f64,
    /// Duration of the "on" portion of each pulse, in milliseconds.
    pub on_ms: f64,
}

/// Many bots, lower per-bot rate.
pub struct LfaDegenerationA {
    /// Shared attack parameters.
    pub params: AttackParams,
}

impl TrafficSource for LfaDegenerationA {
    fn packets(&self) -> Vec<Packet> {
        unimplemented!("LFA degeneration A is out of scope")
    }
}

/// Decoy fan-out expansion.
pub struct LfaDegenerationB {
    /// Shared attack parameters.
    pub params: AttackParams,
}

impl TrafficSource for LfaDegenerationB {
    fn packets(&self) -> Vec<Packet> {
        unimplemented!("LFA degeneration B is out of scope")
    }
}

/// Pulse/on-off attacks for persistence evaluation.
pub struct LfaDegenerationC {
    /// Shared attack parameters.
    pub params: AttackParams,
    /// Pulse timing.
    pub pulse: PulseParams,
}

impl TrafficSource for LfaDegenerationC {
    fn packets(&self) -> Vec<Packet> {
        unimplemented!("LFA degeneration C is out of scope")
    }
}
