//! Flow and packet structures shared by the traffic generators.

/// A directed flow identified by its source and destination addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlowKey {
    /// Source address.
    pub src: u64,
    /// Destination address.
    pub dst: u64,
}

/// A single simulated packet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Packet {
    /// Timestamp in milliseconds since the start of the experiment.
    pub ts_ms: f64,
    /// Source address.
    pub src: u64,
    /// Destination address.
    pub dst: u64,
    /// Packet size in bytes.
    pub size: u64,
    /// The flow this packet belongs to.
    pub flow: FlowKey,
}
