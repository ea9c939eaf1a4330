//! Topology and routing interfaces carried over from the collaborator
//! surface; topology/routing modeling is out of scope for this crate (no
//! implementation is provided, only the trait declarations).

/// A directed link between two nodes with a capacity bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    /// Upstream node.
    pub src: u64,
    /// Downstream node.
    pub dst: u64,
    /// Link capacity in gigabits/sec.
    pub capacity_gbps: f64,
}

/// A routed path through zero or more links.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Nodes visited, in order.
    pub nodes: Vec<u64>,
    /// Links traversed, in order.
    pub links: Vec<Link>,
}

/// Resolves paths between a source and destination at a point in time.
pub trait RoutingModel {
    /// All candidate paths from `src` to `dst` at time `ts_ms`.
    fn paths(&self, src: u64, dst: u64, ts_ms: f64) -> Vec<Path>;
}

/// Reports the link topology at a point in time.
pub trait TopologyProvider {
    /// The set of links present at time `ts_ms`.
    fn snapshot(&self, ts_ms: f64) -> Vec<Link>;
}
