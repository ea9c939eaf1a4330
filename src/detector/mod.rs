//! Top-k heavy-hitter filter with auxiliary tracker (`spec.md` §4.1).

mod topk;

pub use topk::{AuxEntry, FlowDetector, FlowRecord, TopKFilter};
