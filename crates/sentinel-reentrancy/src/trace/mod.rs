mod normalizer;
mod tree;
mod types;

pub use normalizer::{flatten_call_trace, normalize_traces};
pub use tree::{CallRecord, CallSequence};
pub use types::{CallTrace, RawTrace, TraceAction};
