//! Logging infrastructure: log relay sinks.
//!
//! - [`TracingLogRelay`] mirrors relayed entries as `tracing` events
//! - [`JsonlLogRelay`] appends relayed entries to a JSONL file

mod jsonl_relay;
mod tracing_relay;

pub use jsonl_relay::JsonlLogRelay;
pub use tracing_relay::TracingLogRelay;
