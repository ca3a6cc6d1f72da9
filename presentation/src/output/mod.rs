//! Terminal rendering of envelopes and log entries

pub mod console;
pub mod log_relay;
pub mod table;
