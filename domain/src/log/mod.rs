//! Diagnostic log entries relayed to the console surface.

mod entry;

pub use entry::{LogChannel, LogEntry, SenderId};
