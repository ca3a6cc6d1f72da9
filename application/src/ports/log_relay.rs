//! Port for the diagnostic log relay.
//!
//! Defines the [`LogRelay`] trait used to push [`LogEntry`] values to
//! whichever surface displays them (the bridge's `log_message` frames, a
//! console, `tracing`).
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! developer diagnostics, while the relay carries the user-facing log stream
//! addressed to the requesting surface.

use eforce_domain::LogEntry;
use std::sync::Arc;

/// One-way push of log entries.
///
/// `relay` is synchronous and non-fallible; implementations drop entries they
/// cannot deliver. Entries from one caller must arrive in emission order.
pub trait LogRelay: Send + Sync {
    fn relay(&self, entry: LogEntry);
}

/// No-op implementation for tests and when the relay is disabled.
pub struct NoLogRelay;

impl LogRelay for NoLogRelay {
    fn relay(&self, _entry: LogEntry) {}
}

/// A relay that forwards every entry to each inner relay, in order.
pub struct FanoutLogRelay {
    delegates: Vec<Arc<dyn LogRelay>>,
}

impl FanoutLogRelay {
    pub fn new(delegates: Vec<Arc<dyn LogRelay>>) -> Self {
        Self { delegates }
    }
}

impl LogRelay for FanoutLogRelay {
    fn relay(&self, entry: LogEntry) {
        if let Some((last, rest)) = self.delegates.split_last() {
            for delegate in rest {
                delegate.relay(entry.clone());
            }
            last.relay(entry);
        }
    }
}
