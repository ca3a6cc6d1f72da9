//! Dispatch policy: per-request rules for the operation dispatcher.
//!
//! [`DispatchPolicy`] groups the static parameters that control
//! [`DispatchOperationUseCase`](crate::use_cases::dispatch_operation::DispatchOperationUseCase).
//! These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Dispatcher behavior knobs.
///
/// | Field | Default | Effect |
/// |-------|---------|--------|
/// | `request_timeout` | 120 s | upper bound on each remote call |
/// | `evict_on_logout` | `true` | drop the registry entry after a successful logout |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchPolicy {
    /// Timeout applied to every remote call. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
    /// Remove the session from the registry once the remote logout succeeds.
    pub evict_on_logout: bool,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(120)),
            evict_on_logout: true,
        }
    }
}

impl DispatchPolicy {
    // ==================== Builder Methods ====================

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_evict_on_logout(mut self, evict: bool) -> Self {
        self.evict_on_logout = evict;
        self
    }
}
