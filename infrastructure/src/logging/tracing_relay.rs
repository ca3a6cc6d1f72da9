use eforce_application::LogRelay;
use eforce_domain::LogEntry;
use tracing::{error, info};

/// Log relay that re-emits entries through `tracing`.
///
/// `Error` entries become `error!` events, everything else `info!`, with the
/// sender and channel as fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogRelay;

impl LogRelay for TracingLogRelay {
    fn relay(&self, entry: LogEntry) {
        let LogEntry {
            sender,
            channel,
            message,
        } = entry;
        if channel.is_error() {
            error!(sender = %sender, channel = %channel, "{}", message);
        } else {
            info!(sender = %sender, channel = %channel, "{}", message);
        }
    }
}
