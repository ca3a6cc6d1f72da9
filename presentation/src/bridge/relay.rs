use super::protocol::OutboundMessage;
use eforce_application::LogRelay;
use eforce_domain::LogEntry;
use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

/// Log relay that forwards entries to the bridge as `log_message` frames.
///
/// Shares the outbound queue with responses, so a request's log entry is
/// written before its envelope.
#[derive(Clone)]
pub struct BridgeLogRelay {
    outbound: UnboundedSender<OutboundMessage>,
}

impl BridgeLogRelay {
    pub fn new(outbound: UnboundedSender<OutboundMessage>) -> Self {
        Self { outbound }
    }
}

impl LogRelay for BridgeLogRelay {
    fn relay(&self, entry: LogEntry) {
        if self.outbound.send(OutboundMessage::log(&entry)).is_err() {
            trace!("Bridge closed; dropped log entry from {}", entry.sender);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eforce_domain::SenderId;
    use tokio::sync::mpsc;

    #[test]
    fn test_forwards_as_log_message() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let relay = BridgeLogRelay::new(tx);

        relay.relay(LogEntry::info(SenderId::new("explorer"), "Login Successful"));

        let frame = rx.try_recv().unwrap();
        assert_eq!(frame.name, "log_message");
        assert_eq!(frame.payload["sender"], "explorer");
        assert_eq!(frame.payload["message"], "Login Successful");
    }

    #[test]
    fn test_closed_bridge_is_ignored() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        BridgeLogRelay::new(tx).relay(LogEntry::error(SenderId::default(), "late"));
    }
}
