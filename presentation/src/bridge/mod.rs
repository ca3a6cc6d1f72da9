//! JSON-lines bridge between an interface process and the dispatcher.
//!
//! - [`protocol`]: inbound decoding and outbound frames
//! - [`BridgeServer`]: reads frames, dispatches each on its own task, and
//!   serializes every outbound frame through a single writer
//! - [`BridgeLogRelay`]: forwards log entries as `log_message` frames

pub mod protocol;
mod relay;
mod server;

pub use protocol::{BridgeError, BridgeMessage, Inbound, OutboundMessage, Rejected};
pub use relay::BridgeLogRelay;
pub use server::BridgeServer;
