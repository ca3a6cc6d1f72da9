//! Connection registry: the owned map of live sessions.

mod connection_registry;

pub use connection_registry::{ConnectionRegistry, SessionNotFound};
