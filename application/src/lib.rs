//! Application layer for eforce
//!
//! This crate contains the dispatch use case, the connection registry, port
//! definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod registry;
pub mod use_cases;

// Re-export commonly used types
pub use config::DispatchPolicy;
pub use ports::{
    crm_gateway::{CrmGateway, CrmSession, GatewayError},
    log_relay::{FanoutLogRelay, LogRelay, NoLogRelay},
};
pub use registry::{ConnectionRegistry, SessionNotFound};
pub use use_cases::dispatch_operation::{
    DispatchError, DispatchOperationUseCase, DispatchResponse,
};
