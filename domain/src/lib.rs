//! Domain layer for eforce
//!
//! This crate contains the entities and value objects of the dispatch core.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Session**: an authenticated connection to one remote organization,
//!   keyed by [`OrgId`]
//! - **Operation request**: a typed request for login, logout, query, search,
//!   describe or organization lookup
//! - **Response envelope**: the uniform `{status, message, response, limitInfo}`
//!   outcome of every request
//! - **Log entry**: a `(sender, channel, message)` diagnostic line

pub mod config;
pub mod core;
pub mod envelope;
pub mod log;
pub mod operation;
pub mod org;
pub mod record;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::error::DomainError;
pub use envelope::{ApiUsage, ErrorDetail, LimitInfo, ResponseEnvelope};
pub use log::{LogChannel, LogEntry, SenderId};
pub use operation::{OperationKind, OperationRequest, ResponseChannel, SoqlQuery, SoslSearch};
pub use org::{AccessToken, Credentials, DEFAULT_LOGIN_URL, OrgId, Session, UserInfo};
pub use record::{
    FieldDescribe, ORGANIZATION_SOBJECT, QueryResult, RecordSet, SObjectDescribe, SObjectName,
    SearchResult, TotalSize, organization_query, select_all_query,
};
