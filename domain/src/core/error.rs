//! Domain error types

use thiserror::Error;

/// Domain-level validation errors.
///
/// Raised by the constructors of value objects when user input cannot form a
/// well-typed request. The dispatcher turns these into validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Organization id cannot be empty")]
    EmptyOrgId,

    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Invalid login URL: {0}")]
    InvalidLoginUrl(String),

    #[error("{0} statement cannot be empty")]
    EmptyStatement(&'static str),

    #[error("Invalid object type name: {0:?}")]
    InvalidObjectName(String),
}
