//! CRM Gateway port
//!
//! Defines how the application layer talks to the remote CRM platform.
//! Every remote call resolves to a single `Result`; adapters never panic or
//! leak transport errors past this boundary.

use async_trait::async_trait;
use eforce_domain::{
    Credentials, LimitInfo, QueryResult, SObjectDescribe, SObjectName, SearchResult, Session,
    SoqlQuery, SoslSearch,
};
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by a gateway or session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Error reported by the remote API itself (REST error body or SOAP fault).
    #[error("{code}: {message}")]
    Api { code: String, message: String },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Request timed out")]
    Timeout,
}

impl GatewayError {
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Stable error code placed in failure envelopes.
    pub fn error_code(&self) -> &str {
        match self {
            GatewayError::Api { code, .. } => code,
            GatewayError::ConnectionError(_) => "CONNECTION_ERROR",
            GatewayError::UnexpectedResponse(_) => "UNEXPECTED_RESPONSE",
            GatewayError::Timeout => "REQUEST_TIMEOUT",
        }
    }

    /// Human-readable message without the code prefix.
    pub fn detail_message(&self) -> String {
        match self {
            GatewayError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Gateway for establishing authenticated sessions.
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait CrmGateway: Send + Sync {
    /// Authenticate and open a session against the organization the
    /// credentials belong to.
    async fn login(&self, credentials: &Credentials) -> Result<Arc<dyn CrmSession>, GatewayError>;
}

/// An authenticated connection to one organization.
#[async_trait]
pub trait CrmSession: Send + Sync {
    /// Identity of this session (org, user, instance, token).
    fn session(&self) -> &Session;

    /// Limit usage reported by the most recent remote call, if any.
    fn limit_info(&self) -> Option<LimitInfo>;

    /// Invalidate the session on the remote side.
    async fn logout(&self) -> Result<(), GatewayError>;

    async fn query(&self, soql: &SoqlQuery) -> Result<QueryResult, GatewayError>;

    async fn search(&self, sosl: &SoslSearch) -> Result<SearchResult, GatewayError>;

    async fn describe(&self, sobject: &SObjectName) -> Result<SObjectDescribe, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_keeps_remote_code() {
        let error = GatewayError::api("INVALID_LOGIN", "Invalid username or password");
        assert_eq!(error.error_code(), "INVALID_LOGIN");
        assert_eq!(error.detail_message(), "Invalid username or password");
        assert_eq!(
            error.to_string(),
            "INVALID_LOGIN: Invalid username or password"
        );
    }

    #[test]
    fn test_local_errors_have_fixed_codes() {
        assert_eq!(GatewayError::Timeout.error_code(), "REQUEST_TIMEOUT");
        assert_eq!(
            GatewayError::ConnectionError("refused".into()).error_code(),
            "CONNECTION_ERROR"
        );
        assert_eq!(
            GatewayError::UnexpectedResponse("html".into()).detail_message(),
            "Unexpected response: html"
        );
    }
}
