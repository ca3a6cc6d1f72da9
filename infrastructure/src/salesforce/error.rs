//! Error types for the Salesforce adapter

use eforce_application::GatewayError;
use thiserror::Error;

/// Result type alias for Salesforce operations
pub type Result<T> = std::result::Result<T, SalesforceError>;

/// Errors that can occur when talking to the Salesforce APIs
#[derive(Error, Debug)]
pub enum SalesforceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed XML: {0}")]
    Xml(String),

    #[error("SOAP fault {code}: {message}")]
    Fault { code: String, message: String },

    #[error("API error {code}: {message}")]
    Api { code: String, message: String },

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Missing <{0}> in response")]
    MissingElement(&'static str),
}

impl From<SalesforceError> for GatewayError {
    fn from(err: SalesforceError) -> Self {
        match err {
            SalesforceError::Http(e) if e.is_timeout() => GatewayError::Timeout,
            SalesforceError::Http(e) => GatewayError::ConnectionError(e.to_string()),
            SalesforceError::Fault { code, message } | SalesforceError::Api { code, message } => {
                GatewayError::Api { code, message }
            }
            other => GatewayError::UnexpectedResponse(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_keeps_remote_code() {
        let err: GatewayError = SalesforceError::Fault {
            code: "INVALID_LOGIN".into(),
            message: "Invalid username, password, security token; or user locked out.".into(),
        }
        .into();
        assert_eq!(err.error_code(), "INVALID_LOGIN");
    }

    #[test]
    fn test_parse_problems_are_unexpected_responses() {
        let err: GatewayError = SalesforceError::MissingElement("sessionId").into();
        assert_eq!(err.error_code(), "UNEXPECTED_RESPONSE");
        assert!(err.detail_message().contains("sessionId"));

        let err: GatewayError = SalesforceError::Status {
            status: 502,
            body: "Bad Gateway".into(),
        }
        .into();
        assert_eq!(err.error_code(), "UNEXPECTED_RESPONSE");
    }
}
