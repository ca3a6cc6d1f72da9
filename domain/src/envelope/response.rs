use super::LimitInfo;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error detail carried in the payload slot of a failure envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub error_code: String,
    pub message: String,
}

impl ErrorDetail {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}

/// The uniform `{status, message, response, limitInfo}` outcome of one
/// operation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status: bool,
    pub message: String,
    pub response: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_info: Option<LimitInfo>,
}

impl ResponseEnvelope {
    pub fn success(message: impl Into<String>, response: Value) -> Self {
        Self {
            status: true,
            message: message.into(),
            response,
            limit_info: None,
        }
    }

    pub fn failure(message: impl Into<String>, detail: ErrorDetail) -> Self {
        Self {
            status: false,
            message: message.into(),
            response: serde_json::to_value(detail).unwrap_or(Value::Null),
            limit_info: None,
        }
    }

    pub fn with_limit_info(mut self, limit_info: Option<LimitInfo>) -> Self {
        self.limit_info = limit_info;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status
    }

    /// Error detail of a failure envelope.
    pub fn error_detail(&self) -> Option<ErrorDetail> {
        if self.status {
            return None;
        }
        serde_json::from_value(self.response.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_wire_shape() {
        let envelope = ResponseEnvelope::success("Logout Successful", json!({}))
            .with_limit_info(Some(LimitInfo::with_api_usage(1, 100)));
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["status"], true);
        assert_eq!(json["message"], "Logout Successful");
        assert_eq!(json["response"], json!({}));
        assert_eq!(json["limitInfo"]["apiUsage"]["used"], 1);
    }

    #[test]
    fn test_failure_carries_error_detail() {
        let envelope = ResponseEnvelope::failure(
            "Query Failed",
            ErrorDetail::new("MALFORMED_QUERY", "unexpected token: FROM"),
        );
        assert!(!envelope.is_success());
        assert_eq!(envelope.response["errorCode"], "MALFORMED_QUERY");
        assert_eq!(
            envelope.error_detail().unwrap().message,
            "unexpected token: FROM"
        );
    }

    #[test]
    fn test_limit_info_omitted_when_absent() {
        let json = serde_json::to_value(ResponseEnvelope::success("ok", json!(null))).unwrap();
        assert!(json.get("limitInfo").is_none());
    }

    #[test]
    fn test_success_has_no_error_detail() {
        assert!(ResponseEnvelope::success("ok", json!({})).error_detail().is_none());
    }
}
