//! JSON-lines bridge protocol.
//!
//! Inbound, one object per line:
//! `{"name": "query", "sender": "explorer", "args": {"org": "00D...", "soql_text": "..."}}`
//!
//! Outbound, one object per line:
//! `{"name": "response_query", "payload": {status, message, response, limitInfo}}`
//! `{"name": "log_message", "payload": {sender, channel, message}}`
//!
//! Names carrying the legacy `sf_` prefix are accepted as aliases.

use eforce_application::{DispatchError, DispatchResponse};
use eforce_domain::{
    Credentials, DomainError, LogChannel, LogEntry, OperationKind, OperationRequest, OrgId,
    SObjectName, SenderId, SoqlQuery, SoslSearch,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const LOG_MESSAGE: &str = "log_message";
const SEND_LOG: &str = "send_log";

/// Errors raised while decoding an inbound frame
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Malformed frame: {0}")]
    Frame(#[source] serde_json::Error),

    #[error("Frame is not valid UTF-8: {0}")]
    Encoding(#[source] std::str::Utf8Error),

    #[error("Unknown message type: {0}")]
    UnknownMessage(String),

    #[error("Invalid arguments for {name}: {source}")]
    InvalidArgs {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<BridgeError> for DispatchError {
    fn from(err: BridgeError) -> Self {
        DispatchError::ValidationFailure(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct InboundFrame {
    name: String,
    #[serde(default)]
    sender: Option<SenderId>,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Deserialize)]
struct LoginArgs {
    username: String,
    password: String,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrgArgs {
    org: String,
}

#[derive(Debug, Deserialize)]
struct QueryArgs {
    org: String,
    #[serde(alias = "rest_api_soql_text")]
    soql_text: String,
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    org: String,
    #[serde(alias = "rest_api_sosl_text")]
    sosl_text: String,
}

#[derive(Debug, Deserialize)]
struct DescribeArgs {
    org: String,
    #[serde(alias = "rest_api_describe_text")]
    describe_text: String,
}

#[derive(Debug, Deserialize)]
struct SendLogArgs {
    #[serde(default = "default_log_channel")]
    channel: LogChannel,
    message: String,
}

fn default_log_channel() -> LogChannel {
    LogChannel::Info
}

/// What an inbound frame asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeMessage {
    Operation(OperationRequest),
    SendLog { channel: LogChannel, message: String },
}

/// A decoded inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Inbound {
    pub sender: SenderId,
    pub message: BridgeMessage,
}

/// A frame that could not be turned into a request.
///
/// Carries as much as was recovered so the rejection can be routed: the
/// sender and, when the name was recognized, the operation kind.
#[derive(Debug)]
pub struct Rejected {
    pub sender: SenderId,
    pub kind: Option<OperationKind>,
    pub error: BridgeError,
}

enum Name {
    Operation(OperationKind),
    SendLog,
}

fn resolve_name(name: &str) -> Option<Name> {
    let name = name
        .strip_prefix("sf_")
        .or_else(|| name.strip_prefix("eforce_"))
        .unwrap_or(name);
    if name == SEND_LOG {
        return Some(Name::SendLog);
    }
    OperationKind::ALL
        .into_iter()
        .find(|kind| kind.as_str() == name)
        .map(Name::Operation)
}

fn args<T: DeserializeOwned>(name: &str, value: Value) -> Result<T, BridgeError> {
    serde_json::from_value(value).map_err(|source| BridgeError::InvalidArgs {
        name: name.to_string(),
        source,
    })
}

/// Decode one raw inbound line, rejecting bytes that are not UTF-8.
pub fn decode_bytes(line: &[u8], default_login_url: &str) -> Result<Inbound, Rejected> {
    let line = std::str::from_utf8(line).map_err(|e| Rejected {
        sender: SenderId::default(),
        kind: None,
        error: BridgeError::Encoding(e),
    })?;
    decode(line, default_login_url)
}

/// Decode one inbound line. `default_login_url` fills in a login without `url`.
pub fn decode(line: &str, default_login_url: &str) -> Result<Inbound, Rejected> {
    let frame: InboundFrame = serde_json::from_str(line).map_err(|e| Rejected {
        sender: SenderId::default(),
        kind: None,
        error: BridgeError::Frame(e),
    })?;
    let sender = frame.sender.unwrap_or_default();

    let kind = match resolve_name(&frame.name) {
        Some(Name::Operation(kind)) => kind,
        Some(Name::SendLog) => {
            return match args::<SendLogArgs>(&frame.name, frame.args) {
                Ok(SendLogArgs { channel, message }) => Ok(Inbound {
                    sender,
                    message: BridgeMessage::SendLog { channel, message },
                }),
                Err(error) => Err(Rejected {
                    sender,
                    kind: None,
                    error,
                }),
            };
        }
        None => {
            return Err(Rejected {
                sender,
                kind: None,
                error: BridgeError::UnknownMessage(frame.name),
            });
        }
    };

    match decode_operation(kind, &frame.name, frame.args, default_login_url) {
        Ok(request) => Ok(Inbound {
            sender,
            message: BridgeMessage::Operation(request),
        }),
        Err(error) => Err(Rejected {
            sender,
            kind: Some(kind),
            error,
        }),
    }
}

fn decode_operation(
    kind: OperationKind,
    name: &str,
    value: Value,
    default_login_url: &str,
) -> Result<OperationRequest, BridgeError> {
    let request = match kind {
        OperationKind::Login => {
            let a: LoginArgs = args(name, value)?;
            let url = a
                .url
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| default_login_url.to_string());
            let credentials = Credentials::new(a.username, a.password, url)?
                .with_token(a.token.unwrap_or_default());
            OperationRequest::Login(credentials)
        }
        OperationKind::Logout => {
            let a: OrgArgs = args(name, value)?;
            OperationRequest::Logout {
                org: OrgId::new(a.org)?,
            }
        }
        OperationKind::Query => {
            let a: QueryArgs = args(name, value)?;
            OperationRequest::Query {
                org: OrgId::new(a.org)?,
                soql: SoqlQuery::new(a.soql_text)?,
            }
        }
        OperationKind::Search => {
            let a: SearchArgs = args(name, value)?;
            OperationRequest::Search {
                org: OrgId::new(a.org)?,
                sosl: SoslSearch::new(a.sosl_text)?,
            }
        }
        OperationKind::Describe => {
            let a: DescribeArgs = args(name, value)?;
            OperationRequest::Describe {
                org: OrgId::new(a.org)?,
                sobject: SObjectName::new(a.describe_text)?,
            }
        }
        OperationKind::OrgExplore => {
            let a: OrgArgs = args(name, value)?;
            OperationRequest::OrgExplore {
                org: OrgId::new(a.org)?,
            }
        }
    };
    Ok(request)
}

/// One outbound frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub name: String,
    pub payload: Value,
}

impl OutboundMessage {
    pub fn response(response: &DispatchResponse) -> Self {
        Self {
            name: response.channel.as_str().to_string(),
            payload: serde_json::to_value(&response.envelope).unwrap_or(Value::Null),
        }
    }

    pub fn log(entry: &LogEntry) -> Self {
        Self {
            name: LOG_MESSAGE.to_string(),
            payload: serde_json::to_value(entry).unwrap_or(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eforce_domain::{DEFAULT_LOGIN_URL, ResponseChannel, ResponseEnvelope};
    use serde_json::json;

    fn decode_ok(value: Value) -> Inbound {
        decode(&value.to_string(), DEFAULT_LOGIN_URL).unwrap()
    }

    fn decode_err(value: Value) -> Rejected {
        decode(&value.to_string(), DEFAULT_LOGIN_URL).unwrap_err()
    }

    #[test]
    fn test_login_defaults_url_and_appends_token() {
        let inbound = decode_ok(json!({
            "name": "login",
            "sender": "explorer",
            "args": {"username": "admin@acme.com", "password": "secret", "token": "TOK", "url": ""}
        }));

        assert_eq!(inbound.sender.as_str(), "explorer");
        let BridgeMessage::Operation(OperationRequest::Login(creds)) = inbound.message else {
            panic!("expected login");
        };
        assert_eq!(creds.login_url(), DEFAULT_LOGIN_URL);
        assert_eq!(creds.combined_password(), "secretTOK");
    }

    #[test]
    fn test_legacy_names_and_field_aliases() {
        let inbound = decode_ok(json!({
            "name": "sf_query",
            "args": {"org": "00DACME", "rest_api_soql_text": "SELECT Id FROM Account"}
        }));

        assert_eq!(inbound.sender, SenderId::default());
        assert_eq!(
            inbound.message,
            BridgeMessage::Operation(OperationRequest::Query {
                org: OrgId::new("00DACME").unwrap(),
                soql: SoqlQuery::new("SELECT Id FROM Account").unwrap(),
            })
        );

        let inbound = decode_ok(json!({
            "name": "sf_describe",
            "args": {"org": "00DACME", "rest_api_describe_text": "Contact"}
        }));
        assert!(matches!(
            inbound.message,
            BridgeMessage::Operation(OperationRequest::Describe { .. })
        ));

        let inbound = decode_ok(json!({"name": "sf_orgExplore", "args": {"org": "00DACME"}}));
        assert!(matches!(
            inbound.message,
            BridgeMessage::Operation(OperationRequest::OrgExplore { .. })
        ));
    }

    #[test]
    fn test_send_log_variants() {
        for name in ["send_log", "eforce_send_log"] {
            let inbound = decode_ok(json!({
                "name": name,
                "args": {"channel": "Debug", "message": "clicked"}
            }));
            assert_eq!(
                inbound.message,
                BridgeMessage::SendLog {
                    channel: LogChannel::from("Debug"),
                    message: "clicked".to_string()
                }
            );
        }
    }

    #[test]
    fn test_blank_soql_is_rejected_with_kind() {
        let rejected = decode_err(json!({
            "name": "query",
            "sender": "explorer",
            "args": {"org": "00DACME", "soql_text": "   "}
        }));
        assert_eq!(rejected.kind, Some(OperationKind::Query));
        assert_eq!(rejected.sender.as_str(), "explorer");
        assert!(matches!(rejected.error, BridgeError::Domain(_)));
    }

    #[test]
    fn test_missing_args_are_rejected() {
        let rejected = decode_err(json!({"name": "search", "args": {"org": "00DACME"}}));
        assert_eq!(rejected.kind, Some(OperationKind::Search));
        assert!(matches!(rejected.error, BridgeError::InvalidArgs { .. }));
    }

    #[test]
    fn test_unknown_and_malformed_frames() {
        let rejected = decode_err(json!({"name": "sf_bulk", "args": {}}));
        assert!(rejected.kind.is_none());
        assert!(matches!(rejected.error, BridgeError::UnknownMessage(ref n) if n == "sf_bulk"));

        let rejected = decode("{not json", DEFAULT_LOGIN_URL).unwrap_err();
        assert!(matches!(rejected.error, BridgeError::Frame(_)));
    }

    #[test]
    fn test_invalid_utf8_is_rejected_as_a_frame_error() {
        let rejected = decode_bytes(b"{\"name\":\"query\",\"args\":\"\xff\"}\n", DEFAULT_LOGIN_URL)
            .unwrap_err();
        assert!(rejected.kind.is_none());
        assert_eq!(rejected.sender, SenderId::default());
        assert!(matches!(rejected.error, BridgeError::Encoding(_)));

        let inbound = decode_bytes(
            b"{\"name\":\"logout\",\"args\":{\"org\":\"00DACME\"}}\r\n",
            DEFAULT_LOGIN_URL,
        )
        .unwrap();
        assert!(matches!(
            inbound.message,
            BridgeMessage::Operation(OperationRequest::Logout { .. })
        ));
    }

    #[test]
    fn test_outbound_shapes() {
        let response = DispatchResponse {
            channel: ResponseChannel::OrgObjectDisplay,
            envelope: ResponseEnvelope::success("Fetched Org Details", json!({"Id": "00DACME"})),
        };
        let frame = serde_json::to_value(OutboundMessage::response(&response)).unwrap();
        assert_eq!(frame["name"], "response_org_object_display");
        assert_eq!(frame["payload"]["status"], true);
        assert_eq!(frame["payload"]["response"]["Id"], "00DACME");

        let frame = serde_json::to_value(OutboundMessage::log(&LogEntry::error(
            SenderId::new("explorer"),
            "Query Failed x",
        )))
        .unwrap();
        assert_eq!(frame["name"], "log_message");
        assert_eq!(frame["payload"]["channel"], "Error");
    }
}
