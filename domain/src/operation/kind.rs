use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of an operation the dispatcher can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    #[serde(rename = "login")]
    Login,
    #[serde(rename = "logout")]
    Logout,
    #[serde(rename = "query")]
    Query,
    #[serde(rename = "search")]
    Search,
    #[serde(rename = "describe")]
    Describe,
    #[serde(rename = "orgExplore")]
    OrgExplore,
}

impl OperationKind {
    pub const ALL: [OperationKind; 6] = [
        OperationKind::Login,
        OperationKind::Logout,
        OperationKind::Query,
        OperationKind::Search,
        OperationKind::Describe,
        OperationKind::OrgExplore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Login => "login",
            OperationKind::Logout => "logout",
            OperationKind::Query => "query",
            OperationKind::Search => "search",
            OperationKind::Describe => "describe",
            OperationKind::OrgExplore => "orgExplore",
        }
    }

    /// Channel a successful outcome is sent on.
    pub fn success_channel(&self) -> ResponseChannel {
        match self {
            OperationKind::Login => ResponseChannel::Login,
            OperationKind::Logout => ResponseChannel::Logout,
            OperationKind::Query | OperationKind::Search => ResponseChannel::Query,
            OperationKind::Describe => ResponseChannel::Describe,
            OperationKind::OrgExplore => ResponseChannel::OrgObjectDisplay,
        }
    }

    /// Channel a failed outcome is sent on.
    ///
    /// Login and logout keep their own channel; data operations fall back to
    /// the generic one.
    pub fn failure_channel(&self) -> ResponseChannel {
        match self {
            OperationKind::Login => ResponseChannel::Login,
            OperationKind::Logout => ResponseChannel::Logout,
            _ => ResponseChannel::Generic,
        }
    }

    /// Default envelope message for a failed outcome.
    pub fn failure_message(&self) -> &'static str {
        match self {
            OperationKind::Login => "Login Failed",
            OperationKind::Logout => "Logout Failed",
            OperationKind::Query => "Query Failed",
            OperationKind::Search => "Search Failed",
            OperationKind::Describe => "Describe Failed",
            OperationKind::OrgExplore => "Org Fetch Failed",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound message type carrying a response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseChannel {
    #[serde(rename = "response_login")]
    Login,
    #[serde(rename = "response_logout")]
    Logout,
    #[serde(rename = "response_generic")]
    Generic,
    #[serde(rename = "response_query")]
    Query,
    #[serde(rename = "response_describe")]
    Describe,
    #[serde(rename = "response_org_object_display")]
    OrgObjectDisplay,
}

impl ResponseChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseChannel::Login => "response_login",
            ResponseChannel::Logout => "response_logout",
            ResponseChannel::Generic => "response_generic",
            ResponseChannel::Query => "response_query",
            ResponseChannel::Describe => "response_describe",
            ResponseChannel::OrgObjectDisplay => "response_org_object_display",
        }
    }
}

impl fmt::Display for ResponseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
