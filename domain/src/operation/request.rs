use super::OperationKind;
use crate::core::error::DomainError;
use crate::org::{Credentials, OrgId};
use crate::record::SObjectName;
use std::fmt;

fn non_empty(language: &'static str, text: String) -> Result<String, DomainError> {
    if text.trim().is_empty() {
        Err(DomainError::EmptyStatement(language))
    } else {
        Ok(text)
    }
}

/// A non-empty SOQL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoqlQuery(String);

impl SoqlQuery {
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        non_empty("SOQL", text.into()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SoqlQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A non-empty SOSL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoslSearch(String);

impl SoslSearch {
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        non_empty("SOSL", text.into()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SoslSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A request for one remote operation.
///
/// Every variant except `Login` targets an organization that must already be
/// connected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationRequest {
    Login(Credentials),
    Logout { org: OrgId },
    Query { org: OrgId, soql: SoqlQuery },
    Search { org: OrgId, sosl: SoslSearch },
    Describe { org: OrgId, sobject: SObjectName },
    OrgExplore { org: OrgId },
}

impl OperationRequest {
    pub fn kind(&self) -> OperationKind {
        match self {
            OperationRequest::Login(_) => OperationKind::Login,
            OperationRequest::Logout { .. } => OperationKind::Logout,
            OperationRequest::Query { .. } => OperationKind::Query,
            OperationRequest::Search { .. } => OperationKind::Search,
            OperationRequest::Describe { .. } => OperationKind::Describe,
            OperationRequest::OrgExplore { .. } => OperationKind::OrgExplore,
        }
    }

    /// Target organization, `None` for login.
    pub fn org_id(&self) -> Option<&OrgId> {
        match self {
            OperationRequest::Login(_) => None,
            OperationRequest::Logout { org }
            | OperationRequest::Query { org, .. }
            | OperationRequest::Search { org, .. }
            | OperationRequest::Describe { org, .. }
            | OperationRequest::OrgExplore { org } => Some(org),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::org::DEFAULT_LOGIN_URL;

    #[test]
    fn test_blank_statements_rejected() {
        assert_eq!(
            SoqlQuery::new("  \n"),
            Err(DomainError::EmptyStatement("SOQL"))
        );
        assert_eq!(SoslSearch::new(""), Err(DomainError::EmptyStatement("SOSL")));
    }

    #[test]
    fn test_login_has_no_target_org() {
        let creds = Credentials::new("u", "p", DEFAULT_LOGIN_URL).unwrap();
        let request = OperationRequest::Login(creds);
        assert_eq!(request.kind(), OperationKind::Login);
        assert!(request.org_id().is_none());
    }

    #[test]
    fn test_describe_targets_org() {
        let request = OperationRequest::Describe {
            org: OrgId::new("00D1").unwrap(),
            sobject: SObjectName::new("Account").unwrap(),
        };
        assert_eq!(request.kind(), OperationKind::Describe);
        assert_eq!(request.org_id().unwrap().as_str(), "00D1");
    }
}
