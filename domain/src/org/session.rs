use super::OrgId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Session credential issued by the remote platform at login.
///
/// `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Identity of the logged-in user, returned as the login payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub organization_id: OrgId,
    pub url: String,
}

/// One authenticated connection to a remote organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    org_id: OrgId,
    user_id: String,
    instance_url: String,
    access_token: AccessToken,
}

impl Session {
    pub fn new(
        org_id: OrgId,
        user_id: impl Into<String>,
        instance_url: impl Into<String>,
        access_token: AccessToken,
    ) -> Self {
        Self {
            org_id,
            user_id: user_id.into(),
            instance_url: instance_url.into().trim_end_matches('/').to_string(),
            access_token,
        }
    }

    pub fn org_id(&self) -> &OrgId {
        &self.org_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    /// Identity URL in the `{instance}/id/{org}/{user}` form.
    pub fn identity_url(&self) -> String {
        format!("{}/id/{}/{}", self.instance_url, self.org_id, self.user_id)
    }

    pub fn user_info(&self) -> UserInfo {
        UserInfo {
            id: self.user_id.clone(),
            organization_id: self.org_id.clone(),
            url: self.identity_url(),
        }
    }
}
