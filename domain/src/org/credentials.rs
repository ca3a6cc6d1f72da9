use crate::core::error::DomainError;
use std::fmt;

/// Production login endpoint. Sandboxes use `https://test.salesforce.com`.
pub const DEFAULT_LOGIN_URL: &str = "https://login.salesforce.com";

/// Username/password login input.
///
/// The security token, when present, is appended to the password before it is
/// sent; that is how the remote platform expects it for untrusted networks.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
    token: Option<String>,
    login_url: String,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        login_url: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let username = username.into().trim().to_string();
        if username.is_empty() {
            return Err(DomainError::EmptyUsername);
        }

        let login_url = login_url.into();
        let login_url = login_url.trim().trim_end_matches('/');
        if !(login_url.starts_with("https://") || login_url.starts_with("http://"))
            || login_url.len() <= "https://".len()
        {
            return Err(DomainError::InvalidLoginUrl(login_url.to_string()));
        }

        Ok(Self {
            username,
            password: password.into(),
            token: None,
            login_url: login_url.to_string(),
        })
    }

    /// Attach a security token. An empty token is treated as absent.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = if token.is_empty() { None } else { Some(token) };
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// The password as sent on the wire: `password` followed by the token.
    pub fn combined_password(&self) -> String {
        match &self.token {
            Some(token) => format!("{}{}", self.password, token),
            None => self.password.clone(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("login_url", &self.login_url)
            .finish()
    }
}
