//! Salesforce connection settings from TOML (`[salesforce]` section)

use crate::salesforce::gateway::DEFAULT_API_VERSION;
use eforce_domain::DEFAULT_LOGIN_URL;
use serde::{Deserialize, Serialize};

/// Raw Salesforce configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSalesforceConfig {
    /// API version used for both the SOAP and REST endpoints (e.g. "58.0")
    pub api_version: String,
    /// Login endpoint used when a request does not name one
    pub login_url: String,
    /// Upper bound on each remote call, in seconds
    pub request_timeout_seconds: u64,
}

impl Default for FileSalesforceConfig {
    fn default() -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_string(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
            request_timeout_seconds: 120,
        }
    }
}

impl FileSalesforceConfig {
    /// `true` for versions of the form `NN.N`.
    pub fn is_valid_api_version(&self) -> bool {
        match self.api_version.split_once('.') {
            Some((major, minor)) => {
                !major.is_empty()
                    && !minor.is_empty()
                    && major.chars().all(|c| c.is_ascii_digit())
                    && minor.chars().all(|c| c.is_ascii_digit())
            }
            None => false,
        }
    }
}
