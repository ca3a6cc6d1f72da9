//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod dispatch;
mod logging;
mod output;
mod salesforce;

pub use dispatch::FileDispatchConfig;
pub use logging::FileLoggingConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use salesforce::FileSalesforceConfig;

use eforce_application::DispatchPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("salesforce.request_timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("salesforce.api_version '{0}' is not of the form NN.N")]
    InvalidApiVersion(String),

    #[error("salesforce.login_url '{0}' must start with http:// or https://")]
    InvalidLoginUrl(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Remote endpoint settings
    pub salesforce: FileSalesforceConfig,
    /// Dispatcher settings
    pub dispatch: FileDispatchConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Log relay sinks
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.salesforce.request_timeout_seconds == 0 {
            issues.push(ConfigValidationError::InvalidTimeout);
        }
        if !self.salesforce.is_valid_api_version() {
            issues.push(ConfigValidationError::InvalidApiVersion(
                self.salesforce.api_version.clone(),
            ));
        }
        let url = self.salesforce.login_url.as_str();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            issues.push(ConfigValidationError::InvalidLoginUrl(url.to_string()));
        }

        issues
    }

    /// Dispatcher policy derived from `[salesforce]` and `[dispatch]`.
    pub fn dispatch_policy(&self) -> DispatchPolicy {
        DispatchPolicy::default()
            .with_request_timeout(Some(Duration::from_secs(
                self.salesforce.request_timeout_seconds,
            )))
            .with_evict_on_logout(self.dispatch.evict_on_logout)
    }
}
