//! Infrastructure layer for eforce
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod salesforce;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileDispatchConfig, FileLoggingConfig,
    FileOutputConfig, FileOutputFormat, FileSalesforceConfig,
};
pub use logging::{JsonlLogRelay, TracingLogRelay};
pub use salesforce::{
    error::{Result, SalesforceError},
    gateway::{DEFAULT_API_VERSION, SalesforceGateway},
    session::SalesforceSession,
};
