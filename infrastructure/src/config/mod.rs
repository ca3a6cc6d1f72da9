//! Configuration file loading for eforce
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `EFORCE_SECTION__KEY=value`
//! 2. `--config <path>` specified file
//! 3. Project root: `./eforce.toml` or `./.eforce.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/eforce/config.toml`
//!    (fallback `~/.config/eforce/config.toml`)
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileDispatchConfig, FileLoggingConfig, FileOutputConfig,
    FileOutputFormat, FileSalesforceConfig,
};
pub use loader::ConfigLoader;
