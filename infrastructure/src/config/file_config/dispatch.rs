//! Dispatcher settings from TOML (`[dispatch]` section)

use serde::{Deserialize, Serialize};

/// Raw dispatch configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDispatchConfig {
    /// Remove the session from the registry after a successful logout
    pub evict_on_logout: bool,
}

impl Default for FileDispatchConfig {
    fn default() -> Self {
        Self {
            evict_on_logout: true,
        }
    }
}
