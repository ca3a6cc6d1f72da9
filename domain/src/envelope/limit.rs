use serde::{Deserialize, Serialize};

/// API request usage for the organization's rolling 24h window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiUsage {
    pub used: u64,
    pub limit: u64,
}

impl ApiUsage {
    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.used)
    }
}

/// Usage/quota metadata reported alongside remote calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_usage: Option<ApiUsage>,
}

impl LimitInfo {
    pub fn with_api_usage(used: u64, limit: u64) -> Self {
        Self {
            api_usage: Some(ApiUsage { used, limit }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case() {
        let info = LimitInfo::with_api_usage(25, 15000);
        let json = serde_json::to_value(info).unwrap();
        assert_eq!(json["apiUsage"]["used"], 25);
        assert_eq!(json["apiUsage"]["limit"], 15000);
    }

    #[test]
    fn test_remaining_saturates() {
        assert_eq!(ApiUsage { used: 10, limit: 4 }.remaining(), 0);
        assert_eq!(ApiUsage { used: 4, limit: 10 }.remaining(), 6);
    }
}
