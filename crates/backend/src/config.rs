//! Backend connection settings.

use serde::{Deserialize, Serialize};

/// Where and how to reach the backend API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// API root, e.g. `http://localhost:5001/api/`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5001/api/".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: BackendConfig = serde_json::from_str(r#"{"base_url":"https://hr.example/api"}"#).unwrap();
        assert_eq!(config.base_url, "https://hr.example/api");
        assert_eq!(config.timeout_secs, 30);
    }
}
