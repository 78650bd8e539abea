//! Settings file for the CLI.

use std::path::Path;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use worklog_backend::BackendConfig;
use worklog_views::ViewConfig;

/// Everything the binary can be configured with from a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Backend connection
    #[serde(default)]
    pub backend: BackendConfig,

    /// Presentation
    #[serde(default)]
    pub view: ViewConfig,

    /// Default login name
    #[serde(default)]
    pub username: Option<String>,
}

impl Settings {
    /// Read settings from a JSON file, or use defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("invalid settings in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file() {
        let settings: Settings =
            serde_json::from_str(r#"{"backend":{"base_url":"https://hr.example/api/"},"view":{"page_size":25}}"#)
                .unwrap();
        assert_eq!(settings.backend.base_url, "https://hr.example/api/");
        assert_eq!(settings.backend.timeout_secs, 30);
        assert_eq!(settings.view.page_size, 25);
        assert_eq!(settings.view.notice_millis, 2000);
        assert_eq!(settings.username, None);
    }

    #[test]
    fn test_no_file_means_defaults() {
        assert_eq!(Settings::load(None).unwrap(), Settings::default());
    }
}
