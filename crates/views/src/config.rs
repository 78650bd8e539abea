//! View model settings.

use std::time::Duration;
use serde::{Deserialize, Serialize};
use worklog_query::DEFAULT_PAGE_SIZE;

/// Presentation settings shared by both view models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Rows per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// How long a confirmation notice stays visible, in milliseconds
    #[serde(default = "default_notice_millis")]
    pub notice_millis: u64,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_notice_millis() -> u64 {
    2000
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            notice_millis: default_notice_millis(),
        }
    }
}

impl ViewConfig {
    /// Notice lifetime as a duration.
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_millis)
    }
}
