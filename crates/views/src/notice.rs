//! Transient confirmation messages.

use std::time::Duration;
use tokio::time::Instant;

/// A message that disappears after a fixed interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    message: String,
    expires_at: Instant,
}

impl Notice {
    /// Show `message` for `ttl` from now.
    pub fn new(message: impl Into<String>, ttl: Duration) -> Self {
        Self {
            message: message.into(),
            expires_at: Instant::now() + ttl,
        }
    }

    /// Message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the notice has run out.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_expires_after_ttl() {
        let notice = Notice::new("done", Duration::from_secs(2));
        assert!(!notice.is_expired());

        tokio::time::advance(Duration::from_millis(1999)).await;
        assert!(!notice.is_expired());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(notice.is_expired());
    }
}
