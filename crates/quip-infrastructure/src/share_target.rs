//! In-process share targets.
//!
//! Headless builds and tests have neither a share sheet nor a system
//! clipboard; these targets record what they were given instead.

use std::sync::Arc;

use async_trait::async_trait;
use quip_core::error::{QuipError, Result};
use quip_core::share::{ShareMessage, ShareTarget};
use tokio::sync::Mutex;

/// A share target that keeps every delivered message in memory.
///
/// Clones share the same log.
#[derive(Debug, Clone)]
pub struct MemoryShareTarget {
    available: bool,
    delivered: Arc<Mutex<Vec<ShareMessage>>>,
}

impl MemoryShareTarget {
    pub fn new() -> Self {
        Self {
            available: true,
            delivered: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A target that reports itself unavailable, like a platform with no
    /// native share sheet.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub async fn delivered(&self) -> Vec<ShareMessage> {
        self.delivered.lock().await.clone()
    }

    /// Text of the most recent delivery, i.e. the clipboard contents.
    pub async fn last_text(&self) -> Option<String> {
        self.delivered
            .lock()
            .await
            .last()
            .map(|message| message.text.clone())
    }
}

impl Default for MemoryShareTarget {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ShareTarget for MemoryShareTarget {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn deliver(&self, message: &ShareMessage) -> Result<()> {
        if !self.available {
            return Err(QuipError::Share("share target unavailable".to_string()));
        }
        self.delivered.lock().await.push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str) -> ShareMessage {
        ShareMessage {
            title: "t".to_string(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_records_deliveries() {
        let target = MemoryShareTarget::new();
        let handle = target.clone();

        target.deliver(&message("first")).await.unwrap();
        target.deliver(&message("second")).await.unwrap();

        assert_eq!(handle.delivered().await.len(), 2);
        assert_eq!(handle.last_text().await.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_unavailable_rejects() {
        let target = MemoryShareTarget::unavailable();
        assert!(!target.is_available());
        assert!(target.deliver(&message("x")).await.is_err());
        assert!(target.last_text().await.is_none());
    }
}
