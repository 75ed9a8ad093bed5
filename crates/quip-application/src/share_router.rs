//! Routes shared jokes to the native share sheet or the clipboard.

use std::sync::Arc;

use quip_core::error::{QuipError, Result};
use quip_core::share::{ShareChannel, ShareMessage, ShareTarget};

/// Picks a delivery mechanism for shared text.
///
/// The native target is used when it reports itself available; otherwise,
/// or when native delivery fails, the text goes to the clipboard.
#[derive(Clone)]
pub struct ShareRouter {
    native: Arc<dyn ShareTarget>,
    clipboard: Arc<dyn ShareTarget>,
}

impl ShareRouter {
    pub fn new(native: Arc<dyn ShareTarget>, clipboard: Arc<dyn ShareTarget>) -> Self {
        Self { native, clipboard }
    }

    pub async fn route(&self, message: &ShareMessage) -> Result<ShareChannel> {
        if self.native.is_available() {
            match self.native.deliver(message).await {
                Ok(()) => return Ok(ShareChannel::Native),
                Err(e) => {
                    tracing::warn!(error = %e, "Native share failed, copying to clipboard");
                }
            }
        }

        self.clipboard
            .deliver(message)
            .await
            .map_err(|e| QuipError::Share(format!("clipboard write failed: {}", e)))?;
        Ok(ShareChannel::Clipboard)
    }
}
