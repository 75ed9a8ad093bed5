//! Session lifecycle hooks.

use async_trait::async_trait;

/// Notified after the session store has signed the user out.
///
/// Stores that hold per-user state register one of these so that a sign-out
/// clears them too, instead of leaving the previous user's data in memory.
#[async_trait]
pub trait SignOutListener: Send + Sync {
    async fn on_signed_out(&self);
}
