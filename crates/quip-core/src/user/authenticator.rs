//! Authentication boundary.

use async_trait::async_trait;

use super::model::Identity;
use crate::error::Result;

/// Resolves credentials to an [`Identity`].
///
/// This is the seam where a real credential check replaces the mock one.
/// A rejection is reported as `Err(QuipError::Security(..))`; the session
/// store turns any error into an unsuccessful sign-in without touching its
/// current state.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Authenticates an existing account.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity>;

    /// Registers a new account and returns its identity.
    async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<Identity>;
}
