//! Mock authentication.
//!
//! STUB: there is no credential check. Every sign-in succeeds; the password
//! is ignored. Replace with a real [`Authenticator`] before shipping anything
//! that needs access control.

use std::sync::Arc;

use async_trait::async_trait;
use quip_core::error::Result;
use quip_core::id::{IdGenerator, UuidIdGenerator};
use quip_core::user::{Authenticator, Identity};

/// Identifier given to every signed-in account.
pub const MOCK_SIGN_IN_ID: &str = "1";

/// Authenticator that accepts any credentials.
#[derive(Clone)]
pub struct MockAuthenticator {
    ids: Arc<dyn IdGenerator>,
}

impl MockAuthenticator {
    pub fn new() -> Self {
        Self::with_id_generator(Arc::new(UuidIdGenerator))
    }

    /// Uses `ids` for accounts created through sign-up.
    pub fn with_id_generator(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }
}

impl Default for MockAuthenticator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Authenticator for MockAuthenticator {
    async fn sign_in(&self, email: &str, _password: &str) -> Result<Identity> {
        Ok(Identity::new(
            MOCK_SIGN_IN_ID,
            email,
            Identity::display_name_from_email(email),
        ))
    }

    async fn sign_up(&self, email: &str, _password: &str, name: &str) -> Result<Identity> {
        Ok(Identity::new(self.ids.next_id(), email, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_accepts_anything() {
        let auth = MockAuthenticator::new();
        let identity = auth.sign_in("alice@example.com", "x").await.unwrap();

        assert_eq!(identity, Identity::new("1", "alice@example.com", "alice"));
    }

    #[tokio::test]
    async fn test_sign_up_assigns_fresh_ids() {
        let auth = MockAuthenticator::new();
        let first = auth.sign_up("a@x.io", "pw", "Ann").await.unwrap();
        let second = auth.sign_up("a@x.io", "pw", "Ann").await.unwrap();

        assert_eq!(first.name, "Ann");
        assert_eq!(first.email, "a@x.io");
        assert_ne!(first.id, second.id);
        assert_ne!(first.id, MOCK_SIGN_IN_ID);
    }
}
