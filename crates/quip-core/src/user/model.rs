//! Identity domain model.

use serde::{Deserialize, Serialize};

/// The authenticated user.
///
/// Serialized as-is under the `user` storage key:
/// `{"id":"1","email":"alice@example.com","name":"alice"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque identifier assigned by the authenticator
    pub id: String,
    /// Login key, also the source of the default display name
    pub email: String,
    /// Display name
    pub name: String,
}

impl Identity {
    pub fn new(id: impl Into<String>, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
        }
    }

    /// Derives a display name from the local part of an email address.
    ///
    /// Everything before the first `@` is used. An address without `@`
    /// yields the whole string.
    pub fn display_name_from_email(email: &str) -> String {
        email.split('@').next().unwrap_or_default().to_string()
    }
}
