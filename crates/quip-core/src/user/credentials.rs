//! Form-level credential checks.
//!
//! The session store accepts whatever it is given. Login and signup forms
//! run these checks first and only call the store when they pass.

use crate::error::{QuipError, Result};

/// Input collected by a login form.
#[derive(Debug, Clone, Default)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

impl SignInRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Both fields must be non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(QuipError::validation("Please fill in all fields"));
        }
        Ok(())
    }
}

/// Input collected by a signup form.
#[derive(Debug, Clone, Default)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub name: String,
}

impl SignUpRequest {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
            name: name.into(),
        }
    }

    /// All four fields must be non-empty and the two passwords must match.
    pub fn validate(&self) -> Result<()> {
        if self.email.is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
            || self.name.is_empty()
        {
            return Err(QuipError::validation("Please fill in all fields"));
        }
        if self.password != self.confirm_password {
            return Err(QuipError::validation("Passwords don't match"));
        }
        Ok(())
    }
}
