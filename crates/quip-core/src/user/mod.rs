//! User domain module.
//!
//! # Module Structure
//!
//! - `model`: Identity domain model
//! - `credentials`: login/signup form validation
//! - `authenticator`: authentication trait
//! - `listener`: session lifecycle hooks
//!
//! # Usage
//!
//! ```ignore
//! use quip_core::user::{Authenticator, Identity, SignInRequest};
//! ```

mod authenticator;
mod credentials;
mod listener;
mod model;

// Re-export public API
pub use authenticator::Authenticator;
pub use credentials::{SignInRequest, SignUpRequest};
pub use listener::SignOutListener;
pub use model::Identity;
