//! Domain layer for quip.
//!
//! Models, traits and pure logic shared by the infrastructure and
//! application crates. Nothing here performs I/O.

pub mod config;
pub mod error;
pub mod id;
pub mod joke;
pub mod share;
pub mod storage;
pub mod user;

// Re-export common error type
pub use error::{QuipError, Result};
