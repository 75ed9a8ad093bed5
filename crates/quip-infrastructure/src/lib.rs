//! Infrastructure layer for quip.
//!
//! Concrete storage, configuration, logging and platform adapters for the
//! traits defined in `quip-core`.

pub mod config_storage;
pub mod file_store;
pub mod logging;
pub mod memory_store;
pub mod mock_authenticator;
pub mod paths;
pub mod share_target;

pub use crate::config_storage::ConfigStorage;
pub use crate::file_store::JsonFileKeyValueStore;
pub use crate::memory_store::InMemoryKeyValueStore;
pub use crate::mock_authenticator::MockAuthenticator;
pub use crate::paths::QuipPaths;
pub use crate::share_target::MemoryShareTarget;
