//! Application layer for quip.
//!
//! The session and collection stores, the share router, and the composition
//! root that builds them. Views hold `Arc`s from [`QuipServices`], call the
//! store operations and re-render from the `watch` receivers the stores hand
//! out.

pub mod bootstrap;
pub mod collection_store;
mod in_flight;
pub mod session_store;
pub mod share_router;

pub use bootstrap::{QuipServices, ServiceParts};
pub use collection_store::{CollectionState, CollectionStore, GenerationOptions};
pub use session_store::{SessionState, SessionStore};
pub use share_router::ShareRouter;
