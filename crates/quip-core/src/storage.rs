//! Durable key-value storage trait.
//!
//! Values are opaque strings; the stores put JSON in them. There are no
//! transactions and no size limits at this layer.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::Result;

/// Storage key holding the serialized [`Identity`](crate::user::Identity).
pub const USER_KEY: &str = "user";

/// Storage key holding the serialized saved collection.
pub const SAVED_JOKES_KEY: &str = "savedJokes";

/// String-keyed blob store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value for `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Reads and deserializes a JSON value.
pub async fn load_json<T>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    match store.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serializes a value to JSON and stores it.
pub async fn save_json<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()>
where
    T: Serialize + Sync + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, raw).await
}
