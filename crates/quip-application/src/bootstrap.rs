//! Composition root.
//!
//! Builds the session and collection stores once, wires the sign-out hook
//! between them, restores both from durable storage, and hands them out as
//! `Arc`s. Nothing else constructs stores.

use std::sync::Arc;

use anyhow::{Context, Result};
use quip_core::config::{QuipConfig, StorageBackend, StorageConfig};
use quip_core::id::{IdGenerator, UuidIdGenerator};
use quip_core::share::ShareTarget;
use quip_core::storage::KeyValueStore;
use quip_core::user::Authenticator;
use quip_infrastructure::{
    ConfigStorage, InMemoryKeyValueStore, JsonFileKeyValueStore, MemoryShareTarget,
    MockAuthenticator, QuipPaths,
};

use crate::collection_store::{CollectionStore, GenerationOptions};
use crate::session_store::SessionStore;
use crate::share_router::ShareRouter;

/// Collaborators the stores are built from.
pub struct ServiceParts {
    pub storage: Arc<dyn KeyValueStore>,
    pub authenticator: Arc<dyn Authenticator>,
    pub ids: Arc<dyn IdGenerator>,
    pub native_share: Arc<dyn ShareTarget>,
    pub clipboard: Arc<dyn ShareTarget>,
}

impl ServiceParts {
    /// Parts for a process without a share sheet or system clipboard: mock
    /// authentication, UUID ids, and an in-memory clipboard.
    pub fn headless(storage: Arc<dyn KeyValueStore>) -> Self {
        let ids: Arc<dyn IdGenerator> = Arc::new(UuidIdGenerator);
        Self {
            storage,
            authenticator: Arc::new(MockAuthenticator::with_id_generator(ids.clone())),
            ids,
            native_share: Arc::new(MemoryShareTarget::unavailable()),
            clipboard: Arc::new(MemoryShareTarget::new()),
        }
    }
}

/// The application's two stores.
pub struct QuipServices {
    pub config: QuipConfig,
    pub session: Arc<SessionStore>,
    pub collection: Arc<CollectionStore>,
}

impl QuipServices {
    /// Loads `config.toml` from `paths` and bootstraps from it.
    ///
    /// A missing config file means defaults.
    pub async fn open(paths: &QuipPaths) -> Result<Self> {
        let storage = ConfigStorage::from_paths(paths).context("Failed to resolve config path")?;
        let config = storage
            .load()
            .with_context(|| format!("Failed to load config from {:?}", storage.path()))?;
        Self::bootstrap(config, paths).await
    }

    /// Opens the configured storage backend and builds headless services.
    pub async fn bootstrap(config: QuipConfig, paths: &QuipPaths) -> Result<Self> {
        let storage = open_key_value_store(&config.storage, paths)?;
        Ok(Self::from_parts(config, ServiceParts::headless(storage)).await)
    }

    /// Builds and restores the stores from explicit parts.
    ///
    /// Both stores have finished restoring when this returns, so the session
    /// is no longer loading.
    pub async fn from_parts(config: QuipConfig, parts: ServiceParts) -> Self {
        let session = Arc::new(SessionStore::new(
            parts.storage.clone(),
            parts.authenticator,
            config.timing.sign_in_delay(),
        ));

        let collection = Arc::new(CollectionStore::new(
            parts.storage,
            parts.ids,
            ShareRouter::new(parts.native_share, parts.clipboard),
            GenerationOptions {
                latency: config.timing.generation_delay(),
                fallback: config.topics.fallback,
            },
        ));

        session.add_sign_out_listener(collection.clone()).await;

        session.restore().await;
        collection.restore().await;

        tracing::info!(
            authenticated = session.is_authenticated(),
            saved_jokes = collection.saved_jokes().len(),
            "[Bootstrap] Services ready"
        );

        Self {
            config,
            session,
            collection,
        }
    }
}

/// Creates the key-value store selected by `config`.
pub fn open_key_value_store(
    config: &StorageConfig,
    paths: &QuipPaths,
) -> Result<Arc<dyn KeyValueStore>> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::info!("[Bootstrap] Using in-memory storage");
            Ok(Arc::new(InMemoryKeyValueStore::new()))
        }
        StorageBackend::File => {
            let dir = match &config.dir {
                Some(dir) => dir.clone(),
                None => paths
                    .storage_dir()
                    .context("Failed to resolve storage directory")?,
            };
            tracing::info!("[Bootstrap] Using file storage at: {:?}", dir);
            Ok(Arc::new(JsonFileKeyValueStore::with_dir(dir)))
        }
    }
}
