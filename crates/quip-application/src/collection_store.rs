//! Collection store: the current joke and the saved collection.
//!
//! The saved collection is mirrored in full to the `savedJokes` storage key
//! after every change. The current joke is transient and never persisted.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use quip_core::error::{QuipError, Result};
use quip_core::id::IdGenerator;
use quip_core::joke::{CollectionStats, DEFAULT_TOPIC, FallbackPolicy, Joke};
use quip_core::share::{ShareChannel, ShareMessage};
use quip_core::storage::{KeyValueStore, SAVED_JOKES_KEY, load_json, save_json};
use quip_core::user::SignOutListener;
use tokio::sync::{Mutex, watch};

use crate::in_flight::InFlight;
use crate::share_router::ShareRouter;

/// Snapshot of the collection published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollectionState {
    /// Most recently generated joke
    pub current: Option<Joke>,
    /// Saved jokes in save order
    pub saved: Vec<Joke>,
    /// True while a generate call is outstanding
    pub is_loading: bool,
    /// Last persistence failure, cleared by the next successful write
    pub storage_error: Option<String>,
}

/// Generation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerationOptions {
    /// Simulated processing time before a joke is returned
    pub latency: Duration,
    pub fallback: FallbackPolicy,
}

/// Owns the current joke and the saved collection.
pub struct CollectionStore {
    storage: Arc<dyn KeyValueStore>,
    ids: Arc<dyn IdGenerator>,
    share: ShareRouter,
    options: GenerationOptions,
    state: watch::Sender<CollectionState>,
    generating: AtomicBool,
    /// Held across snapshot and write so the last write carries the latest
    /// collection
    persisting: Mutex<()>,
}

impl CollectionStore {
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        ids: Arc<dyn IdGenerator>,
        share: ShareRouter,
        options: GenerationOptions,
    ) -> Self {
        let (state, _) = watch::channel(CollectionState::default());
        Self {
            storage,
            ids,
            share,
            options,
            state,
            generating: AtomicBool::new(false),
            persisting: Mutex::new(()),
        }
    }

    /// Loads the persisted collection into memory.
    ///
    /// A corrupt value is reported through `storage_error` and the collection
    /// starts empty; the stored value is left as it is until the next save.
    pub async fn restore(&self) {
        match load_json::<Vec<Joke>>(self.storage.as_ref(), SAVED_JOKES_KEY).await {
            Ok(saved) => {
                let saved = saved.unwrap_or_default();
                tracing::info!(count = saved.len(), "Restored saved jokes");
                self.state.send_modify(|state| state.saved = saved);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to restore saved jokes, starting empty");
                self.state.send_modify(|state| state.storage_error = Some(e.to_string()));
            }
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CollectionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> CollectionState {
        self.state.borrow().clone()
    }

    pub fn current(&self) -> Option<Joke> {
        self.state.borrow().current.clone()
    }

    pub fn saved_jokes(&self) -> Vec<Joke> {
        self.state.borrow().saved.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    /// Whether a joke with this id is in the saved collection.
    ///
    /// `save` does not deduplicate; callers check this first.
    pub fn contains(&self, joke_id: &str) -> bool {
        self.state.borrow().saved.iter().any(|joke| joke.id == joke_id)
    }

    pub fn stats(&self) -> CollectionStats {
        CollectionStats::from_jokes(&self.state.borrow().saved)
    }

    /// [`generate`](Self::generate) with the general topic.
    pub async fn generate_default(&self) -> Result<Joke> {
        self.generate(DEFAULT_TOPIC).await
    }

    /// Produces a new current joke for `topic`.
    ///
    /// The lookup is case-insensitive; the returned joke keeps `topic` as
    /// given. Unknown topics follow the configured [`FallbackPolicy`].
    ///
    /// # Errors
    ///
    /// - `GenerationInProgress` if another call has not finished yet
    /// - `UnknownTopic` under the strict fallback policy
    pub async fn generate(&self, topic: &str) -> Result<Joke> {
        let Some(_guard) = InFlight::try_begin(
            &self.generating,
            &self.state,
            |state| state.is_loading = true,
            |state| state.is_loading = false,
        ) else {
            return Err(QuipError::GenerationInProgress);
        };

        let resolution = self.options.fallback.resolve(topic)?;
        if resolution.fell_back {
            tracing::debug!(topic, "Unknown topic, serving general jokes");
        }

        tokio::time::sleep(self.options.latency).await;

        let template = {
            let mut rng = rand::thread_rng();
            resolution.topic.pick(&mut rng)?
        };
        let joke = Joke::new(
            self.ids.next_id(),
            template.setup,
            template.punchline,
            topic,
        );

        tracing::debug!(joke_id = %joke.id, topic, "Generated joke");
        let current = joke.clone();
        self.state.send_modify(|state| state.current = Some(current));
        Ok(joke)
    }

    /// Appends a saved copy of `joke` to the collection and persists it.
    ///
    /// No duplicate check: saving the same joke twice stores it twice. If
    /// `joke` is the current joke, the current joke is replaced by the saved
    /// copy. Returns the saved copy.
    pub async fn save(&self, joke: &Joke) -> Joke {
        let saved = joke.saved(Utc::now());

        let entry = saved.clone();
        self.state.send_modify(|state| {
            state.saved.push(entry.clone());
            if state.current.as_ref().is_some_and(|current| current.id == entry.id) {
                state.current = Some(entry);
            }
        });

        tracing::info!(joke_id = %saved.id, "Saved joke");
        self.persist().await;
        saved
    }

    /// Removes every saved joke with `joke_id` and persists the result.
    ///
    /// An unknown id leaves the collection unchanged. Returns whether
    /// anything was removed.
    pub async fn remove(&self, joke_id: &str) -> bool {
        let mut removed = false;
        self.state.send_modify(|state| {
            let before = state.saved.len();
            state.saved.retain(|joke| joke.id != joke_id);
            removed = state.saved.len() != before;
        });

        if removed {
            tracing::info!(joke_id, "Removed saved joke");
        }
        self.persist().await;
        removed
    }

    /// Shares `joke` as `setup`, blank line, `punchline`, blank line, tag.
    pub async fn share(&self, joke: &Joke) -> Result<ShareChannel> {
        let message = ShareMessage::for_joke(joke);
        let channel = self.share.route(&message).await?;
        tracing::debug!(joke_id = %joke.id, ?channel, "Shared joke");
        Ok(channel)
    }

    /// Drops the current joke and the in-memory collection.
    ///
    /// The durable copy is not touched.
    pub fn clear_local_state(&self) {
        self.state.send_modify(|state| {
            state.current = None;
            state.saved.clear();
        });
    }

    /// Mirrors the in-memory collection to storage. Failures are reported
    /// through `storage_error` and do not roll back memory.
    async fn persist(&self) {
        let _persisting = self.persisting.lock().await;
        let saved = self.state.borrow().saved.clone();
        let result = save_json(self.storage.as_ref(), SAVED_JOKES_KEY, &saved).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Failed to persist saved jokes; keeping them in memory");
        }
        self.state.send_modify(|state| state.storage_error = result.err().map(|e| e.to_string()));
    }
}

#[async_trait]
impl SignOutListener for CollectionStore {
    async fn on_signed_out(&self) {
        self.clear_local_state();
        tracing::debug!("Cleared collection after sign-out");
    }
}
