//! Session store: who is signed in.
//!
//! The store is the only mutator of the current [`Identity`]. Every change is
//! mirrored to the `user` storage key and published on a `watch` channel so
//! views can re-render from [`SessionStore::subscribe`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use quip_core::error::QuipError;
use quip_core::storage::{KeyValueStore, SAVED_JOKES_KEY, USER_KEY, load_json, save_json};
use quip_core::user::{Authenticator, Identity, SignOutListener};
use tokio::sync::{Mutex, RwLock, watch};

use crate::in_flight::InFlight;

/// Snapshot of the session published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub identity: Option<Identity>,
    /// True until the startup restore finishes, and while a sign-in or
    /// sign-up call is outstanding
    pub is_loading: bool,
    /// Last persistence failure, cleared by the next successful write
    pub storage_error: Option<String>,
}

impl SessionState {
    fn starting() -> Self {
        Self {
            identity: None,
            is_loading: true,
            storage_error: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// Owns the authenticated identity.
///
/// State machine: anonymous ⇄ authenticated. `sign_in` / `sign_up` move to
/// authenticated, `sign_out` moves back. The initial state comes from
/// [`restore`](Self::restore).
///
/// A sign-out while a sign-in or sign-up is still pending wins: the pending
/// call returns `false` and the session stays anonymous.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    authenticator: Arc<dyn Authenticator>,
    /// Simulated round-trip of the remote auth call
    latency: Duration,
    state: watch::Sender<SessionState>,
    auth_in_flight: AtomicBool,
    /// Bumped by every sign-out
    epoch: AtomicU64,
    /// Orders durable `user` writes against sign-out erasure
    durable: Mutex<()>,
    sign_out_listeners: RwLock<Vec<Arc<dyn SignOutListener>>>,
}

impl SessionStore {
    /// Creates a store in the loading state. Call [`restore`](Self::restore)
    /// before showing any view.
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        authenticator: Arc<dyn Authenticator>,
        latency: Duration,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::starting());
        Self {
            storage,
            authenticator,
            latency,
            state,
            auth_in_flight: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
            durable: Mutex::new(()),
            sign_out_listeners: RwLock::new(Vec::new()),
        }
    }

    /// Loads a previously persisted identity.
    ///
    /// An unreadable or corrupt value is reported through `storage_error`
    /// and the session starts anonymous.
    pub async fn restore(&self) {
        let loaded = load_json::<Identity>(self.storage.as_ref(), USER_KEY).await;
        match loaded {
            Ok(identity) => {
                if let Some(identity) = &identity {
                    tracing::info!(user_id = %identity.id, "Restored session");
                }
                self.state.send_modify(|state| {
                    state.identity = identity;
                    state.is_loading = false;
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to restore session, starting signed out");
                self.state.send_modify(|state| {
                    state.is_loading = false;
                    state.storage_error = Some(e.to_string());
                });
            }
        }
    }

    /// Registers a hook that runs after every sign-out.
    pub async fn add_sign_out_listener(&self, listener: Arc<dyn SignOutListener>) {
        self.sign_out_listeners.write().await.push(listener);
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.state.borrow().identity.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    /// Signs in with email and password.
    ///
    /// Returns `false` when the authenticator rejects the credentials,
    /// another sign-in / sign-up is still running, or a sign-out lands first.
    /// The current session is left untouched in each case. Empty fields are the caller's concern
    /// (see [`SignInRequest`](quip_core::user::SignInRequest)).
    pub async fn sign_in(&self, email: &str, password: &str) -> bool {
        let Some(_guard) = self.begin_auth() else {
            tracing::warn!(error = %QuipError::AuthInProgress, "Sign-in rejected");
            return false;
        };
        let epoch = self.epoch.load(Ordering::Acquire);

        tokio::time::sleep(self.latency).await;

        match self.authenticator.sign_in(email, password).await {
            Ok(identity) => self.establish(identity, epoch).await,
            Err(e) => {
                tracing::warn!(error = %e, "Sign-in failed");
                false
            }
        }
    }

    /// Creates an account and signs it in.
    ///
    /// Same contract as [`sign_in`](Self::sign_in).
    pub async fn sign_up(&self, email: &str, password: &str, name: &str) -> bool {
        let Some(_guard) = self.begin_auth() else {
            tracing::warn!(error = %QuipError::AuthInProgress, "Sign-up rejected");
            return false;
        };
        let epoch = self.epoch.load(Ordering::Acquire);

        tokio::time::sleep(self.latency).await;

        match self.authenticator.sign_up(email, password, name).await {
            Ok(identity) => self.establish(identity, epoch).await,
            Err(e) => {
                tracing::warn!(error = %e, "Sign-up failed");
                false
            }
        }
    }

    /// Signs out.
    ///
    /// Clears the identity, erases the durable `user` and `savedJokes`
    /// values, then runs every registered [`SignOutListener`]. Storage
    /// failures are reported through `storage_error`; the in-memory sign-out
    /// always happens.
    pub async fn sign_out(&self) {
        let durable = self.durable.lock().await;
        self.epoch.fetch_add(1, Ordering::AcqRel);

        let previous = self.state.borrow().identity.as_ref().map(|i| i.id.clone());
        self.state.send_modify(|state| state.identity = None);

        let mut failure = None;
        for key in [USER_KEY, SAVED_JOKES_KEY] {
            if let Err(e) = self.storage.delete(key).await {
                tracing::warn!(key, error = %e, "Failed to erase durable value on sign-out");
                failure = Some(e.to_string());
            }
        }
        self.state.send_modify(|state| state.storage_error = failure);
        drop(durable);

        let listeners = self.sign_out_listeners.read().await.clone();
        for listener in listeners {
            listener.on_signed_out().await;
        }

        tracing::info!(user_id = ?previous, "Signed out");
    }

    fn begin_auth(&self) -> Option<InFlight<'_, SessionState>> {
        InFlight::try_begin(
            &self.auth_in_flight,
            &self.state,
            |state| state.is_loading = true,
            |state| state.is_loading = false,
        )
    }

    /// Publishes `identity` and mirrors it to storage, unless a sign-out
    /// happened since `epoch` was read.
    async fn establish(&self, identity: Identity, epoch: u64) -> bool {
        let _durable = self.durable.lock().await;
        if self.epoch.load(Ordering::Acquire) != epoch {
            tracing::info!(user_id = %identity.id, "Signed out while authenticating; discarding");
            return false;
        }

        let persisted = save_json(self.storage.as_ref(), USER_KEY, &identity).await;
        if let Err(e) = &persisted {
            tracing::warn!(error = %e, "Failed to persist session; keeping it in memory");
        }

        tracing::info!(user_id = %identity.id, email = %identity.email, "Signed in");
        self.state.send_modify(|state| {
            state.identity = Some(identity);
            state.storage_error = persisted.err().map(|e| e.to_string());
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quip_core::error::Result;
    use quip_infrastructure::{InMemoryKeyValueStore, MockAuthenticator};
    use std::sync::atomic::AtomicUsize;

    fn store_with(storage: &InMemoryKeyValueStore) -> SessionStore {
        SessionStore::new(
            Arc::new(storage.clone()),
            Arc::new(MockAuthenticator::new()),
            Duration::ZERO,
        )
    }

    struct RejectingAuthenticator;

    #[async_trait]
    impl Authenticator for RejectingAuthenticator {
        async fn sign_in(&self, _email: &str, _password: &str) -> Result<Identity> {
            Err(QuipError::security("bad credentials"))
        }

        async fn sign_up(&self, _email: &str, _password: &str, _name: &str) -> Result<Identity> {
            Err(QuipError::security("registration closed"))
        }
    }

    #[derive(Default)]
    struct CountingListener(AtomicUsize);

    #[async_trait]
    impl SignOutListener for CountingListener {
        async fn on_signed_out(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_starts_loading_until_restored() {
        let storage = InMemoryKeyValueStore::new();
        let store = store_with(&storage);

        assert!(store.is_loading());
        store.restore().await;
        assert!(!store.is_loading());
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_sign_in_derives_name_from_email() {
        let storage = InMemoryKeyValueStore::new();
        let store = store_with(&storage);
        store.restore().await;

        assert!(store.sign_in("alice@example.com", "x").await);

        let identity = store.current_identity().unwrap();
        assert_eq!(identity, Identity::new("1", "alice@example.com", "alice"));
        assert!(store.is_authenticated());
        assert!(!store.is_loading());

        let persisted: Identity = load_json(&storage, USER_KEY).await.unwrap().unwrap();
        assert_eq!(persisted, identity);
    }

    #[tokio::test]
    async fn test_sign_up_uses_given_name() {
        let storage = InMemoryKeyValueStore::new();
        let store = store_with(&storage);
        store.restore().await;

        assert!(store.sign_up("bob@example.com", "pw", "Bobby").await);

        let identity = store.current_identity().unwrap();
        assert_eq!(identity.name, "Bobby");
        assert_eq!(identity.email, "bob@example.com");
        assert!(!identity.id.is_empty());
        assert_ne!(identity.id, "1");
    }

    #[tokio::test]
    async fn test_restore_brings_back_identity() {
        let storage = InMemoryKeyValueStore::new();
        let first = store_with(&storage);
        first.restore().await;
        first.sign_in("carol@example.com", "pw").await;

        let second = store_with(&storage);
        second.restore().await;
        assert_eq!(second.current_identity(), first.current_identity());
    }

    #[tokio::test]
    async fn test_restore_with_corrupt_value_starts_anonymous() {
        let storage = InMemoryKeyValueStore::new();
        storage.set(USER_KEY, "not json".to_string()).await.unwrap();

        let store = store_with(&storage);
        store.restore().await;

        let state = store.state();
        assert!(state.identity.is_none());
        assert!(!state.is_loading);
        assert!(state.storage_error.is_some());
    }

    #[tokio::test]
    async fn test_rejected_sign_in_keeps_state() {
        let storage = InMemoryKeyValueStore::new();
        let store = SessionStore::new(
            Arc::new(storage.clone()),
            Arc::new(RejectingAuthenticator),
            Duration::ZERO,
        );
        store.restore().await;

        assert!(!store.sign_in("eve@example.com", "wrong").await);
        assert!(!store.sign_up("eve@example.com", "pw", "Eve").await);
        assert!(!store.is_authenticated());
        assert!(!store.is_loading());
        assert!(!storage.contains_key(USER_KEY).await);
    }

    #[tokio::test]
    async fn test_sign_out_erases_both_keys_and_notifies() {
        let storage = InMemoryKeyValueStore::new();
        storage
            .set(SAVED_JOKES_KEY, "[]".to_string())
            .await
            .unwrap();
        let store = store_with(&storage);
        store.restore().await;
        store.sign_in("alice@example.com", "x").await;

        let listener = Arc::new(CountingListener::default());
        store.add_sign_out_listener(listener.clone()).await;

        store.sign_out().await;

        assert!(store.current_identity().is_none());
        assert!(!storage.contains_key(USER_KEY).await);
        assert!(!storage.contains_key(SAVED_JOKES_KEY).await);
        assert_eq!(listener.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let storage = InMemoryKeyValueStore::new();
        let store = store_with(&storage);
        let mut rx = store.subscribe();
        store.restore().await;

        store.sign_in("dave@example.com", "pw").await;
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_authenticated());

        store.sign_out().await;
        assert!(!rx.borrow_and_update().is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_sign_in_is_rejected() {
        let storage = InMemoryKeyValueStore::new();
        let store = Arc::new(SessionStore::new(
            Arc::new(storage.clone()),
            Arc::new(MockAuthenticator::new()),
            Duration::from_millis(1000),
        ));
        store.restore().await;

        let first = tokio::spawn({
            let store = store.clone();
            async move { store.sign_in("first@example.com", "pw").await }
        });
        tokio::task::yield_now().await;
        assert!(store.is_loading());

        assert!(!store.sign_in("second@example.com", "pw").await);
        assert!(first.await.unwrap());
        assert_eq!(store.current_identity().unwrap().email, "first@example.com");
        assert!(!store.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_out_wins_over_pending_sign_in() {
        let storage = InMemoryKeyValueStore::new();
        let store = Arc::new(SessionStore::new(
            Arc::new(storage.clone()),
            Arc::new(MockAuthenticator::new()),
            Duration::from_millis(1000),
        ));
        store.restore().await;

        let pending = tokio::spawn({
            let store = store.clone();
            async move { store.sign_in("late@example.com", "pw").await }
        });
        tokio::task::yield_now().await;
        assert!(store.is_loading());

        store.sign_out().await;

        assert!(!pending.await.unwrap());
        assert!(!store.is_authenticated());
        assert!(!store.is_loading());
        assert!(!storage.contains_key(USER_KEY).await);

        // later sign-ins are unaffected
        assert!(store.sign_in("late@example.com", "pw").await);
        assert!(store.is_authenticated());
    }
}
