//! The process-wide bearer token holder.

use std::sync::Arc;

use payloads::{APIClient, BearerToken, TokenSource, requests};
use tokio::sync::watch;

use crate::{KeyValueStorage, SyncError, forms};

/// Storage key the token is persisted under.
pub const TOKEN_KEY: &str = "token";

/// Holds the current bearer token and tells subscribers when it changes.
///
/// Cloning is cheap and every clone shares the same token. Presence of a
/// token is the only thing checked client side; the server decides what
/// the token may do.
#[derive(Clone)]
pub struct AuthStore {
    storage: Arc<dyn KeyValueStorage>,
    token: Arc<watch::Sender<Option<BearerToken>>>,
}

impl AuthStore {
    /// A store with no token, persisting into `storage`.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let (token, _) = watch::channel(None);
        Self {
            storage,
            token: Arc::new(token),
        }
    }

    /// Build a store and load any token persisted by a previous session.
    /// A storage failure is logged and treated as "no token".
    pub fn restore(storage: Arc<dyn KeyValueStorage>) -> Self {
        let store = Self::new(storage);
        match store.storage.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => {
                tracing::debug!("restored persisted session");
                store.token.send_replace(Some(BearerToken::new(token)));
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("could not read persisted token: {e}"),
        }
        store
    }

    pub fn get(&self) -> Option<BearerToken> {
        self.token.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.borrow().is_some()
    }

    /// Persist and publish a new token.
    pub fn login(&self, token: BearerToken) {
        if let Err(e) = self.storage.set(TOKEN_KEY, token.expose()) {
            tracing::warn!("could not persist token: {e}");
        }
        self.token.send_replace(Some(token));
        tracing::info!("logged in");
    }

    /// Drop the token from memory and storage.
    pub fn logout(&self) {
        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            tracing::warn!("could not remove persisted token: {e}");
        }
        self.token.send_replace(None);
        tracing::info!("logged out");
    }

    /// A receiver that observes every later login and logout.
    pub fn subscribe(&self) -> watch::Receiver<Option<BearerToken>> {
        self.token.subscribe()
    }
}

impl TokenSource for AuthStore {
    fn bearer_token(&self) -> Option<BearerToken> {
        self.get()
    }
}

/// Log in with email and password.
///
/// On any refusal the store is left untouched and the error is
/// [`payloads::ClientError::InvalidCredentials`].
pub async fn login_with_credentials(
    client: &APIClient,
    store: &AuthStore,
    credentials: &requests::LoginCredentials,
) -> Result<(), SyncError> {
    forms::validate_login(credentials).map_err(SyncError::Validation)?;
    let token = client.login(credentials).await?;
    store.login(token);
    Ok(())
}
