//! Token lifecycle for the admin session.
//!
//! `AuthContext` is created once per process and handed to the envelope client;
//! nothing reads auth state from a global.

use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use models::models::auth::TokenPair;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid token file: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
    /// A refresh failed; the user has to log in again.
    ReauthRequired,
}

/// Persisted home of the token pair between runs.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Result<Option<TokenPair>, TokenStoreError>;
    async fn save(&self, tokens: &TokenPair) -> Result<(), TokenStoreError>;
    async fn clear(&self) -> Result<(), TokenStoreError>;
}

/// Stores the pair as JSON in a single file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Self {
        Self::new(utils::assets::token_file_path())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<TokenPair>, TokenStoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_vec_pretty(tokens)?).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps the pair in memory only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Option<TokenPair>>,
}

impl MemoryTokenStore {
    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            tokens: RwLock::new(Some(tokens)),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<TokenPair>, TokenStoreError> {
        Ok(self.tokens.read().await.clone())
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), TokenStoreError> {
        *self.tokens.write().await = Some(tokens.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        *self.tokens.write().await = None;
        Ok(())
    }
}

struct SessionTokens {
    access: SecretString,
    refresh: SecretString,
}

impl From<&TokenPair> for SessionTokens {
    fn from(pair: &TokenPair) -> Self {
        Self {
            access: SecretString::from(pair.access_token.clone()),
            refresh: SecretString::from(pair.refresh_token.clone()),
        }
    }
}

pub struct AuthContext {
    tokens: RwLock<Option<SessionTokens>>,
    store: Arc<dyn TokenStore>,
    state: watch::Sender<SessionState>,
    // Bumped on every token change so a waiter can tell a refresh already happened.
    generation: AtomicU64,
}

impl AuthContext {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(SessionState::Anonymous);
        Self {
            tokens: RwLock::new(None),
            store,
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Restores the session from the token store.
    pub async fn init(&self) -> Result<SessionState, TokenStoreError> {
        let restored = self.store.load().await?;
        let state = match &restored {
            Some(_) => SessionState::Authenticated,
            None => SessionState::Anonymous,
        };
        *self.tokens.write().await = restored.as_ref().map(SessionTokens::from);
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(state);
        debug!(?state, "auth context initialized");
        Ok(state)
    }

    pub async fn set_tokens(&self, tokens: &TokenPair) -> Result<(), TokenStoreError> {
        *self.tokens.write().await = Some(SessionTokens::from(tokens));
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(SessionState::Authenticated);
        self.store.save(tokens).await
    }

    /// Clears the session on logout.
    pub async fn teardown(&self) -> Result<(), TokenStoreError> {
        self.clear_tokens().await;
        self.state.send_replace(SessionState::Anonymous);
        info!("session cleared");
        self.store.clear().await
    }

    /// Clears the session after a failed refresh and asks for a new login.
    pub async fn expire(&self) {
        self.clear_tokens().await;
        self.state.send_replace(SessionState::ReauthRequired);
        warn!("session expired, re-authentication required");
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "failed to clear persisted tokens");
        }
    }

    async fn clear_tokens(&self) {
        *self.tokens.write().await = None;
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub async fn access_token(&self) -> Option<String> {
        self.tokens
            .read()
            .await
            .as_ref()
            .map(|t| t.access.expose_secret().to_string())
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.tokens
            .read()
            .await
            .as_ref()
            .map(|t| t.refresh.expose_secret().to_string())
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}
