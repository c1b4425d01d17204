//! Persisted session storage and route tracking.
//!
//! The token lives in a small key/value store under [`TOKEN_KEY`]. When the API rejects
//! the token, the session clears it and moves the current route to [`SIGNIN_PATH`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::errors::ClientError;

/// Storage key the bearer token is persisted under.
pub const TOKEN_KEY: &str = "token";

/// Route shown once the session is no longer valid.
pub const SIGNIN_PATH: &str = "/admin/signin";

/// Route shown after a successful sign-in.
pub const HOME_PATH: &str = "/admin";

/// Key/value persistence for session data.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;
    fn remove(&self, key: &str) -> Result<(), ClientError>;
}

/// JSON file backed store. Other keys in the file are preserved.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, ClientError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>, ClientError> {
        self.lock
            .lock()
            .map_err(|_| ClientError::Storage("Storage lock poisoned".to_string()))
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        let _guard = self.guard()?;
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let _guard = self.guard()?;
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        let _guard = self.guard()?;
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// In-memory store, used by tests and one-shot commands.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, ClientError> {
        self.entries
            .lock()
            .map_err(|_| ClientError::Storage("Storage lock poisoned".to_string()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

/// Shared session handle: token persistence plus the current console route.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
    route: Arc<watch::Sender<String>>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let (route, _) = watch::channel(HOME_PATH.to_string());
        Self {
            store,
            route: Arc::new(route),
        }
    }

    /// Session backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    /// Current bearer token, if any. Storage failures read as "no token".
    pub fn token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read session token: {}", e);
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Persist a freshly issued token and return to the console home.
    pub fn sign_in(&self, token: &str) -> Result<(), ClientError> {
        self.store.set(TOKEN_KEY, token)?;
        self.navigate(HOME_PATH);
        Ok(())
    }

    /// Drop the token and route to the sign-in screen.
    pub fn sign_out(&self) -> Result<(), ClientError> {
        let result = self.store.remove(TOKEN_KEY);
        self.navigate(SIGNIN_PATH);
        result
    }

    /// Called on any 401 response, whichever slice issued the request.
    pub fn expire(&self) {
        tracing::warn!("Session rejected by API; redirecting to {}", SIGNIN_PATH);
        if let Err(e) = self.sign_out() {
            tracing::error!("Failed to clear session token: {}", e);
        }
    }

    pub fn navigate(&self, path: &str) {
        self.route.send_replace(path.to_string());
    }

    pub fn current_route(&self) -> String {
        self.route.borrow().clone()
    }

    /// Watch route changes, e.g. to react to forced sign-outs.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.route.subscribe()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("route", &self.current_route())
            .finish()
    }
}
