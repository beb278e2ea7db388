//! Persistent key-value storage for the dashboard
//!
//! Values are postcard-encoded into a single fjall keyspace. All disk work
//! runs on the blocking pool.

use std::fmt::Debug;
use std::path::Path;

use fjall::Keyspace;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::task;
use tracing::{debug, info};

use crate::{DashboardError, Result};

/// Key under which the saved-location list is stored
pub const SAVED_LOCATIONS_KEY: &str = "savedLocations";

fn storage_error(context: &str, err: impl std::fmt::Display) -> DashboardError {
    DashboardError::storage(format!("{context}: {err}"))
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> Result<Option<Vec<u8>>> {
    Ok(store
        .get(key)
        .map_err(|e| storage_error("read failed", e))?
        .map(|v| v.to_vec()))
}

/// Local key-value store
#[derive(Clone)]
pub struct LocalStore {
    store: Keyspace,
}

impl LocalStore {
    /// Open (or create) the store in `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(&path)
            .open()
            .map_err(|e| storage_error("cannot open store", e))?;
        let items = db
            .keyspace("dashboard", fjall::KeyspaceCreateOptions::default)
            .map_err(|e| storage_error("cannot open keyspace", e))?;
        info!("Opened local store at {}", path.as_ref().display());
        Ok(Self { store: items })
    }

    #[tracing::instrument(name = "put_store", level = "debug", skip(self))]
    pub async fn put<T: Serialize + Send + Debug + 'static>(
        &self,
        key: &str,
        value: T,
    ) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        let bytes = postcard::to_stdvec(&value).map_err(|e| storage_error("encode failed", e))?;

        task::spawn_blocking(move || store.insert(key, bytes))
            .await
            .map_err(|e| storage_error("write task failed", e))?
            .map_err(|e| storage_error("write failed", e))?;
        Ok(())
    }

    /// `None` when the key was never written
    #[tracing::instrument(name = "query_store", level = "debug", skip(self))]
    pub async fn get<T: DeserializeOwned + Send + 'static>(&self, key: &str) -> Result<Option<T>> {
        let store = self.store.clone();
        let key_bytes = key.as_bytes().to_vec();

        let maybe_bytes = task::spawn_blocking(move || get_from_store(store, key_bytes))
            .await
            .map_err(|e| storage_error("read task failed", e))??;

        match maybe_bytes {
            Some(bytes) => {
                let value = postcard::from_bytes(&bytes)
                    .map_err(|e| storage_error("decode failed", e))?;
                Ok(Some(value))
            }
            None => {
                debug!("Key not found");
                Ok(None)
            }
        }
    }
}

/// Ordered, duplicate-free list of saved location names
pub struct SavedLocations {
    store: LocalStore,
    // serializes read-modify-write of the list
    write_lock: Mutex<()>,
}

impl SavedLocations {
    #[must_use]
    pub fn new(store: LocalStore) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Names in the order they were first saved
    pub async fn load(&self) -> Result<Vec<String>> {
        Ok(self
            .store
            .get::<Vec<String>>(SAVED_LOCATIONS_KEY)
            .await?
            .unwrap_or_default())
    }

    /// Add `name` unless already present; true when the list changed
    pub async fn add(&self, name: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let mut names = self.load().await?;
        if names.iter().any(|saved| saved == name) {
            debug!("Location '{}' already saved", name);
            return Ok(false);
        }

        names.push(name.to_string());
        self.store.put(SAVED_LOCATIONS_KEY, names).await?;
        info!("Saved location '{}'", name);
        Ok(true)
    }
}
