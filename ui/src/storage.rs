//! `localStorage` behind the client-sync storage trait.

use client_sync::{KeyValueStorage, StorageError};

/// Looks the storage object up on every call; browsers may refuse access
/// (private mode, disabled cookies) and that shows up as an error rather
/// than a panic.
pub struct BrowserStorage;

impl BrowserStorage {
    fn local_storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".into()))?
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| {
                StorageError::Unavailable("localStorage disabled".into())
            })
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::local_storage()?
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::local_storage()?.set_item(key, value).map_err(|e| {
            StorageError::Write {
                key: key.to_string(),
                reason: format!("{e:?}"),
            }
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::local_storage()?.remove_item(key).map_err(|e| {
            StorageError::Write {
                key: key.to_string(),
                reason: format!("{e:?}"),
            }
        })
    }
}
