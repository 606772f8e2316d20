//! `window.localStorage` as a cache backend.

use retryable::{Storage, StorageError};
use web_sys::window;

/// Handle to the page's local storage. Holds no state; every call looks the
/// storage up again, so it is unaffected by the page being unable to reach
/// it at construction time.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage(&self) -> Result<web_sys::Storage, StorageError> {
        match window().map(|w| w.local_storage()) {
            Some(Ok(Some(storage))) => Ok(storage),
            _ => Err(StorageError::Unavailable),
        }
    }
}

impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StorageError::Read {
                key: key.to_string(),
                reason: format!("{e:?}"),
            })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // throws when the quota is exceeded
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                reason: format!("{e:?}"),
            })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                reason: format!("{e:?}"),
            })
    }
}
