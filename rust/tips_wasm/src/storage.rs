//! Hidden set persisted in `window.localStorage`.

use gloo::storage::errors::StorageError;
use gloo::storage::{LocalStorage, Storage};
use tips_core::{EntryKey, HiddenSet, HiddenStore, Result, ViewerError};

#[derive(Debug, Clone)]
pub struct LocalStorageHiddenStore {
    key: String,
}

impl LocalStorageHiddenStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl HiddenStore for LocalStorageHiddenStore {
    fn load(&self) -> Result<Option<HiddenSet>> {
        match LocalStorage::get::<Vec<EntryKey>>(&self.key) {
            Ok(keys) => Ok(Some(HiddenSet::from_keys(keys))),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(err) => Err(ViewerError::Storage(err.to_string())),
        }
    }

    fn save(&mut self, hidden: &HiddenSet) -> Result<()> {
        LocalStorage::set(&self.key, hidden.keys()).map_err(|e| ViewerError::Storage(e.to_string()))
    }
}
