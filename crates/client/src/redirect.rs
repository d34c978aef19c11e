//! Post-login redirect path, kept for the lifetime of one session

use crate::storage::{KeyValueStore, StorageError};
use std::sync::Arc;

const REDIRECT_KEY: &str = "nsp_redirect_after_login";

#[derive(Clone)]
pub struct RedirectStore {
    storage: Arc<dyn KeyValueStore>,
}

impl RedirectStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Remember where to go once login completes
    pub fn save(&self, path: &str) -> Result<(), StorageError> {
        self.storage.set(REDIRECT_KEY, path)
    }

    /// Take the saved path; a second call returns `None`
    pub fn consume(&self) -> Result<Option<String>, StorageError> {
        let path = self.storage.get(REDIRECT_KEY);
        self.storage.remove(REDIRECT_KEY)?;
        Ok(path)
    }
}
