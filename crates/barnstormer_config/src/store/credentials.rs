//! Secure tier backed by a dotenv-format credentials file (`~/.barnstormer/credentials`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use barnstormer_constant::app;

use super::KeyValueStore;
use crate::error::StoreError;

#[derive(Debug, Clone)]
pub struct CredentialFileStore {
    path: PathBuf,
}

impl CredentialFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.barnstormer/credentials`, or `None` when there is no home directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(app::DATA_DIR).join(app::CREDENTIALS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every entry. A missing file is an empty store.
    pub fn read_all(&self) -> Result<HashMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let mut entries = HashMap::new();
        for item in dotenvy::from_path_iter(&self.path)? {
            let (key, value) = item?;
            entries.insert(key, value);
        }
        Ok(entries)
    }
}

#[async_trait]
impl KeyValueStore for CredentialFileStore {
    fn name(&self) -> &str {
        "credentials"
    }

    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let store = self.clone();
        let key = key.to_string();
        let mut entries = tokio::task::spawn_blocking(move || store.read_all()).await??;
        Ok(entries.remove(&key))
    }
}
