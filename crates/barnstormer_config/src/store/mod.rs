//! Async key-value stores backing the secure and indexed tiers.

mod credentials;
mod memory;
mod sqlite;

pub use credentials::CredentialFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;

use crate::error::StoreError;

/// A read-only async key lookup.
///
/// `Ok(None)` means the key is absent; an `Err` aborts configuration loading.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Short label used in logs and errors, e.g. `"credentials"`.
    fn name(&self) -> &str;

    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
}
