//! Barnstormer configuration: one validated [AppConfig] per process start.
//!
//! Every field is resolved independently from ranked sources; the first one
//! that yields a usable value wins:
//!
//! ```text
//! override → environment → secure store → indexed store → default
//! ```
//!
//! Fields resolve concurrently. The assembled record is then validated as a
//! whole and every problem is reported in a single [ValidationError].
//!
//! ```rust,no_run
//! use barnstormer_config::{load_env_config, ConfigLoadOptions, EnvSource};
//!
//! # async fn run() -> Result<(), barnstormer_config::ConfigError> {
//! let options = ConfigLoadOptions::default()
//!     .with_env_source(EnvSource::from_pairs([("TLJ_BACKEND_URL", "https://api.example.com")]));
//! let config = load_env_config(options).await?;
//! assert_eq!(config.backend_url, "https://api.example.com");
//! # Ok(())
//! # }
//! ```

pub mod descriptor;
pub mod error;
pub mod loader;
pub mod overrides;
pub mod parse;
pub mod schema;
pub mod source;
pub mod store;

pub use descriptor::AppConfigKeys;
pub use error::{ConfigError, FieldIssue, Result, StoreError, UnknownVariant, ValidationError};
pub use loader::{load_env_config, load_env_config_with_sources, ConfigLoadOptions, ConfigSource};
pub use overrides::ConfigOverrides;
pub use schema::{AgentRole, AppConfig, ConfigField, Environment, FeatureFlags};
pub use source::EnvSource;
pub use store::{CredentialFileStore, KeyValueStore, MemoryStore, SqliteStore};
