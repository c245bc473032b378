//! Tiered resolution of every configuration field.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use barnstormer_observability::{config_span, record_duration, record_error};
use futures::future::try_join_all;
use serde::Serialize;
use serde_json::Value;
use tracing::Instrument;

use crate::descriptor::{FieldDescriptor, DESCRIPTORS};
use crate::error::{ConfigError, Result};
use crate::overrides::ConfigOverrides;
use crate::schema::{validate, AppConfig, ConfigField};
use crate::source::EnvSource;
use crate::store::KeyValueStore;

/// Which tier produced a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Override,
    Env,
    Secure,
    Indexed,
    Default,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfigSource::Override => "override",
            ConfigSource::Env => "env",
            ConfigSource::Secure => "secure",
            ConfigSource::Indexed => "indexed",
            ConfigSource::Default => "default",
        })
    }
}

/// Inputs to [load_env_config]. All sources are optional.
#[derive(Clone, Default)]
pub struct ConfigLoadOptions {
    pub env_source: EnvSource,
    pub secure_store: Option<Arc<dyn KeyValueStore>>,
    pub indexed_store: Option<Arc<dyn KeyValueStore>>,
    pub overrides: ConfigOverrides,
}

impl ConfigLoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options whose environment tier is a snapshot of the process environment.
    pub fn from_process_env() -> Self {
        Self::default().with_env_source(EnvSource::from_process())
    }

    pub fn with_env_source(mut self, env_source: EnvSource) -> Self {
        self.env_source = env_source;
        self
    }

    pub fn with_secure_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.secure_store = Some(store);
        self
    }

    pub fn with_indexed_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.indexed_store = Some(store);
        self
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

impl fmt::Debug for ConfigLoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLoadOptions")
            .field("env_vars", &self.env_source.len())
            .field("secure_store", &self.secure_store.as_ref().map(|s| s.name()))
            .field("indexed_store", &self.indexed_store.as_ref().map(|s| s.name()))
            .field("overrides", &!self.overrides.is_empty())
            .finish()
    }
}

/// Looks `key` up in `store`, then interprets the value. `None` means fall through.
async fn from_store(
    store: Option<&Arc<dyn KeyValueStore>>,
    key: Option<&str>,
    descriptor: &FieldDescriptor,
) -> Result<Option<Value>> {
    let (Some(store), Some(key)) = (store, key) else {
        return Ok(None);
    };
    let raw = store
        .get_item(key)
        .await
        .map_err(|source| ConfigError::Store {
            store: store.name().to_string(),
            key: key.to_string(),
            source,
        })?;
    Ok(raw.and_then(|raw| descriptor.interpret(&raw)))
}

async fn resolve_field(
    descriptor: &FieldDescriptor,
    options: &ConfigLoadOptions,
) -> Result<(ConfigField, Value, ConfigSource)> {
    let field = descriptor.field;

    if let Some(value) = options.overrides.value_for(field) {
        return Ok((field, value, ConfigSource::Override));
    }

    if let Some(value) = descriptor
        .env
        .and_then(|name| options.env_source.get(name))
        .and_then(|raw| descriptor.interpret(raw))
    {
        return Ok((field, value, ConfigSource::Env));
    }

    if let Some(value) =
        from_store(options.secure_store.as_ref(), descriptor.secure, descriptor).await?
    {
        return Ok((field, value, ConfigSource::Secure));
    }

    if let Some(value) =
        from_store(options.indexed_store.as_ref(), descriptor.indexed, descriptor).await?
    {
        return Ok((field, value, ConfigSource::Indexed));
    }

    Ok((field, descriptor.default_value(), ConfigSource::Default))
}

/// Resolves and validates the configuration, also reporting where each field came from.
pub async fn load_env_config_with_sources(
    options: ConfigLoadOptions,
) -> Result<(AppConfig, BTreeMap<ConfigField, ConfigSource>)> {
    let span = config_span!("load");
    async move {
        let start = Instant::now();
        let result = resolve_and_validate(&options).await;
        record_duration("duration_ms", start.elapsed());
        if let Err(e) = &result {
            record_error(e);
        }
        result
    }
    .instrument(span)
    .await
}

async fn resolve_and_validate(
    options: &ConfigLoadOptions,
) -> Result<(AppConfig, BTreeMap<ConfigField, ConfigSource>)> {
    let resolved = try_join_all(DESCRIPTORS.iter().map(|d| resolve_field(d, options))).await?;

    let mut candidate = BTreeMap::new();
    let mut sources = BTreeMap::new();
    for (field, value, source) in resolved {
        tracing::debug!(field = %field, source = %source, "resolved config field");
        candidate.insert(field, value);
        sources.insert(field, source);
    }

    match validate(&candidate) {
        Ok(config) => {
            tracing::info!(
                environment = %config.environment,
                backend_url = %config.backend_url,
                telemetry_enabled = config.telemetry_enabled,
                feature_flags = config.feature_flags.len(),
                "configuration loaded"
            );
            Ok((config, sources))
        }
        Err(err) => {
            tracing::warn!(issues = err.issues.len(), "configuration failed validation");
            Err(err.into())
        }
    }
}

/// Resolves every field through its tiers concurrently, then validates the result as a whole.
pub async fn load_env_config(options: ConfigLoadOptions) -> Result<AppConfig> {
    load_env_config_with_sources(options)
        .await
        .map(|(config, _)| config)
}
