use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use barnstormer_config::{
    load_env_config, load_env_config_with_sources, AgentRole, AppConfig, ConfigError,
    ConfigField, ConfigLoadOptions, ConfigOverrides, ConfigSource, EnvSource, Environment,
    KeyValueStore, MemoryStore, SqliteStore, StoreError,
};

struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    fn name(&self) -> &str {
        "vault"
    }

    async fn get_item(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Other("vault unavailable".to_string()))
    }
}

#[tokio::test]
async fn returns_defaults_without_inputs() {
    let config = load_env_config(ConfigLoadOptions::default()).await.unwrap();

    assert_eq!(config, AppConfig::default());
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.backend_url, "http://localhost:8787");
    assert_eq!(config.realtime_sync_url.as_deref(), Some("ws://localhost:8787/sync"));
    assert_eq!(config.default_agent_role, AgentRole::Facilitator);
    assert!(config.telemetry_enabled);
    assert!(config.feature_flags.is_empty());
}

#[tokio::test]
async fn overrides_beat_environment() {
    let options = ConfigLoadOptions::default()
        .with_env_source(EnvSource::from_pairs([
            ("TLJ_BACKEND_URL", "https://api.example.com"),
            ("TLJ_TELEMETRY_ENABLED", "false"),
        ]))
        .with_overrides(
            ConfigOverrides::new()
                .with_backend_url("https://override.example.com")
                .with_telemetry_enabled(true),
        );

    let config = load_env_config(options).await.unwrap();
    assert_eq!(config.backend_url, "https://override.example.com");
    assert!(config.telemetry_enabled);
}

#[tokio::test]
async fn environment_values_are_parsed() {
    let options = ConfigLoadOptions::default().with_env_source(EnvSource::from_pairs([
        ("TLJ_ENV", "production"),
        ("TLJ_TELEMETRY_ENABLED", "off"),
        ("TLJ_DEFAULT_AGENT_ROLE", "Scribe"),
        ("TLJ_FEATURE_FLAGS", r#"{"agentV2":true}"#),
    ]));
    let (config, sources) = load_env_config_with_sources(options).await.unwrap();

    assert_eq!(config.environment, Environment::Production);
    assert!(!config.telemetry_enabled);
    assert_eq!(config.default_agent_role, AgentRole::Scribe);
    assert!(config.feature_enabled("agentV2"));
    assert_eq!(sources[&ConfigField::Environment], ConfigSource::Env);
    assert_eq!(sources[&ConfigField::BackendUrl], ConfigSource::Default);
}

#[tokio::test]
async fn falls_back_to_secure_store() {
    let secure = MemoryStore::new("secure").with_item("OPENROUTER_API_KEY", "secure-openrouter-key");
    let options = ConfigLoadOptions::default().with_secure_store(Arc::new(secure));

    let (config, sources) = load_env_config_with_sources(options).await.unwrap();
    assert_eq!(config.open_router_api_key.as_deref(), Some("secure-openrouter-key"));
    assert_eq!(sources[&ConfigField::OpenRouterApiKey], ConfigSource::Secure);
}

#[tokio::test]
async fn parses_feature_flags_from_indexed_store() {
    let dir = tempfile::tempdir().unwrap();
    let indexed = SqliteStore::open_at(dir.path()).unwrap();
    indexed
        .set_item("TLJ_FEATURE_FLAGS", r#"{"agentV2":true,"newImporter":false}"#)
        .unwrap();
    let options = ConfigLoadOptions::default().with_indexed_store(Arc::new(indexed));

    let config = load_env_config(options).await.unwrap();
    let expected: BTreeMap<String, bool> = [
        ("agentV2".to_string(), true),
        ("newImporter".to_string(), false),
    ]
    .into_iter()
    .collect();
    assert_eq!(config.feature_flags, expected);
}

#[tokio::test]
async fn invalid_url_is_a_validation_error() {
    let options = ConfigLoadOptions::default()
        .with_env_source(EnvSource::from_pairs([("TLJ_BACKEND_URL", "not-a-valid-url")]));

    let err = load_env_config(options).await.unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("backendUrl"));
}

#[tokio::test]
async fn validation_reports_every_bad_field() {
    let options = ConfigLoadOptions::default().with_env_source(EnvSource::from_pairs([
        ("TLJ_BACKEND_URL", "nope"),
        ("TLJ_ENV", "staging"),
        ("OLLAMA_BASE_URL", "also nope"),
    ]));

    let err = load_env_config(options).await.unwrap_err();
    let ConfigError::Validation(validation) = &err else {
        panic!("expected validation error, got {err}");
    };
    assert_eq!(validation.issues.len(), 3);
    assert_eq!(validation.to_string().matches("; ").count(), 2);
}

#[tokio::test]
async fn store_failure_propagates() {
    let options = ConfigLoadOptions::default().with_secure_store(Arc::new(FailingStore));

    let err = load_env_config(options).await.unwrap_err();
    match err {
        ConfigError::Store { store, .. } => assert_eq!(store, "vault"),
        other => panic!("expected store error, got {other}"),
    }
}

#[tokio::test]
async fn store_is_skipped_when_env_provides_value() {
    let env = EnvSource::from_pairs([
        ("OPENROUTER_API_KEY", "a"),
        ("GEMINI_API_KEY", "b"),
        ("OPENAI_API_KEY", "c"),
        ("REVENUECAT_PUBLIC_API_KEY", "d"),
    ]);
    let options = ConfigLoadOptions::default()
        .with_env_source(env)
        .with_secure_store(Arc::new(FailingStore));

    let config = load_env_config(options).await.unwrap();
    assert_eq!(config.revenue_cat_api_key.as_deref(), Some("d"));
}

#[tokio::test]
async fn null_override_forces_null() {
    let options = ConfigLoadOptions::default()
        .with_env_source(EnvSource::from_pairs([("TLJ_REALTIME_SYNC_URL", "wss://sync.example.com")]))
        .with_overrides(ConfigOverrides::new().with_realtime_sync_url(None));

    let config = load_env_config(options).await.unwrap();
    assert_eq!(config.realtime_sync_url, None);
}

#[tokio::test]
async fn loading_is_idempotent() {
    let options = ConfigLoadOptions::default()
        .with_env_source(EnvSource::from_pairs([("TLJ_ENV", "test")]))
        .with_secure_store(Arc::new(MemoryStore::new("secure").with_item("GEMINI_API_KEY", "g")));

    let first = load_env_config(options.clone()).await.unwrap();
    let second = load_env_config(options).await.unwrap();
    assert_eq!(first, second);
}
