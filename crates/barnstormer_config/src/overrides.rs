//! Programmatic overrides, the highest-priority tier.

use serde_json::Value;

use crate::schema::{AgentRole, ConfigField, Environment, FeatureFlags};

/// Typed, already-formed values that bypass every other source.
///
/// Nullable fields take an `Option<String>`; passing `None` forces the field to null.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub environment: Option<Environment>,
    pub backend_url: Option<String>,
    pub realtime_sync_url: Option<Option<String>>,
    pub open_router_api_key: Option<Option<String>>,
    pub gemini_api_key: Option<Option<String>>,
    pub open_ai_api_key: Option<Option<String>>,
    pub ollama_base_url: Option<Option<String>>,
    pub revenue_cat_api_key: Option<Option<String>>,
    pub default_agent_role: Option<AgentRole>,
    pub telemetry_enabled: Option<bool>,
    pub feature_flags: Option<FeatureFlags>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = Some(url.into());
        self
    }

    pub fn with_realtime_sync_url(mut self, url: Option<String>) -> Self {
        self.realtime_sync_url = Some(url);
        self
    }

    pub fn with_open_router_api_key(mut self, key: Option<String>) -> Self {
        self.open_router_api_key = Some(key);
        self
    }

    pub fn with_gemini_api_key(mut self, key: Option<String>) -> Self {
        self.gemini_api_key = Some(key);
        self
    }

    pub fn with_open_ai_api_key(mut self, key: Option<String>) -> Self {
        self.open_ai_api_key = Some(key);
        self
    }

    pub fn with_ollama_base_url(mut self, url: Option<String>) -> Self {
        self.ollama_base_url = Some(url);
        self
    }

    pub fn with_revenue_cat_api_key(mut self, key: Option<String>) -> Self {
        self.revenue_cat_api_key = Some(key);
        self
    }

    pub fn with_default_agent_role(mut self, role: AgentRole) -> Self {
        self.default_agent_role = Some(role);
        self
    }

    pub fn with_telemetry_enabled(mut self, enabled: bool) -> Self {
        self.telemetry_enabled = Some(enabled);
        self
    }

    pub fn with_feature_flags(mut self, flags: FeatureFlags) -> Self {
        self.feature_flags = Some(flags);
        self
    }

    /// The override for `field` as a candidate value, if one was given.
    pub fn value_for(&self, field: ConfigField) -> Option<Value> {
        match field {
            ConfigField::Environment => self.environment.map(|e| Value::from(e.as_str())),
            ConfigField::BackendUrl => self.backend_url.clone().map(Value::from),
            ConfigField::RealtimeSyncUrl => self.realtime_sync_url.clone().map(Value::from),
            ConfigField::OpenRouterApiKey => self.open_router_api_key.clone().map(Value::from),
            ConfigField::GeminiApiKey => self.gemini_api_key.clone().map(Value::from),
            ConfigField::OpenAiApiKey => self.open_ai_api_key.clone().map(Value::from),
            ConfigField::OllamaBaseUrl => self.ollama_base_url.clone().map(Value::from),
            ConfigField::RevenueCatApiKey => self.revenue_cat_api_key.clone().map(Value::from),
            ConfigField::DefaultAgentRole => {
                self.default_agent_role.map(|r| Value::from(r.as_str()))
            }
            ConfigField::TelemetryEnabled => self.telemetry_enabled.map(Value::Bool),
            ConfigField::FeatureFlags => self.feature_flags.as_ref().map(|flags| {
                Value::Object(
                    flags
                        .iter()
                        .map(|(k, v)| (k.clone(), Value::Bool(*v)))
                        .collect(),
                )
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        ConfigField::ALL.iter().all(|f| self.value_for(*f).is_none())
    }
}
