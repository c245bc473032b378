//! The validated configuration record and its schema.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FieldIssue, UnknownVariant, ValidationError};

pub type FeatureFlags = BTreeMap<String, bool>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub const ALL: [Environment; 3] = [
        Environment::Development,
        Environment::Production,
        Environment::Test,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

impl FromStr for Environment {
    type Err = UnknownVariant;

    /// Exact match; the schema does not normalize case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Environment::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                expected: Environment::ALL.iter().map(Environment::as_str).collect(),
                received: s.to_string(),
            })
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    #[default]
    Facilitator,
    Summarizer,
    Critic,
    Scribe,
}

impl AgentRole {
    pub const ALL: [AgentRole; 4] = [
        AgentRole::Facilitator,
        AgentRole::Summarizer,
        AgentRole::Critic,
        AgentRole::Scribe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Facilitator => "facilitator",
            AgentRole::Summarizer => "summarizer",
            AgentRole::Critic => "critic",
            AgentRole::Scribe => "scribe",
        }
    }
}

impl FromStr for AgentRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentRole::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                expected: AgentRole::ALL.iter().map(AgentRole::as_str).collect(),
                received: s.to_string(),
            })
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names of every configuration field, in resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfigField {
    #[serde(rename = "environment")]
    Environment,
    #[serde(rename = "backendUrl")]
    BackendUrl,
    #[serde(rename = "realtimeSyncUrl")]
    RealtimeSyncUrl,
    #[serde(rename = "openRouterApiKey")]
    OpenRouterApiKey,
    #[serde(rename = "geminiApiKey")]
    GeminiApiKey,
    #[serde(rename = "openAIApiKey")]
    OpenAiApiKey,
    #[serde(rename = "ollamaBaseUrl")]
    OllamaBaseUrl,
    #[serde(rename = "revenueCatApiKey")]
    RevenueCatApiKey,
    #[serde(rename = "defaultAgentRole")]
    DefaultAgentRole,
    #[serde(rename = "telemetryEnabled")]
    TelemetryEnabled,
    #[serde(rename = "featureFlags")]
    FeatureFlags,
}

impl ConfigField {
    pub const ALL: [ConfigField; 11] = [
        ConfigField::Environment,
        ConfigField::BackendUrl,
        ConfigField::RealtimeSyncUrl,
        ConfigField::OpenRouterApiKey,
        ConfigField::GeminiApiKey,
        ConfigField::OpenAiApiKey,
        ConfigField::OllamaBaseUrl,
        ConfigField::RevenueCatApiKey,
        ConfigField::DefaultAgentRole,
        ConfigField::TelemetryEnabled,
        ConfigField::FeatureFlags,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigField::Environment => "environment",
            ConfigField::BackendUrl => "backendUrl",
            ConfigField::RealtimeSyncUrl => "realtimeSyncUrl",
            ConfigField::OpenRouterApiKey => "openRouterApiKey",
            ConfigField::GeminiApiKey => "geminiApiKey",
            ConfigField::OpenAiApiKey => "openAIApiKey",
            ConfigField::OllamaBaseUrl => "ollamaBaseUrl",
            ConfigField::RevenueCatApiKey => "revenueCatApiKey",
            ConfigField::DefaultAgentRole => "defaultAgentRole",
            ConfigField::TelemetryEnabled => "telemetryEnabled",
            ConfigField::FeatureFlags => "featureFlags",
        }
    }

    /// API-key fields; their values are masked in output.
    pub fn is_secret(&self) -> bool {
        matches!(
            self,
            ConfigField::OpenRouterApiKey
                | ConfigField::GeminiApiKey
                | ConfigField::OpenAiApiKey
                | ConfigField::RevenueCatApiKey
        )
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated application configuration. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub environment: Environment,
    pub backend_url: String,
    pub realtime_sync_url: Option<String>,
    pub open_router_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    #[serde(rename = "openAIApiKey")]
    pub open_ai_api_key: Option<String>,
    pub ollama_base_url: Option<String>,
    pub revenue_cat_api_key: Option<String>,
    pub default_agent_role: AgentRole,
    pub telemetry_enabled: bool,
    pub feature_flags: FeatureFlags,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            backend_url: "http://localhost:8787".to_string(),
            realtime_sync_url: Some("ws://localhost:8787/sync".to_string()),
            open_router_api_key: None,
            gemini_api_key: None,
            open_ai_api_key: None,
            ollama_base_url: Some("http://localhost:11434".to_string()),
            revenue_cat_api_key: None,
            default_agent_role: AgentRole::Facilitator,
            telemetry_enabled: true,
            feature_flags: FeatureFlags::new(),
        }
    }
}

impl AppConfig {
    /// Whether `name` is switched on. Unknown flags are off.
    pub fn feature_enabled(&self, name: &str) -> bool {
        self.feature_flags.get(name).copied().unwrap_or(false)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expect_string(value: &Value) -> Result<&str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("expected string, received {}", type_name(value)))
}

fn enum_member<T: FromStr<Err = UnknownVariant>>(value: &Value) -> Result<T, String> {
    let raw = expect_string(value)?;
    raw.parse::<T>().map_err(|e| e.to_string())
}

fn url(value: &Value) -> Result<String, String> {
    let raw = expect_string(value)?;
    url::Url::parse(raw)
        .map(|_| raw.to_string())
        .map_err(|_| "invalid url".to_string())
}

fn nullable_url(value: &Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        other => url(other).map(Some),
    }
}

fn nullable_key(value: &Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        other => {
            let raw = expect_string(other)?;
            if raw.is_empty() {
                Err("string must contain at least 1 character".to_string())
            } else {
                Ok(Some(raw.to_string()))
            }
        }
    }
}

fn boolean(value: &Value) -> Result<bool, String> {
    value
        .as_bool()
        .ok_or_else(|| format!("expected boolean, received {}", type_name(value)))
}

fn flags(value: &Value) -> Result<FeatureFlags, String> {
    let map = value
        .as_object()
        .ok_or_else(|| format!("expected object, received {}", type_name(value)))?;
    map.iter()
        .map(|(name, flag)| {
            flag.as_bool()
                .map(|b| (name.clone(), b))
                .ok_or_else(|| {
                    format!(
                        "flag '{}' expected boolean, received {}",
                        name,
                        type_name(flag)
                    )
                })
        })
        .collect()
}

static MISSING: Value = Value::Null;

/// Collects typed values and issues field by field, so every problem is reported.
struct Checker<'a> {
    candidate: &'a BTreeMap<ConfigField, Value>,
    issues: Vec<FieldIssue>,
}

impl Checker<'_> {
    fn check<T>(
        &mut self,
        field: ConfigField,
        rule: impl FnOnce(&Value) -> Result<T, String>,
    ) -> Option<T> {
        let value = self.candidate.get(&field).unwrap_or(&MISSING);
        match rule(value) {
            Ok(v) => Some(v),
            Err(message) => {
                self.issues.push(FieldIssue { field, message });
                None
            }
        }
    }
}

/// Validates a fully assembled candidate record.
///
/// Missing fields are treated as `null`; the resolver always supplies every field.
pub fn validate(candidate: &BTreeMap<ConfigField, Value>) -> Result<AppConfig, ValidationError> {
    let mut c = Checker {
        candidate,
        issues: Vec::new(),
    };
    let environment = c.check(ConfigField::Environment, enum_member::<Environment>);
    let backend_url = c.check(ConfigField::BackendUrl, url);
    let realtime_sync_url = c.check(ConfigField::RealtimeSyncUrl, nullable_url);
    let open_router_api_key = c.check(ConfigField::OpenRouterApiKey, nullable_key);
    let gemini_api_key = c.check(ConfigField::GeminiApiKey, nullable_key);
    let open_ai_api_key = c.check(ConfigField::OpenAiApiKey, nullable_key);
    let ollama_base_url = c.check(ConfigField::OllamaBaseUrl, nullable_url);
    let revenue_cat_api_key = c.check(ConfigField::RevenueCatApiKey, nullable_key);
    let default_agent_role = c.check(ConfigField::DefaultAgentRole, enum_member::<AgentRole>);
    let telemetry_enabled = c.check(ConfigField::TelemetryEnabled, boolean);
    let feature_flags = c.check(ConfigField::FeatureFlags, flags);

    match (
        environment,
        backend_url,
        realtime_sync_url,
        open_router_api_key,
        gemini_api_key,
        open_ai_api_key,
        ollama_base_url,
        revenue_cat_api_key,
        default_agent_role,
        telemetry_enabled,
        feature_flags,
    ) {
        (
            Some(environment),
            Some(backend_url),
            Some(realtime_sync_url),
            Some(open_router_api_key),
            Some(gemini_api_key),
            Some(open_ai_api_key),
            Some(ollama_base_url),
            Some(revenue_cat_api_key),
            Some(default_agent_role),
            Some(telemetry_enabled),
            Some(feature_flags),
        ) if c.issues.is_empty() => Ok(AppConfig {
            environment,
            backend_url,
            realtime_sync_url,
            open_router_api_key,
            gemini_api_key,
            open_ai_api_key,
            ollama_base_url,
            revenue_cat_api_key,
            default_agent_role,
            telemetry_enabled,
            feature_flags,
        }),
        _ => Err(ValidationError { issues: c.issues }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defaults() -> BTreeMap<ConfigField, Value> {
        let value = serde_json::to_value(AppConfig::default()).unwrap();
        ConfigField::ALL
            .into_iter()
            .map(|f| (f, value[f.as_str()].clone()))
            .collect()
    }

    #[test]
    fn test_defaults_validate() {
        assert_eq!(validate(&defaults()).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_serialized_field_names_match_config_fields() {
        let value = serde_json::to_value(AppConfig::default()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), ConfigField::ALL.len());
        for field in ConfigField::ALL {
            assert!(object.contains_key(field.as_str()), "missing {field}");
        }
    }

    #[test]
    fn test_invalid_url_rejected() {
        let mut candidate = defaults();
        candidate.insert(ConfigField::BackendUrl, json!("not-a-url"));
        let err = validate(&candidate).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.to_string(), "backendUrl: invalid url");
    }

    #[test]
    fn test_all_issues_are_aggregated() {
        let mut candidate = defaults();
        candidate.insert(ConfigField::Environment, json!("staging"));
        candidate.insert(ConfigField::OllamaBaseUrl, json!("nope"));
        candidate.insert(ConfigField::GeminiApiKey, json!(""));
        candidate.insert(ConfigField::TelemetryEnabled, json!("yes"));
        let err = validate(&candidate).unwrap_err();
        let fields: Vec<_> = err.issues.iter().map(|i| i.field).collect();
        assert_eq!(
            fields,
            vec![
                ConfigField::Environment,
                ConfigField::GeminiApiKey,
                ConfigField::OllamaBaseUrl,
                ConfigField::TelemetryEnabled,
            ]
        );
        assert!(err.to_string().contains("; "));
    }

    #[test]
    fn test_nullable_fields_accept_null() {
        let mut candidate = defaults();
        candidate.insert(ConfigField::RealtimeSyncUrl, Value::Null);
        candidate.insert(ConfigField::OllamaBaseUrl, Value::Null);
        let config = validate(&candidate).unwrap();
        assert_eq!(config.realtime_sync_url, None);
        assert_eq!(config.ollama_base_url, None);
    }

    #[test]
    fn test_environment_is_case_sensitive() {
        let mut candidate = defaults();
        candidate.insert(ConfigField::Environment, json!("Production"));
        assert!(validate(&candidate).is_err());
    }

    #[test]
    fn test_unknown_variant_names_allowed_values() {
        let err = "scribbler".parse::<AgentRole>().unwrap_err();
        assert_eq!(err.received, "scribbler");
        assert_eq!(err.expected, vec!["facilitator", "summarizer", "critic", "scribe"]);

        let mut candidate = defaults();
        candidate.insert(ConfigField::Environment, json!("staging"));
        let err = validate(&candidate).unwrap_err();
        assert_eq!(
            err.issues[0].message,
            "invalid enum value, expected 'development' | 'production' | 'test', received 'staging'"
        );
    }

    #[test]
    fn test_feature_flags_must_be_booleans() {
        let mut candidate = defaults();
        candidate.insert(ConfigField::FeatureFlags, json!({"a": true, "b": 1}));
        let err = validate(&candidate).unwrap_err();
        assert_eq!(err.issues[0].field, ConfigField::FeatureFlags);
    }

    #[test]
    fn test_feature_enabled() {
        let mut config = AppConfig::default();
        config.feature_flags.insert("agentV2".to_string(), true);
        assert!(config.feature_enabled("agentV2"));
        assert!(!config.feature_enabled("other"));
    }
}
