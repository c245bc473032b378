//! Where each configuration field may come from.

use serde_json::Value;

use crate::parse::{parse_agent_role, parse_boolean, parse_json_flags};
use crate::schema::{AppConfig, ConfigField};

pub type Parser = fn(&str) -> Option<Value>;

#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub field: ConfigField,
    /// Environment variable name
    pub env: Option<&'static str>,
    /// Key in the secure credential store
    pub secure: Option<&'static str>,
    /// Key in the indexed device store
    pub indexed: Option<&'static str>,
    pub parse: Option<Parser>,
}

impl FieldDescriptor {
    const fn env(field: ConfigField, env: &'static str) -> Self {
        Self {
            field,
            env: Some(env),
            secure: None,
            indexed: None,
            parse: None,
        }
    }

    const fn secret(field: ConfigField, key: &'static str) -> Self {
        Self {
            field,
            env: Some(key),
            secure: Some(key),
            indexed: None,
            parse: None,
        }
    }

    const fn parsed(mut self, parse: Parser) -> Self {
        self.parse = Some(parse);
        self
    }

    const fn indexed(mut self, key: &'static str) -> Self {
        self.indexed = Some(key);
        self
    }

    /// Applies the field parser, or passes the raw string through.
    pub fn interpret(&self, raw: &str) -> Option<Value> {
        match self.parse {
            Some(parse) => parse(raw),
            None => Some(Value::String(raw.to_string())),
        }
    }

    /// The field's literal default, taken from [AppConfig::default].
    pub fn default_value(&self) -> Value {
        default_value(self.field)
    }
}

pub fn default_value(field: ConfigField) -> Value {
    let defaults = AppConfig::default();
    match field {
        ConfigField::Environment => Value::from(defaults.environment.as_str()),
        ConfigField::BackendUrl => Value::from(defaults.backend_url),
        ConfigField::RealtimeSyncUrl => Value::from(defaults.realtime_sync_url),
        ConfigField::OpenRouterApiKey => Value::from(defaults.open_router_api_key),
        ConfigField::GeminiApiKey => Value::from(defaults.gemini_api_key),
        ConfigField::OpenAiApiKey => Value::from(defaults.open_ai_api_key),
        ConfigField::OllamaBaseUrl => Value::from(defaults.ollama_base_url),
        ConfigField::RevenueCatApiKey => Value::from(defaults.revenue_cat_api_key),
        ConfigField::DefaultAgentRole => Value::from(defaults.default_agent_role.as_str()),
        ConfigField::TelemetryEnabled => Value::from(defaults.telemetry_enabled),
        ConfigField::FeatureFlags => Value::Object(
            defaults
                .feature_flags
                .into_iter()
                .map(|(k, v)| (k, Value::Bool(v)))
                .collect(),
        ),
    }
}

pub const DESCRIPTORS: [FieldDescriptor; 11] = [
    FieldDescriptor::env(ConfigField::Environment, AppConfigKeys::ENV),
    FieldDescriptor::env(ConfigField::BackendUrl, AppConfigKeys::BACKEND_URL),
    FieldDescriptor::env(ConfigField::RealtimeSyncUrl, AppConfigKeys::REALTIME_SYNC_URL),
    FieldDescriptor::secret(ConfigField::OpenRouterApiKey, AppConfigKeys::OPENROUTER_API_KEY),
    FieldDescriptor::secret(ConfigField::GeminiApiKey, AppConfigKeys::GEMINI_API_KEY),
    FieldDescriptor::secret(ConfigField::OpenAiApiKey, AppConfigKeys::OPENAI_API_KEY),
    FieldDescriptor::env(ConfigField::OllamaBaseUrl, AppConfigKeys::OLLAMA_BASE_URL),
    FieldDescriptor::secret(ConfigField::RevenueCatApiKey, AppConfigKeys::REVENUECAT_API_KEY),
    FieldDescriptor::env(ConfigField::DefaultAgentRole, AppConfigKeys::DEFAULT_AGENT_ROLE)
        .parsed(parse_agent_role),
    FieldDescriptor::env(ConfigField::TelemetryEnabled, AppConfigKeys::TELEMETRY_ENABLED)
        .parsed(parse_boolean),
    FieldDescriptor::env(ConfigField::FeatureFlags, AppConfigKeys::FEATURE_FLAGS)
        .indexed(AppConfigKeys::FEATURE_FLAGS)
        .parsed(parse_json_flags),
];

pub fn descriptor(field: ConfigField) -> &'static FieldDescriptor {
    // DESCRIPTORS is ordered like ConfigField::ALL
    &DESCRIPTORS[field as usize]
}

/// Well-known environment and store key names.
pub struct AppConfigKeys;

impl AppConfigKeys {
    pub const ENV: &'static str = "TLJ_ENV";
    pub const BACKEND_URL: &'static str = "TLJ_BACKEND_URL";
    pub const REALTIME_SYNC_URL: &'static str = "TLJ_REALTIME_SYNC_URL";
    pub const OPENROUTER_API_KEY: &'static str = "OPENROUTER_API_KEY";
    pub const GEMINI_API_KEY: &'static str = "GEMINI_API_KEY";
    pub const OPENAI_API_KEY: &'static str = "OPENAI_API_KEY";
    pub const OLLAMA_BASE_URL: &'static str = "OLLAMA_BASE_URL";
    pub const REVENUECAT_API_KEY: &'static str = "REVENUECAT_PUBLIC_API_KEY";
    pub const DEFAULT_AGENT_ROLE: &'static str = "TLJ_DEFAULT_AGENT_ROLE";
    pub const TELEMETRY_ENABLED: &'static str = "TLJ_TELEMETRY_ENABLED";
    pub const FEATURE_FLAGS: &'static str = "TLJ_FEATURE_FLAGS";

    /// Keys the secure credential store is consulted for.
    pub const SECURE: [&'static str; 4] = [
        Self::OPENROUTER_API_KEY,
        Self::GEMINI_API_KEY,
        Self::OPENAI_API_KEY,
        Self::REVENUECAT_API_KEY,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptors_follow_field_order() {
        for (i, field) in ConfigField::ALL.into_iter().enumerate() {
            assert_eq!(DESCRIPTORS[i].field, field);
            assert_eq!(descriptor(field).field, field);
        }
    }

    #[test]
    fn test_store_keys() {
        let secure: Vec<_> = DESCRIPTORS.iter().filter_map(|d| d.secure).collect();
        assert_eq!(secure, AppConfigKeys::SECURE.to_vec());
        let indexed: Vec<_> = DESCRIPTORS.iter().filter_map(|d| d.indexed).collect();
        assert_eq!(indexed, vec![AppConfigKeys::FEATURE_FLAGS]);
    }

    #[test]
    fn test_interpret_without_parser_passes_raw() {
        let d = descriptor(ConfigField::BackendUrl);
        assert_eq!(d.interpret("whatever"), Some(json!("whatever")));
        assert_eq!(d.interpret(""), Some(json!("")));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(default_value(ConfigField::Environment), json!("development"));
        assert_eq!(default_value(ConfigField::GeminiApiKey), Value::Null);
        assert_eq!(default_value(ConfigField::TelemetryEnabled), json!(true));
        assert_eq!(default_value(ConfigField::FeatureFlags), json!({}));
        assert_eq!(
            default_value(ConfigField::OllamaBaseUrl),
            json!("http://localhost:11434")
        );
    }
}
