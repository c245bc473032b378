//! Catalog model shapes: the wire response and the normalized model.

use barnstormer_constant::catalog::DEFAULT_OPENROUTER_MODEL_ID;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPricing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenRouterModel {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<ModelPricing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Prices arrive either as JSON numbers or as decimal strings.
fn de_price<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Price {
        Number(f64),
        Text(String),
    }
    Ok(match Option::<Price>::deserialize(deserializer)? {
        Some(Price::Number(n)) => Some(n),
        Some(Price::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricingResponse {
    #[serde(default, deserialize_with = "de_price")]
    pub prompt: Option<f64>,
    #[serde(default, deserialize_with = "de_price")]
    pub completion: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopProvider {
    #[serde(default)]
    pub name: Option<String>,
}

/// One model entry as served by the catalog endpoints. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenRouterModelResponse {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub context_length: Option<u64>,
    #[serde(default)]
    pub pricing: Option<PricingResponse>,
    #[serde(default)]
    pub pricing_units: Option<String>,
    #[serde(default)]
    pub top_provider: Option<TopProvider>,
}

pub fn normalize_model(model: OpenRouterModelResponse) -> OpenRouterModel {
    let pricing_units = model.pricing_units;
    OpenRouterModel {
        name: model.name.unwrap_or_else(|| model.id.clone()),
        id: model.id,
        description: model.description,
        context_length: model.context_length,
        pricing: model.pricing.map(|p| ModelPricing {
            prompt: p.prompt,
            completion: p.completion,
            currency: Some(
                p.currency
                    .or(pricing_units)
                    .unwrap_or_else(|| "USD".to_string()),
            ),
        }),
        tags: model
            .top_provider
            .and_then(|provider| provider.name)
            .map(|name| vec![name]),
    }
}

/// The catalog used when no endpoint can be reached.
pub fn fallback_models() -> Vec<OpenRouterModel> {
    vec![
        OpenRouterModel {
            id: DEFAULT_OPENROUTER_MODEL_ID.to_string(),
            name: "Grok 4 Fast (OpenRouter)".to_string(),
            description: Some("Default Grok 4 Fast free-tier model via OpenRouter.".to_string()),
            context_length: Some(262_144),
            pricing: Some(ModelPricing {
                prompt: Some(0.0),
                completion: Some(0.0),
                currency: Some("USD".to_string()),
            }),
            tags: Some(vec!["default".to_string(), "free-tier".to_string()]),
        },
        OpenRouterModel {
            id: "openrouter/openai/gpt-4o-mini".to_string(),
            name: "GPT-4o Mini".to_string(),
            description: Some("Balanced OpenAI GPT-4o mini via OpenRouter.".to_string()),
            context_length: Some(128_000),
            pricing: None,
            tags: Some(vec!["openai".to_string()]),
        },
        OpenRouterModel {
            id: "openrouter/google/gemini-flash-1.5".to_string(),
            name: "Gemini Flash 1.5".to_string(),
            description: Some("Fast multimodal Gemini Flash 1.5.".to_string()),
            context_length: Some(1_048_576),
            pricing: None,
            tags: Some(vec!["google".to_string()]),
        },
    ]
}
