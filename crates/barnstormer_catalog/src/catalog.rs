//! Model catalog state and one-shot hydration.

use std::fmt;
use std::time::Instant;

use barnstormer_constant::catalog::DEFAULT_OPENROUTER_MODEL_ID;
use barnstormer_observability::{catalog_span, record_duration};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::client::{CatalogClient, CatalogEndpoint};
use crate::error::{CatalogError, Result};
use crate::model::{fallback_models, OpenRouterModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    Remote,
    Static,
    Bundled,
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CatalogSource::Remote => "remote",
            CatalogSource::Static => "static",
            CatalogSource::Bundled => "bundled",
        })
    }
}

#[derive(Debug)]
pub struct ModelCatalog {
    client: CatalogClient,
    endpoints: Vec<CatalogEndpoint>,
    models: Vec<OpenRouterModel>,
    active_model_id: String,
    loading: bool,
    error: Option<String>,
    source: CatalogSource,
    hydration_started: bool,
}

impl ModelCatalog {
    /// Starts with the bundled models and the default model selected.
    pub fn new(client: CatalogClient, endpoints: Vec<CatalogEndpoint>) -> Self {
        Self {
            client,
            endpoints,
            models: fallback_models(),
            active_model_id: DEFAULT_OPENROUTER_MODEL_ID.to_string(),
            loading: false,
            error: None,
            source: CatalogSource::Bundled,
            hydration_started: false,
        }
    }

    pub fn models(&self) -> &[OpenRouterModel] {
        &self.models
    }

    /// Models with the default model moved to the front.
    pub fn models_sorted(&self) -> Vec<OpenRouterModel> {
        let mut sorted = self.models.clone();
        if let Some(index) = sorted
            .iter()
            .position(|m| m.id == DEFAULT_OPENROUTER_MODEL_ID)
        {
            let default = sorted.remove(index);
            sorted.insert(0, default);
        }
        sorted
    }

    pub fn active_model_id(&self) -> &str {
        &self.active_model_id
    }

    pub fn active_model(&self) -> Option<&OpenRouterModel> {
        self.models.iter().find(|m| m.id == self.active_model_id)
    }

    pub fn set_active_model_id(&mut self, model_id: impl Into<String>) {
        self.active_model_id = model_id.into();
        tracing::info!(model_id = %self.active_model_id, "OpenRouter model selected");
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn source(&self) -> CatalogSource {
        self.source
    }

    pub fn status_line(&self) -> String {
        if self.loading {
            "Loading OpenRouter models…".to_string()
        } else if let Some(error) = &self.error {
            format!("Using fallback catalog ({error})")
        } else {
            format!("{} models available", self.models.len())
        }
    }

    /// Fetches the catalog once. Later calls return the current source untouched.
    ///
    /// Endpoint failures fall through to the next endpoint and finally to the
    /// bundled list, so the only error is [CatalogError::Cancelled]. A
    /// cancelled hydration leaves the models as they were.
    pub async fn hydrate(&mut self, cancel: &CancellationToken) -> Result<CatalogSource> {
        if self.hydration_started {
            tracing::debug!(source = %self.source, "model catalog already hydrated");
            return Ok(self.source);
        }
        self.hydration_started = true;

        let first = self
            .endpoints
            .first()
            .map(|e| e.url.to_string())
            .unwrap_or_default();
        let span = catalog_span!("hydrate", first.as_str());
        let start = Instant::now();

        self.loading = true;
        self.error = None;
        let result = self.hydrate_inner(cancel).instrument(span.clone()).await;
        self.loading = false;

        let _guard = span.enter();
        record_duration("duration_ms", start.elapsed());
        span.record("catalog.source", tracing::field::display(self.source));
        span.record("catalog.count", self.models.len() as u64);
        result
    }

    async fn hydrate_inner(&mut self, cancel: &CancellationToken) -> Result<CatalogSource> {
        let mut last_error: Option<CatalogError> = None;
        let endpoints = self.endpoints.clone();

        for endpoint in &endpoints {
            let attempt = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!("model catalog hydration cancelled");
                    return Err(CatalogError::Cancelled);
                }
                attempt = self.client.fetch(&endpoint.url) => attempt,
            };

            match attempt {
                Ok(models) => {
                    let count = models.len();
                    self.apply(models, endpoint.source);
                    tracing::info!(
                        endpoint = %endpoint.url,
                        count,
                        "{}",
                        match endpoint.source {
                            CatalogSource::Remote => "Hydrated OpenRouter models from remote endpoint",
                            _ => "Hydrated OpenRouter models from static asset",
                        }
                    );
                    return Ok(endpoint.source);
                }
                Err(e) => {
                    tracing::warn!(
                        endpoint = %endpoint.url,
                        error = %e,
                        "OpenRouter model catalog fetch failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        let message = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "OpenRouter model catalog unavailable".to_string());
        self.models = fallback_models();
        self.source = CatalogSource::Bundled;
        self.active_model_id = DEFAULT_OPENROUTER_MODEL_ID.to_string();
        tracing::warn!(
            error = %message,
            count = self.models.len(),
            "Falling back to bundled OpenRouter model catalog"
        );
        self.error = Some(message);
        Ok(CatalogSource::Bundled)
    }

    fn apply(&mut self, models: Vec<OpenRouterModel>, source: CatalogSource) {
        if !models.iter().any(|m| m.id == self.active_model_id) {
            let next = models
                .iter()
                .find(|m| m.id == DEFAULT_OPENROUTER_MODEL_ID)
                .or_else(|| models.first())
                .map(|m| m.id.clone())
                .unwrap_or_else(|| DEFAULT_OPENROUTER_MODEL_ID.to_string());
            tracing::debug!(from = %self.active_model_id, to = %next, "active model not in catalog");
            self.active_model_id = next;
        }
        self.models = models;
        self.source = source;
    }
}
