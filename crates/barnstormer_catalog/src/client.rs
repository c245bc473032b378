//! HTTP access to the catalog endpoints.

use barnstormer_constant::catalog::{REMOTE_CATALOG_PATH, STATIC_CATALOG_PATH};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::catalog::CatalogSource;
use crate::error::{CatalogError, Result};
use crate::model::{normalize_model, OpenRouterModel, OpenRouterModelResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEndpoint {
    pub url: Url,
    pub source: CatalogSource,
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|source| CatalogError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

/// Remote then static endpoint for `backend_url`.
///
/// `remote_override` replaces the remote URL entirely. Paths are appended to
/// the backend URL, so a path prefix on it is kept.
pub fn catalog_endpoints(
    backend_url: &str,
    remote_override: Option<&str>,
) -> Result<Vec<CatalogEndpoint>> {
    let base = backend_url.trim_end_matches('/');
    let remote = match remote_override {
        Some(url) => parse_url(url)?,
        None => parse_url(&format!("{base}{REMOTE_CATALOG_PATH}"))?,
    };
    let fixed = parse_url(&format!("{base}{STATIC_CATALOG_PATH}"))?;
    Ok(vec![
        CatalogEndpoint {
            url: remote,
            source: CatalogSource::Remote,
        },
        CatalogEndpoint {
            url: fixed,
            source: CatalogSource::Static,
        },
    ])
}

/// `{ "data": [...] }` or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogPayload {
    Bare(Vec<OpenRouterModelResponse>),
    Wrapped {
        #[serde(default)]
        data: Vec<OpenRouterModelResponse>,
    },
}

/// Decodes a catalog body into normalized models. An empty list is an error.
pub fn parse_catalog(body: &str) -> Result<Vec<OpenRouterModel>> {
    let data = match serde_json::from_str::<CatalogPayload>(body)? {
        CatalogPayload::Bare(data) | CatalogPayload::Wrapped { data } => data,
    };
    if data.is_empty() {
        return Err(CatalogError::Empty);
    }
    Ok(data.into_iter().map(normalize_model).collect())
}

#[derive(Debug, Clone, Default)]
pub struct CatalogClient {
    client: Client,
}

impl CatalogClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, url: &Url) -> Result<Vec<OpenRouterModel>> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_catalog(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_from_backend() {
        let endpoints = catalog_endpoints("http://localhost:8787/", None).unwrap();
        assert_eq!(
            endpoints[0].url.as_str(),
            "http://localhost:8787/api/openrouter/models"
        );
        assert_eq!(endpoints[0].source, CatalogSource::Remote);
        assert_eq!(
            endpoints[1].url.as_str(),
            "http://localhost:8787/api/openrouter/models.json"
        );
        assert_eq!(endpoints[1].source, CatalogSource::Static);
    }

    #[test]
    fn test_endpoints_keep_prefix_and_override() {
        let endpoints =
            catalog_endpoints("https://example.com/app", Some("https://cdn.example.com/models"))
                .unwrap();
        assert_eq!(endpoints[0].url.as_str(), "https://cdn.example.com/models");
        assert_eq!(
            endpoints[1].url.as_str(),
            "https://example.com/app/api/openrouter/models.json"
        );
    }

    #[test]
    fn test_invalid_backend() {
        assert!(matches!(
            catalog_endpoints("not a url", None),
            Err(CatalogError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_parse_catalog_shapes() {
        let wrapped = parse_catalog(r#"{"data":[{"id":"a"},{"id":"b"}]}"#).unwrap();
        assert_eq!(wrapped.len(), 2);
        let bare = parse_catalog(r#"[{"id":"a","name":"A"}]"#).unwrap();
        assert_eq!(bare[0].name, "A");
        assert!(matches!(parse_catalog(r#"{"data":[]}"#), Err(CatalogError::Empty)));
        assert!(matches!(parse_catalog(r#"{}"#), Err(CatalogError::Empty)));
        assert!(matches!(parse_catalog("<html>"), Err(CatalogError::Decode(_))));
    }
}
