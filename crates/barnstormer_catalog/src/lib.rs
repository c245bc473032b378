//! OpenRouter model catalog.
//!
//! [ModelCatalog::hydrate] tries the remote endpoint, then the static asset,
//! and settles on the bundled list when both fail. It runs once per catalog
//! and can be cancelled.

pub mod catalog;
pub mod client;
pub mod error;
pub mod model;

pub use barnstormer_constant::catalog::DEFAULT_OPENROUTER_MODEL_ID;
pub use catalog::{CatalogSource, ModelCatalog};
pub use client::{catalog_endpoints, CatalogClient, CatalogEndpoint};
pub use error::{CatalogError, Result};
pub use model::{fallback_models, normalize_model, ModelPricing, OpenRouterModel, OpenRouterModelResponse};
