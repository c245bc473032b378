//! `barnstormer catalog` subcommands.

use anyhow::Result;
use barnstormer_catalog::{catalog_endpoints, CatalogClient, CatalogError, ModelCatalog};
use barnstormer_constant::catalog::CATALOG_URL_ENV;
use tokio_util::sync::CancellationToken;

use crate::cli::CatalogAction;
use crate::commands::config;
use crate::output;

pub async fn handle(action: CatalogAction) -> Result<()> {
    match action {
        CatalogAction::List => list().await,
    }
}

/// Catalog for the configured backend. `OPENROUTER_MODEL_CATALOG_URL` replaces the remote endpoint.
pub async fn catalog_for_config() -> Result<ModelCatalog> {
    let (app_config, _) = config::load().await?;
    let remote_override = std::env::var(CATALOG_URL_ENV).ok();
    let endpoints = catalog_endpoints(&app_config.backend_url, remote_override.as_deref())?;
    Ok(ModelCatalog::new(CatalogClient::new(), endpoints))
}

async fn list() -> Result<()> {
    let mut catalog = catalog_for_config().await?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let spinner = output::spinner("Loading OpenRouter models…");
    let outcome = catalog.hydrate(&cancel).await;
    watcher.abort();

    match outcome {
        Ok(_) if catalog.error().is_some() => output::spinner_warning(&spinner, &catalog.status_line()),
        Ok(source) => output::spinner_success(
            &spinner,
            &format!("{} (source: {source})", catalog.status_line()),
        ),
        Err(CatalogError::Cancelled) => {
            output::spinner_warning(&spinner, "Catalog fetch cancelled, showing bundled models");
        }
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    }

    let models = catalog.models_sorted();
    let mut table = output::table(&["Model", "Name", "Context", "Tags"]);
    for model in &models {
        let marker = if model.id == catalog.active_model_id() { "* " } else { "" };
        output::table_row(
            &mut table,
            vec![
                format!("{marker}{}", model.id),
                model.name.clone(),
                model
                    .context_length
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                model.tags.as_ref().map(|t| t.join(", ")).unwrap_or_default(),
            ],
        );
    }
    output::table_print(&table, &models);
    output::kv("active", catalog.active_model_id());
    Ok(())
}
