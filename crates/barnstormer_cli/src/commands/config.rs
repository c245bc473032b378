//! `barnstormer config` subcommands, plus the store and loader wiring shared by other commands.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use barnstormer_config::descriptor::DESCRIPTORS;
use barnstormer_config::parse::{parse_boolean, parse_json_flags};
use barnstormer_config::{
    load_env_config, load_env_config_with_sources, AppConfig, AppConfigKeys, ConfigField, ConfigLoadOptions,
    ConfigSource, CredentialFileStore, SqliteStore,
};
use serde::Serialize;
use serde_json::Value;

use crate::cli::ConfigAction;
use crate::output;

pub async fn handle(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show { reveal } => show(reveal).await,
        ConfigAction::Keys => keys(),
        ConfigAction::SetFlag { name, value } => set_flag(&name, &value),
        ConfigAction::UnsetFlag { name } => unset_flag(&name),
    }
}

/// Opens `~/.barnstormer/indexed.db`.
pub fn indexed_store() -> Result<SqliteStore> {
    SqliteStore::open_default().context("open indexed store")
}

/// Options for the real process: environment, credentials file and indexed store.
/// An indexed store that cannot be opened is skipped with a warning.
pub fn load_options() -> ConfigLoadOptions {
    let mut options = ConfigLoadOptions::from_process_env();
    if let Some(path) = CredentialFileStore::default_path() {
        options = options.with_secure_store(Arc::new(CredentialFileStore::new(path)));
    }
    match indexed_store() {
        Ok(store) => options = options.with_indexed_store(Arc::new(store)),
        Err(e) => tracing::warn!(error = %e, "indexed store unavailable, skipping that tier"),
    }
    options
}

pub async fn load() -> Result<(AppConfig, BTreeMap<ConfigField, ConfigSource>)> {
    Ok(load_env_config_with_sources(load_options()).await?)
}

/// Resolved `telemetryEnabled`. A configuration that fails validation falls back to the default.
pub async fn telemetry_enabled(options: ConfigLoadOptions) -> bool {
    match load_env_config(options).await {
        Ok(config) => config.telemetry_enabled,
        Err(_) => AppConfig::default().telemetry_enabled,
    }
}

fn display_value(field: ConfigField, value: &Value, reveal: bool) -> Value {
    match value {
        Value::String(s) if field.is_secret() && !reveal => Value::String(output::mask_secret(s)),
        other => other.clone(),
    }
}

#[derive(Serialize)]
struct FieldRow {
    field: &'static str,
    value: Value,
    source: ConfigSource,
}

async fn show(reveal: bool) -> Result<()> {
    let (config, sources) = load().await?;
    let values = serde_json::to_value(&config)?;

    let rows: Vec<FieldRow> = ConfigField::ALL
        .into_iter()
        .map(|field| FieldRow {
            field: field.as_str(),
            value: display_value(field, &values[field.as_str()], reveal),
            source: sources
                .get(&field)
                .copied()
                .unwrap_or(ConfigSource::Default),
        })
        .collect();

    output::header("Configuration");
    let mut table = output::table(&["Field", "Value", "Source"]);
    for row in &rows {
        let value = match &row.value {
            Value::Null => "-".to_string(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        output::table_row(&mut table, vec![row.field.to_string(), value, row.source.to_string()]);
    }
    output::table_print(&table, &rows);
    Ok(())
}

#[derive(Serialize)]
struct KeyRow {
    variable: &'static str,
    field: &'static str,
    tiers: String,
    set: bool,
}

fn keys() -> Result<()> {
    let rows: Vec<KeyRow> = DESCRIPTORS
        .iter()
        .filter_map(|d| {
            let variable = d.env?;
            let mut tiers = vec!["env"];
            if d.secure.is_some() {
                tiers.push("secure");
            }
            if d.indexed.is_some() {
                tiers.push("indexed");
            }
            Some(KeyRow {
                variable,
                field: d.field.as_str(),
                tiers: tiers.join(", "),
                set: std::env::var_os(variable).is_some(),
            })
        })
        .collect();

    output::header("Environment variables");
    let mut table = output::table(&["Variable", "Field", "Tiers", "Set"]);
    for row in &rows {
        output::table_row(
            &mut table,
            vec![
                row.variable.to_string(),
                row.field.to_string(),
                row.tiers.clone(),
                if row.set { "yes" } else { "no" }.to_string(),
            ],
        );
    }
    output::table_print(&table, &rows);
    if let Some(path) = CredentialFileStore::default_path() {
        output::dim(&format!("API keys are also read from {}", path.display()));
    }
    Ok(())
}

fn stored_flags(store: &SqliteStore) -> Result<serde_json::Map<String, Value>> {
    let raw = store.get_item_blocking(AppConfigKeys::FEATURE_FLAGS)?;
    Ok(match raw.as_deref().and_then(parse_json_flags) {
        Some(Value::Object(map)) => map,
        _ => serde_json::Map::new(),
    })
}

fn save_flags(store: &SqliteStore, flags: &serde_json::Map<String, Value>) -> Result<()> {
    let raw = serde_json::to_string(flags)?;
    store.set_item(AppConfigKeys::FEATURE_FLAGS, &raw)?;
    output::data("featureFlags", flags);
    Ok(())
}

fn set_flag(name: &str, value: &str) -> Result<()> {
    let enabled = parse_boolean(value)
        .ok_or_else(|| anyhow!("'{value}' is not a boolean (use true/false, 1/0, yes/no, on/off)"))?;
    let store = indexed_store()?;
    let mut flags = stored_flags(&store)?;
    flags.insert(name.to_string(), enabled.clone());
    save_flags(&store, &flags)?;
    output::success(&format!("Feature flag {name} = {enabled}"));
    if std::env::var_os(AppConfigKeys::FEATURE_FLAGS).is_some() {
        output::warning(&format!(
            "{} is set in the environment and takes precedence over the indexed store",
            AppConfigKeys::FEATURE_FLAGS
        ));
    }
    Ok(())
}

fn unset_flag(name: &str) -> Result<()> {
    let store = indexed_store()?;
    let mut flags = stored_flags(&store)?;
    if flags.remove(name).is_none() {
        output::warning(&format!("Feature flag {name} was not set"));
        return Ok(());
    }
    if flags.is_empty() {
        store.remove_item(AppConfigKeys::FEATURE_FLAGS)?;
    } else {
        save_flags(&store, &flags)?;
    }
    output::success(&format!("Removed feature flag {name}"));
    Ok(())
}
