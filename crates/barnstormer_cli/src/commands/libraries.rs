//! `barnstormer libraries` subcommands.

use std::collections::BTreeSet;

use anyhow::{anyhow, Result};
use barnstormer_config::SqliteStore;
use barnstormer_core::library::{builtin_libraries, toggle_library};
use barnstormer_core::LibraryEntry;

use crate::cli::LibrariesAction;
use crate::commands::config::indexed_store;
use crate::output;

/// JSON array of enabled library ids
const ENABLED_KEY: &str = "barnstormer.libraries.enabled";

pub async fn handle(action: LibrariesAction) -> Result<()> {
    let store = indexed_store()?;
    let libraries = restore(&store)?;
    match action {
        LibrariesAction::List => print(&libraries),
        LibrariesAction::Toggle { id } => {
            if !libraries.iter().any(|l| l.id == id) {
                return Err(anyhow!("Unknown library '{id}'"));
            }
            let next = toggle_library(&libraries, &id);
            save(&store, &next)?;
            let enabled = next.iter().any(|l| l.id == id && l.enabled);
            output::success(&format!(
                "Library {id} {}",
                if enabled { "enabled" } else { "disabled" }
            ));
            print(&next)
        }
    }
}

fn restore(store: &SqliteStore) -> Result<Vec<LibraryEntry>> {
    let mut libraries = builtin_libraries();
    let Some(raw) = store.get_item_blocking(ENABLED_KEY)? else {
        return Ok(libraries);
    };
    match serde_json::from_str::<BTreeSet<String>>(&raw) {
        Ok(enabled) => {
            for library in &mut libraries {
                library.enabled = enabled.contains(&library.id);
            }
        }
        Err(e) => tracing::warn!(error = %e, "ignoring unreadable library selection"),
    }
    Ok(libraries)
}

fn save(store: &SqliteStore, libraries: &[LibraryEntry]) -> Result<()> {
    let enabled: BTreeSet<&str> = libraries
        .iter()
        .filter(|l| l.enabled)
        .map(|l| l.id.as_str())
        .collect();
    store.set_item(ENABLED_KEY, &serde_json::to_string(&enabled)?)?;
    Ok(())
}

fn print(libraries: &[LibraryEntry]) -> Result<()> {
    let mut table = output::table(&["Library", "Name", "Items", "License", "Enabled"]);
    for library in libraries {
        output::table_row(
            &mut table,
            vec![
                library.id.clone(),
                library.name.clone(),
                library.item_count.to_string(),
                library.license.clone(),
                if library.enabled { "yes" } else { "no" }.to_string(),
            ],
        );
    }
    output::table_print(&table, libraries);
    Ok(())
}
