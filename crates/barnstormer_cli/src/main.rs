//! CLI entry point for Barnstormer.

mod cli;
mod commands;
mod output;

use std::path::Path;
use std::sync::Arc;

use barnstormer_constant::app;
use barnstormer_observability::ObservabilityConfig;
use clap::Parser;

use crate::cli::Cli;

/// Walks up from `start` (at most 32 levels) and returns the first existing `relative` path.
fn find_upwards(start: &Path, relative: &str) -> Option<std::path::PathBuf> {
    start
        .ancestors()
        .take(32)
        .map(|dir| dir.join(relative))
        .find(|candidate| candidate.is_file())
}

/// Load environment files before anything reads the process environment.
/// Order: 1) ~/.barnstormer/env  2) nearest project .env. Existing variables are never overwritten.
fn load_env_files() {
    if let Some(home) = dirs::home_dir() {
        let global = home.join(app::DATA_DIR).join(app::ENV_FILE);
        if global.is_file() {
            let _ = dotenvy::from_path(&global);
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(project_env) = find_upwards(&cwd, ".env") {
            let _ = dotenvy::from_path(&project_env);
        }
    }
}

fn init_observability(cli: &Cli, telemetry: bool) {
    let mut config = ObservabilityConfig::from_env()
        .with_version(app::VERSION)
        .with_telemetry(telemetry)
        .with_console(false)
        .with_log_sink(Arc::new(output::log_entry));
    if cli.verbose {
        config = config.with_log_level("debug");
    } else if config.log_level.is_none() {
        config = config.with_log_level("warn");
    }

    if let Err(e) = barnstormer_observability::init(config) {
        output::warning(&e.to_string());
    }
}

#[tokio::main]
async fn main() {
    load_env_files();
    let cli = Cli::parse();
    output::init(cli.output);
    let telemetry = commands::config::telemetry_enabled(commands::config::load_options()).await;
    init_observability(&cli, telemetry);

    let result = commands::handle(cli).await;
    barnstormer_observability::shutdown();

    if let Err(e) = result {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
