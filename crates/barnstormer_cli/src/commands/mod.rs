//! Command dispatch.

pub mod agents;
pub mod catalog;
pub mod config;
pub mod layout;
pub mod libraries;

use anyhow::Result;

use crate::cli::{Cli, Command};

pub async fn handle(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Config { action } => config::handle(action).await,
        Command::Catalog { action } => catalog::handle(action).await,
        Command::Layout { action } => layout::handle(action).await,
        Command::Agents { action } => agents::handle(action).await,
        Command::Libraries { action } => libraries::handle(action).await,
    }
}
