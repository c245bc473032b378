//! CLI argument definitions using clap derive macros.

use barnstormer_core::{ChatDockMode, PanelId, Viewport};
use clap::{Parser, Subcommand, ValueEnum};

/// Workspace layout, configuration and model catalog tools for Barnstormer
#[derive(Parser)]
#[command(name = "barnstormer", about, version, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output (debug logs on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format: text (human-readable) or json (machine-readable)
    #[arg(short, long, global = true, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored terminal output for humans
    #[default]
    Text,
    /// Structured JSON for scripts
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Inspect the resolved configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// OpenRouter model catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Floating panel layout (persisted in the indexed store)
    Layout {
        #[command(subcommand)]
        action: LayoutAction,
    },
    /// Agent roster and chat
    Agents {
        #[command(subcommand)]
        action: AgentsAction,
    },
    /// Shape libraries
    Libraries {
        #[command(subcommand)]
        action: LibrariesAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show every field, its value and the tier it came from
    Show {
        /// Print API keys unmasked
        #[arg(long)]
        reveal: bool,
    },
    /// List recognized environment variables and the tiers they are read from
    Keys,
    /// Set a feature flag in the indexed store
    SetFlag {
        name: String,
        /// true/false, 1/0, yes/no, on/off
        value: String,
    },
    /// Remove a feature flag from the indexed store
    UnsetFlag { name: String },
}

#[derive(Subcommand)]
pub enum CatalogAction {
    /// Fetch and list available models (Ctrl-C cancels the fetch)
    List,
}

fn parse_panel(raw: &str) -> Result<PanelId, String> {
    raw.parse::<PanelId>().map_err(|e| e.to_string())
}

fn parse_dock(raw: &str) -> Result<ChatDockMode, String> {
    raw.parse::<ChatDockMode>().map_err(|e| e.to_string())
}

/// Parses `WIDTHxHEIGHT`, e.g. `1280x800`.
fn parse_viewport(raw: &str) -> Result<Viewport, String> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{raw}'"))?;
    let width: f64 = w.trim().parse().map_err(|_| format!("invalid width '{w}'"))?;
    let height: f64 = h.trim().parse().map_err(|_| format!("invalid height '{h}'"))?;
    if width <= 0.0 || height <= 0.0 {
        return Err("viewport dimensions must be positive".to_string());
    }
    Ok(Viewport::new(width, height))
}

#[derive(Subcommand)]
pub enum LayoutAction {
    /// Show panel geometry and dock mode
    Show,
    /// Drag a panel by its header
    Drag {
        #[arg(value_parser = parse_panel)]
        panel: PanelId,
        #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
        dx: f64,
        #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
        dy: f64,
        /// Viewport size used for clamping, WIDTHxHEIGHT
        #[arg(long, value_parser = parse_viewport)]
        viewport: Option<Viewport>,
    },
    /// Resize a panel from its bottom-right handle (library only)
    Resize {
        #[arg(value_parser = parse_panel)]
        panel: PanelId,
        #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
        dx: f64,
        #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
        dy: f64,
    },
    /// Flip a panel's visibility
    Toggle {
        #[arg(value_parser = parse_panel)]
        panel: PanelId,
    },
    /// Set the agent chat dock mode (horizontal, vertical, floating)
    Dock {
        #[arg(value_parser = parse_dock)]
        mode: ChatDockMode,
    },
    /// Forget the saved layout
    Reset,
}

#[derive(Subcommand)]
pub enum AgentsAction {
    /// List agent profiles
    List,
    /// Send one message to an agent and print the transcript
    Chat {
        agent: String,
        message: String,
        /// Model id used for the reply (default: the catalog default)
        #[arg(long)]
        model: Option<String>,
        /// Also record a suggested canvas action
        #[arg(long)]
        canvas: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum LibrariesAction {
    /// List shape libraries
    List,
    /// Enable or disable a library
    Toggle { id: String },
}
