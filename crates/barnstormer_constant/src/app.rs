//! Application metadata constants

pub const NAME: &str = "barnstormer";
pub const DISPLAY_NAME: &str = "Barnstormer";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = "Collaborative whiteboard shell with an agent-chat side panel";

/// Directory name for per-user data (under the home directory)
pub const DATA_DIR: &str = ".barnstormer";
/// SQLite file backing the indexed (this-device) store
pub const INDEXED_DB: &str = "indexed.db";
/// Dotenv-format credentials file backing the secure store
pub const CREDENTIALS_FILE: &str = "credentials";
/// Optional dotenv file loaded by the CLI before config resolution
pub const ENV_FILE: &str = "env";
