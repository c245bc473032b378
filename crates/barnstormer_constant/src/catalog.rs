//! Model catalog endpoints and defaults.

/// Model selected when nothing else is chosen or the active one disappears.
pub const DEFAULT_OPENROUTER_MODEL_ID: &str = "openrouter/x-ai/grok-4-fast:free";

/// Remote catalog path, joined onto the backend URL.
pub const REMOTE_CATALOG_PATH: &str = "/api/openrouter/models";
/// Static catalog asset path, joined onto the backend URL.
pub const STATIC_CATALOG_PATH: &str = "/api/openrouter/models.json";
/// Env var that replaces the remote catalog URL entirely.
pub const CATALOG_URL_ENV: &str = "OPENROUTER_MODEL_CATALOG_URL";
