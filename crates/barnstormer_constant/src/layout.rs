//! Floating-panel geometry constants.

/// Width and height never drop below this floor.
pub const PANEL_MIN_SIZE: f64 = 240.0;
/// Horizontal gap kept between a panel and the viewport edges.
pub const PANEL_EDGE_MARGIN: f64 = 16.0;
/// Height of the fixed top chrome bar; also reserved at the bottom.
pub const TOP_CHROME_HEIGHT: f64 = 64.0;

/// Viewport assumed by the CLI when none is given.
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;
