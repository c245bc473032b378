//! Pointer-driven drag and resize for floating panels.
//!
//! A [FloatingPanel] captures one pointer at a time. While a gesture is
//! active, events from any other pointer are dropped, including a second
//! press on the same header and that pointer's eventual release.

use barnstormer_constant::layout::{PANEL_EDGE_MARGIN, PANEL_MIN_SIZE, TOP_CHROME_HEIGHT};

use crate::layout::{PanelId, PanelPatch, WorkspaceLayout};

/// Visible window area in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Pointer sample in viewport (client) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: i32,
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerEvent {
    pub fn new(pointer_id: i32, client_x: f64, client_y: f64) -> Self {
        Self {
            pointer_id,
            client_x,
            client_y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Resize,
}

/// Values recorded on press; every move is computed against them.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Baseline {
    kind: GestureKind,
    pointer_id: i32,
    origin_x: f64,
    origin_y: f64,
    /// Panel x (drag) or width (resize) at press
    start_a: f64,
    /// Panel y (drag) or height (resize) at press
    start_b: f64,
    /// Panel width at press, used for the drag's right bound
    width: f64,
}

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Position for a drag from `start` by the pointer delta, kept inside the viewport margins.
///
/// x stays in `[16, viewport.width - width - 16]` and y in `[64, viewport.height - 64]`.
/// When the window is too small the lower bound wins.
pub fn drag_position(
    start: (f64, f64),
    delta: (f64, f64),
    width: f64,
    viewport: Viewport,
) -> (f64, f64) {
    let max_x = viewport.width - width - PANEL_EDGE_MARGIN;
    let max_y = viewport.height - TOP_CHROME_HEIGHT;
    (
        clamp(
            start.0 + delta.0,
            PANEL_EDGE_MARGIN,
            max_x.max(PANEL_EDGE_MARGIN),
        ),
        clamp(
            start.1 + delta.1,
            TOP_CHROME_HEIGHT,
            max_y.max(TOP_CHROME_HEIGHT),
        ),
    )
}

/// Size for a resize from `start` by the pointer delta. Floored, never capped.
pub fn resize_dimensions(start: (f64, f64), delta: (f64, f64)) -> (f64, f64) {
    (
        (start.0 + delta.0).max(PANEL_MIN_SIZE),
        (start.1 + delta.1).max(PANEL_MIN_SIZE),
    )
}

/// Gesture controller for one panel.
#[derive(Debug, Clone)]
pub struct FloatingPanel {
    id: PanelId,
    resizable: bool,
    active: Option<Baseline>,
}

impl FloatingPanel {
    pub fn new(id: PanelId) -> Self {
        Self {
            id,
            resizable: false,
            active: None,
        }
    }

    /// Controller configured with the panel's own resize capability.
    pub fn for_panel(id: PanelId) -> Self {
        Self::new(id).resizable(id.resizable())
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    /// Pointer currently captured, if any.
    pub fn captured_pointer(&self) -> Option<i32> {
        self.active.map(|b| b.pointer_id)
    }

    pub fn active_gesture(&self) -> Option<GestureKind> {
        self.active.map(|b| b.kind)
    }

    /// Press on the header. Returns whether the pointer was captured for a drag.
    pub fn header_pointer_down(&mut self, layout: &WorkspaceLayout, event: PointerEvent) -> bool {
        self.begin(layout, GestureKind::Drag, event)
    }

    /// Press on the resize handle. Ignored unless the panel is resizable.
    pub fn resize_pointer_down(&mut self, layout: &WorkspaceLayout, event: PointerEvent) -> bool {
        if !self.resizable {
            return false;
        }
        self.begin(layout, GestureKind::Resize, event)
    }

    /// Applies a move from the captured pointer. Returns whether anything was committed.
    pub fn pointer_move(
        &mut self,
        layout: &mut WorkspaceLayout,
        viewport: Viewport,
        event: PointerEvent,
    ) -> bool {
        let Some(baseline) = self.active else {
            return false;
        };
        if baseline.pointer_id != event.pointer_id {
            return false;
        }
        let delta = (
            event.client_x - baseline.origin_x,
            event.client_y - baseline.origin_y,
        );
        let patch = match baseline.kind {
            GestureKind::Drag => {
                let (x, y) = drag_position(
                    (baseline.start_a, baseline.start_b),
                    delta,
                    baseline.width,
                    viewport,
                );
                PanelPatch::position(x, y)
            }
            GestureKind::Resize => {
                let (width, height) =
                    resize_dimensions((baseline.start_a, baseline.start_b), delta);
                PanelPatch::size(width, height)
            }
        };
        layout.update_panel(self.id, patch);
        true
    }

    /// Releases capture if `event` comes from the captured pointer.
    pub fn pointer_up(&mut self, event: PointerEvent) -> bool {
        match self.active {
            Some(baseline) if baseline.pointer_id == event.pointer_id => {
                tracing::debug!(panel = %self.id, pointer = event.pointer_id, kind = ?baseline.kind, "gesture released");
                self.active = None;
                true
            }
            _ => false,
        }
    }

    fn begin(&mut self, layout: &WorkspaceLayout, kind: GestureKind, event: PointerEvent) -> bool {
        let state = layout.panel(self.id);
        if !state.visible {
            return false;
        }
        if let Some(active) = self.active {
            tracing::debug!(
                panel = %self.id,
                active_pointer = active.pointer_id,
                ignored_pointer = event.pointer_id,
                "gesture already active, ignoring press"
            );
            return false;
        }
        let (start_a, start_b) = match kind {
            GestureKind::Drag => (state.x, state.y),
            GestureKind::Resize => (state.width, state.height),
        };
        self.active = Some(Baseline {
            kind,
            pointer_id: event.pointer_id,
            origin_x: event.client_x,
            origin_y: event.client_y,
            start_a,
            start_b,
            width: state.width,
        });
        tracing::debug!(panel = %self.id, pointer = event.pointer_id, kind = ?kind, "gesture captured");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 1280.0,
        height: 800.0,
    };

    fn drag(layout: &mut WorkspaceLayout, id: PanelId, dx: f64, dy: f64) {
        let mut panel = FloatingPanel::new(id);
        assert!(panel.header_pointer_down(layout, PointerEvent::new(1, 100.0, 100.0)));
        assert!(panel.pointer_move(layout, VIEWPORT, PointerEvent::new(1, 100.0 + dx, 100.0 + dy)));
        assert!(panel.pointer_up(PointerEvent::new(1, 100.0 + dx, 100.0 + dy)));
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 16.0, 100.0), 16.0);
        assert_eq!(clamp(500.0, 16.0, 100.0), 100.0);
        assert_eq!(clamp(50.0, 16.0, 100.0), 50.0);
    }

    #[test]
    fn test_drag_moves_by_delta() {
        let mut layout = WorkspaceLayout::new();
        drag(&mut layout, PanelId::Library, 50.0, 30.0);
        let panel = layout.panel(PanelId::Library);
        assert_eq!((panel.x, panel.y), (82.0, 150.0));
    }

    #[test]
    fn test_drag_clamps_to_right_edge() {
        // width 320 in a 1280 viewport: 1280 - 320 - 16 = 944
        let mut layout = WorkspaceLayout::new();
        drag(&mut layout, PanelId::Library, 2000.0, 0.0);
        assert_eq!(layout.panel(PanelId::Library).x, 944.0);
    }

    #[test]
    fn test_drag_clamps_to_top_chrome_and_left_margin() {
        let mut layout = WorkspaceLayout::new();
        drag(&mut layout, PanelId::Library, -1000.0, -1000.0);
        let panel = layout.panel(PanelId::Library);
        assert_eq!((panel.x, panel.y), (16.0, 64.0));
    }

    #[test]
    fn test_drag_clamps_to_bottom() {
        let mut layout = WorkspaceLayout::new();
        drag(&mut layout, PanelId::Agents, 0.0, 5000.0);
        assert_eq!(layout.panel(PanelId::Agents).y, 800.0 - 64.0);
    }

    #[test]
    fn test_drag_in_narrow_window_floors_at_margins() {
        let pos = drag_position((32.0, 120.0), (500.0, 500.0), 320.0, Viewport::new(200.0, 100.0));
        assert_eq!(pos, (16.0, 64.0));
    }

    #[test]
    fn test_resize_floors_at_minimum() {
        let mut layout = WorkspaceLayout::new();
        let mut panel = FloatingPanel::new(PanelId::Library).resizable(true);
        assert!(panel.resize_pointer_down(&layout, PointerEvent::new(7, 400.0, 400.0)));
        panel.pointer_move(&mut layout, VIEWPORT, PointerEvent::new(7, -600.0, -600.0));
        let state = layout.panel(PanelId::Library);
        assert_eq!((state.width, state.height), (240.0, 240.0));
    }

    #[test]
    fn test_resize_grows_without_maximum() {
        let mut layout = WorkspaceLayout::new();
        let mut panel = FloatingPanel::new(PanelId::Agents).resizable(true);
        panel.resize_pointer_down(&layout, PointerEvent::new(1, 0.0, 0.0));
        panel.pointer_move(&mut layout, VIEWPORT, PointerEvent::new(1, 5000.0, 10.0));
        let state = layout.panel(PanelId::Agents);
        assert_eq!((state.width, state.height), (5360.0, 490.0));
    }

    #[test]
    fn test_resize_ignored_when_not_resizable() {
        let layout = WorkspaceLayout::new();
        let mut panel = FloatingPanel::new(PanelId::Library);
        assert!(!panel.resize_pointer_down(&layout, PointerEvent::new(1, 0.0, 0.0)));
        assert_eq!(panel.captured_pointer(), None);
    }

    #[test]
    fn test_for_panel_follows_panel_resizability() {
        let layout = WorkspaceLayout::new();
        let mut library = FloatingPanel::for_panel(PanelId::Library);
        assert!(library.is_resizable());
        assert!(library.resize_pointer_down(&layout, PointerEvent::new(1, 352.0, 540.0)));

        let mut agents = FloatingPanel::for_panel(PanelId::Agents);
        assert!(!agents.is_resizable());
        assert!(!agents.resize_pointer_down(&layout, PointerEvent::new(1, 0.0, 0.0)));
        assert_eq!(agents.captured_pointer(), None);
    }

    #[test]
    fn test_moves_are_computed_from_press_baseline() {
        let mut layout = WorkspaceLayout::new();
        let mut panel = FloatingPanel::new(PanelId::Library);
        panel.header_pointer_down(&layout, PointerEvent::new(1, 10.0, 10.0));
        panel.pointer_move(&mut layout, VIEWPORT, PointerEvent::new(1, 20.0, 20.0));
        panel.pointer_move(&mut layout, VIEWPORT, PointerEvent::new(1, 30.0, 30.0));
        let state = layout.panel(PanelId::Library);
        assert_eq!((state.x, state.y), (52.0, 140.0));
    }

    #[test]
    fn test_second_pointer_is_ignored() {
        let mut layout = WorkspaceLayout::new();
        let mut panel = FloatingPanel::new(PanelId::Library);
        assert!(panel.header_pointer_down(&layout, PointerEvent::new(1, 0.0, 0.0)));
        assert!(!panel.header_pointer_down(&layout, PointerEvent::new(2, 0.0, 0.0)));

        assert!(!panel.pointer_move(&mut layout, VIEWPORT, PointerEvent::new(2, 300.0, 300.0)));
        assert_eq!(layout.panel(PanelId::Library).x, 32.0);

        assert!(!panel.pointer_up(PointerEvent::new(2, 300.0, 300.0)));
        assert_eq!(panel.captured_pointer(), Some(1));

        assert!(panel.pointer_move(&mut layout, VIEWPORT, PointerEvent::new(1, 10.0, 0.0)));
        assert_eq!(layout.panel(PanelId::Library).x, 42.0);
    }

    #[test]
    fn test_moves_after_release_are_dropped() {
        let mut layout = WorkspaceLayout::new();
        let mut panel = FloatingPanel::new(PanelId::Library);
        panel.header_pointer_down(&layout, PointerEvent::new(1, 0.0, 0.0));
        panel.pointer_up(PointerEvent::new(1, 0.0, 0.0));
        assert!(!panel.pointer_move(&mut layout, VIEWPORT, PointerEvent::new(1, 100.0, 100.0)));
        assert_eq!(panel.active_gesture(), None);
    }

    #[test]
    fn test_hidden_panel_cannot_be_dragged() {
        let layout = WorkspaceLayout::new();
        let mut panel = FloatingPanel::new(PanelId::Models);
        assert!(!panel.header_pointer_down(&layout, PointerEvent::new(1, 0.0, 0.0)));
    }

    #[test]
    fn test_different_panels_drag_independently() {
        let mut layout = WorkspaceLayout::new();
        let mut library = FloatingPanel::new(PanelId::Library);
        let mut agents = FloatingPanel::new(PanelId::Agents);
        library.header_pointer_down(&layout, PointerEvent::new(1, 0.0, 0.0));
        agents.header_pointer_down(&layout, PointerEvent::new(2, 0.0, 0.0));
        library.pointer_move(&mut layout, VIEWPORT, PointerEvent::new(1, 10.0, 0.0));
        agents.pointer_move(&mut layout, VIEWPORT, PointerEvent::new(2, 0.0, 10.0));
        assert_eq!(layout.panel(PanelId::Library).x, 42.0);
        assert_eq!(layout.panel(PanelId::Agents).y, 130.0);
    }
}
