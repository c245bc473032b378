//! `barnstormer layout` subcommands.
//!
//! Each invocation restores the saved layout, replays one gesture or toggle
//! through the layout store and saves the result.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;
use barnstormer_config::SqliteStore;
use barnstormer_constant::layout::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};
use barnstormer_core::{
    ChatDockMode, FloatingPanel, LayoutSnapshot, PanelId, PanelPatch, PanelState, PointerEvent,
    Viewport, WorkspaceLayout,
};
use barnstormer_observability::{gesture_span, record_error};
use serde::Deserialize;

use crate::cli::LayoutAction;
use crate::commands::config::indexed_store;
use crate::output;

const LAYOUT_KEY: &str = "barnstormer.layout";
const POINTER_ID: i32 = 1;

#[derive(Deserialize)]
struct StoredLayout {
    panels: Vec<PanelState>,
    chat_dock_mode: ChatDockMode,
    #[serde(default)]
    settings_open: bool,
    #[serde(default)]
    share_menu_open: bool,
}

impl StoredLayout {
    fn apply_to(self, layout: &mut WorkspaceLayout) {
        for panel in self.panels {
            let patch = PanelPatch {
                title: Some(panel.title),
                x: Some(panel.x),
                y: Some(panel.y),
                width: Some(panel.width),
                height: Some(panel.height),
                visible: Some(panel.visible),
            };
            layout.update_panel(panel.id, patch);
        }
        layout.set_chat_dock_mode(self.chat_dock_mode);
        layout.set_settings_open(self.settings_open);
        layout.set_share_menu_open(self.share_menu_open);
    }
}

fn restore(store: &SqliteStore) -> Result<WorkspaceLayout> {
    let mut layout = WorkspaceLayout::new();
    if let Some(raw) = store.get_item_blocking(LAYOUT_KEY)? {
        match serde_json::from_str::<StoredLayout>(&raw) {
            Ok(stored) => stored.apply_to(&mut layout),
            Err(e) => tracing::warn!(error = %e, "ignoring unreadable saved layout"),
        }
    }
    Ok(layout)
}

fn save(store: &SqliteStore, layout: &WorkspaceLayout) -> Result<()> {
    let raw = serde_json::to_string(&*layout.snapshot())?;
    store.set_item(LAYOUT_KEY, &raw)?;
    Ok(())
}

pub async fn handle(action: LayoutAction) -> Result<()> {
    let store = indexed_store()?;
    let mut layout = restore(&store)?;

    match action {
        LayoutAction::Show => {}
        LayoutAction::Drag {
            panel,
            dx,
            dy,
            viewport,
        } => {
            let viewport = viewport
                .unwrap_or_else(|| Viewport::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT));
            let commits = drag(&mut layout, panel, (dx, dy), viewport)?;
            save(&store, &layout)?;
            output::success(&format!("Dragged {panel} ({commits} update(s))"));
        }
        LayoutAction::Resize { panel, dx, dy } => {
            let viewport = Viewport::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT);
            let commits = resize(&mut layout, panel, (dx, dy), viewport)?;
            save(&store, &layout)?;
            output::success(&format!("Resized {panel} ({commits} update(s))"));
        }
        LayoutAction::Toggle { panel } => {
            layout.toggle_panel(panel, None);
            save(&store, &layout)?;
            let state = if layout.panel(panel).visible { "shown" } else { "hidden" };
            output::success(&format!("{panel} panel {state}"));
        }
        LayoutAction::Dock { mode } => {
            layout.set_chat_dock_mode(mode);
            save(&store, &layout)?;
            output::success(&format!("Chat docked {mode}"));
        }
        LayoutAction::Reset => {
            store.remove_item(LAYOUT_KEY)?;
            layout = WorkspaceLayout::new();
            output::success("Layout reset to defaults");
        }
    }

    print_layout(&layout.snapshot());
    Ok(())
}

/// Counts commits that touch `panel` while `f` runs.
fn counting_commits(
    layout: &mut WorkspaceLayout,
    panel: PanelId,
    f: impl FnOnce(&mut WorkspaceLayout) -> Result<()>,
) -> Result<usize> {
    let commits = Rc::new(Cell::new(0usize));
    let counter = commits.clone();
    let subscription = layout.subscribe_panel(panel, move |_| counter.set(counter.get() + 1));
    let result = f(layout);
    layout.unsubscribe(subscription);
    result.map(|()| commits.get())
}

fn hidden_panel(panel: PanelId) -> anyhow::Error {
    let err = anyhow::anyhow!("{panel} panel is hidden; toggle it first");
    record_error(&*err);
    err
}

fn fixed_size_panel(panel: PanelId) -> anyhow::Error {
    let err = anyhow::anyhow!("{panel} panel cannot be resized");
    record_error(&*err);
    err
}

/// Presses inside the header, moves by `delta` and releases.
fn drag(
    layout: &mut WorkspaceLayout,
    panel: PanelId,
    delta: (f64, f64),
    viewport: Viewport,
) -> Result<usize> {
    let span = gesture_span!(panel.as_str(), "drag");
    let _guard = span.enter();

    counting_commits(layout, panel, |layout| {
        let state = layout.panel(panel).clone();
        let (start_x, start_y) = (state.x + 12.0, state.y + 12.0);
        let mut floating = FloatingPanel::for_panel(panel);
        if !floating.header_pointer_down(layout, PointerEvent::new(POINTER_ID, start_x, start_y)) {
            return Err(hidden_panel(panel));
        }
        let end = PointerEvent::new(POINTER_ID, start_x + delta.0, start_y + delta.1);
        floating.pointer_move(layout, viewport, end);
        floating.pointer_up(end);
        Ok(())
    })
}

/// Presses the bottom-right handle, moves by `delta` and releases.
fn resize(
    layout: &mut WorkspaceLayout,
    panel: PanelId,
    delta: (f64, f64),
    viewport: Viewport,
) -> Result<usize> {
    let span = gesture_span!(panel.as_str(), "resize");
    let _guard = span.enter();

    counting_commits(layout, panel, |layout| {
        let state = layout.panel(panel).clone();
        let (start_x, start_y) = (state.x + state.width, state.y + state.height);
        let mut floating = FloatingPanel::for_panel(panel);
        if !floating.is_resizable() {
            return Err(fixed_size_panel(panel));
        }
        if !floating.resize_pointer_down(layout, PointerEvent::new(POINTER_ID, start_x, start_y)) {
            return Err(hidden_panel(panel));
        }
        let end = PointerEvent::new(POINTER_ID, start_x + delta.0, start_y + delta.1);
        floating.pointer_move(layout, viewport, end);
        floating.pointer_up(end);
        Ok(())
    })
}

fn print_layout(snapshot: &LayoutSnapshot) {
    output::data("layout", snapshot);
    if output::is_json() {
        return;
    }
    let mut table = output::table(&["Panel", "Title", "X", "Y", "Width", "Height", "Visible"]);
    for panel in snapshot.panels() {
        output::table_row(
            &mut table,
            vec![
                panel.id.to_string(),
                panel.title.clone(),
                format!("{:.0}", panel.x),
                format!("{:.0}", panel.y),
                format!("{:.0}", panel.width),
                format!("{:.0}", panel.height),
                if panel.visible { "yes" } else { "no" }.to_string(),
            ],
        );
    }
    println!("{table}");
    output::kv("chat dock", snapshot.chat_dock_mode.as_str());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(1280.0, 800.0)
    }

    #[test]
    fn test_drag_clamps_to_viewport() {
        let mut layout = WorkspaceLayout::new();
        let commits = drag(&mut layout, PanelId::Library, (5000.0, -500.0), viewport()).unwrap();
        assert_eq!(commits, 1);
        let panel = layout.panel(PanelId::Library);
        assert_eq!(panel.x, 1280.0 - 320.0 - 16.0);
        assert_eq!(panel.y, 64.0);
    }

    #[test]
    fn test_drag_hidden_panel_fails() {
        let mut layout = WorkspaceLayout::new();
        assert!(drag(&mut layout, PanelId::Models, (10.0, 10.0), viewport()).is_err());
        assert_eq!(layout.panel(PanelId::Models).x, 760.0);
    }

    #[test]
    fn test_resize_has_floor() {
        let mut layout = WorkspaceLayout::new();
        resize(&mut layout, PanelId::Library, (-1000.0, 40.0), viewport()).unwrap();
        let panel = layout.panel(PanelId::Library);
        assert_eq!(panel.width, 240.0);
        assert_eq!(panel.height, 460.0);
    }

    #[test]
    fn test_resize_fixed_size_panel_fails() {
        let mut layout = WorkspaceLayout::new();
        let before = layout.panel(PanelId::Agents).clone();
        let err = resize(&mut layout, PanelId::Agents, (100.0, 0.0), viewport()).unwrap_err();
        assert!(err.to_string().contains("cannot be resized"));
        assert_eq!(*layout.panel(PanelId::Agents), before);

        layout.toggle_panel(PanelId::Models, Some(true));
        assert!(resize(&mut layout, PanelId::Models, (100.0, 0.0), viewport()).is_err());
    }

    #[test]
    fn test_layout_survives_save_and_restore() {
        let store = SqliteStore::in_memory().unwrap();
        let mut layout = WorkspaceLayout::new();
        layout.toggle_panel(PanelId::Models, None);
        layout.set_chat_dock_mode(ChatDockMode::Vertical);
        drag(&mut layout, PanelId::Agents, (-100.0, 50.0), viewport()).unwrap();
        save(&store, &layout).unwrap();

        let restored = restore(&store).unwrap();
        assert_eq!(*restored.snapshot(), *layout.snapshot());
    }

    #[test]
    fn test_unreadable_layout_falls_back_to_defaults() {
        let store = SqliteStore::in_memory().unwrap();
        store.set_item(LAYOUT_KEY, "{not json").unwrap();
        let restored = restore(&store).unwrap();
        assert_eq!(*restored.snapshot(), LayoutSnapshot::default());
    }
}
