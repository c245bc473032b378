//! Workspace layout store: floating panels, chat dock mode, dialog flags.
//!
//! [WorkspaceLayout] owns one immutable [LayoutSnapshot] at a time. Every
//! mutation builds a new snapshot, swaps it in whole and then notifies
//! observers synchronously, so a reader never sees a half-applied change.
//! Instances are independent; tests and multiple workspaces each own one.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The closed set of floating panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelId {
    Library,
    Agents,
    Models,
}

impl PanelId {
    pub const ALL: [PanelId; 3] = [PanelId::Library, PanelId::Agents, PanelId::Models];

    pub fn as_str(&self) -> &'static str {
        match self {
            PanelId::Library => "library",
            PanelId::Agents => "agents",
            PanelId::Models => "models",
        }
    }

    /// Only the library panel carries a resize handle.
    pub fn resizable(&self) -> bool {
        matches!(self, PanelId::Library)
    }

    fn index(self) -> usize {
        match self {
            PanelId::Library => 0,
            PanelId::Agents => 1,
            PanelId::Models => 2,
        }
    }
}

impl FromStr for PanelId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "library" => Ok(PanelId::Library),
            "agents" => Ok(PanelId::Agents),
            "models" => Ok(PanelId::Models),
            _ => Err(CoreError::UnknownPanel(s.to_string())),
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Position, size and visibility of one floating panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelState {
    pub id: PanelId,
    pub title: String,
    /// Pixel offset from the viewport's left edge
    pub x: f64,
    /// Pixel offset from the viewport's top edge
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub visible: bool,
}

impl PanelState {
    /// Default geometry for a panel at process start.
    pub fn default_for(id: PanelId) -> Self {
        let (title, x, y, width, height, visible) = match id {
            PanelId::Library => ("Libraries", 32.0, 120.0, 320.0, 420.0, true),
            PanelId::Agents => ("Agents", 380.0, 120.0, 360.0, 480.0, true),
            PanelId::Models => ("Models", 760.0, 120.0, 280.0, 260.0, false),
        };
        Self {
            id,
            title: title.to_string(),
            x,
            y,
            width,
            height,
            visible,
        }
    }

    /// Shallow merge: every field set in `patch` replaces ours.
    pub fn merged(&self, patch: &PanelPatch) -> Self {
        Self {
            id: self.id,
            title: patch.title.clone().unwrap_or_else(|| self.title.clone()),
            x: patch.x.unwrap_or(self.x),
            y: patch.y.unwrap_or(self.y),
            width: patch.width.unwrap_or(self.width),
            height: patch.height.unwrap_or(self.height),
            visible: patch.visible.unwrap_or(self.visible),
        }
    }
}

/// Partial update for a [PanelState]. Values are committed as given; callers clamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelPatch {
    pub title: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub visible: Option<bool>,
}

impl PanelPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }
}

/// Placement of the agent-conversation panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatDockMode {
    #[default]
    Horizontal,
    Vertical,
    Floating,
}

impl ChatDockMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatDockMode::Horizontal => "horizontal",
            ChatDockMode::Vertical => "vertical",
            ChatDockMode::Floating => "floating",
        }
    }
}

impl FromStr for ChatDockMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "horizontal" => Ok(ChatDockMode::Horizontal),
            "vertical" => Ok(ChatDockMode::Vertical),
            "floating" => Ok(ChatDockMode::Floating),
            _ => Err(CoreError::UnknownDockMode(s.to_string())),
        }
    }
}

impl fmt::Display for ChatDockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One immutable view of the whole layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSnapshot {
    /// Indexed by [PanelId]; always holds every panel.
    panels: [PanelState; 3],
    pub chat_dock_mode: ChatDockMode,
    pub settings_open: bool,
    pub share_menu_open: bool,
}

impl Default for LayoutSnapshot {
    fn default() -> Self {
        Self {
            panels: PanelId::ALL.map(PanelState::default_for),
            chat_dock_mode: ChatDockMode::default(),
            settings_open: false,
            share_menu_open: false,
        }
    }
}

impl LayoutSnapshot {
    pub fn panel(&self, id: PanelId) -> &PanelState {
        &self.panels[id.index()]
    }

    pub fn panels(&self) -> impl Iterator<Item = &PanelState> {
        self.panels.iter()
    }

    fn with_panel(&self, state: PanelState) -> Self {
        let mut next = self.clone();
        let index = state.id.index();
        next.panels[index] = state;
        next
    }
}

/// Handle returned by `subscribe*`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&LayoutSnapshot)>;

struct Subscriber {
    id: SubscriptionId,
    /// `None` observes every change; `Some` only changes to that panel.
    scope: Option<PanelId>,
    callback: Observer,
}

/// Owned layout state container passed by reference to whatever renders it.
pub struct WorkspaceLayout {
    current: Arc<LayoutSnapshot>,
    subscribers: Vec<Subscriber>,
    next_subscription: u64,
}

impl Default for WorkspaceLayout {
    fn default() -> Self {
        Self::with_snapshot(LayoutSnapshot::default())
    }
}

impl fmt::Debug for WorkspaceLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkspaceLayout")
            .field("current", &self.current)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl WorkspaceLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: LayoutSnapshot) -> Self {
        Self {
            current: Arc::new(snapshot),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Current snapshot. Cheap to clone and safe to hold across mutations.
    pub fn snapshot(&self) -> Arc<LayoutSnapshot> {
        Arc::clone(&self.current)
    }

    pub fn panel(&self, id: PanelId) -> &PanelState {
        self.current.panel(id)
    }

    pub fn chat_dock_mode(&self) -> ChatDockMode {
        self.current.chat_dock_mode
    }

    pub fn settings_open(&self) -> bool {
        self.current.settings_open
    }

    pub fn share_menu_open(&self) -> bool {
        self.current.share_menu_open
    }

    /// Selector-style read.
    pub fn select<T>(&self, selector: impl FnOnce(&LayoutSnapshot) -> T) -> T {
        selector(&self.current)
    }

    /// Observe every change to the store.
    pub fn subscribe(&mut self, callback: impl FnMut(&LayoutSnapshot) + 'static) -> SubscriptionId {
        self.add_subscriber(None, Box::new(callback))
    }

    /// Observe changes to one panel's state only.
    pub fn subscribe_panel(
        &mut self,
        id: PanelId,
        callback: impl FnMut(&LayoutSnapshot) + 'static,
    ) -> SubscriptionId {
        self.add_subscriber(Some(id), Box::new(callback))
    }

    /// Returns false when the id was not (or no longer) subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    pub fn update_panel(&mut self, id: PanelId, patch: PanelPatch) {
        let merged = self.current.panel(id).merged(&patch);
        tracing::trace!(panel = %id, x = merged.x, y = merged.y, width = merged.width, height = merged.height, "update panel");
        let next = self.current.with_panel(merged);
        self.commit(next);
    }

    /// Sets visibility, or flips it when `visible` is `None`.
    pub fn toggle_panel(&mut self, id: PanelId, visible: Option<bool>) {
        let current = self.current.panel(id);
        let visible = visible.unwrap_or(!current.visible);
        tracing::debug!(panel = %id, visible, "toggle panel");
        let next = self.current.with_panel(PanelState {
            visible,
            ..current.clone()
        });
        self.commit(next);
    }

    pub fn set_chat_dock_mode(&mut self, mode: ChatDockMode) {
        tracing::debug!(mode = %mode, "set chat dock mode");
        let next = LayoutSnapshot {
            chat_dock_mode: mode,
            ..(*self.current).clone()
        };
        self.commit(next);
    }

    pub fn set_settings_open(&mut self, open: bool) {
        let next = LayoutSnapshot {
            settings_open: open,
            ..(*self.current).clone()
        };
        self.commit(next);
    }

    pub fn set_share_menu_open(&mut self, open: bool) {
        let next = LayoutSnapshot {
            share_menu_open: open,
            ..(*self.current).clone()
        };
        self.commit(next);
    }

    fn add_subscriber(&mut self, scope: Option<PanelId>, callback: Observer) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push(Subscriber {
            id,
            scope,
            callback,
        });
        id
    }

    fn commit(&mut self, next: LayoutSnapshot) {
        let previous = std::mem::replace(&mut self.current, Arc::new(next));
        let current = Arc::clone(&self.current);
        for subscriber in self.subscribers.iter_mut() {
            let changed = match subscriber.scope {
                None => true,
                Some(id) => previous.panel(id) != current.panel(id),
            };
            if changed {
                (subscriber.callback)(&current);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_default_layout() {
        let layout = WorkspaceLayout::new();
        let library = layout.panel(PanelId::Library);
        assert_eq!(library.title, "Libraries");
        assert_eq!((library.x, library.y), (32.0, 120.0));
        assert_eq!((library.width, library.height), (320.0, 420.0));
        assert!(library.visible);
        assert!(layout.panel(PanelId::Agents).visible);
        assert!(!layout.panel(PanelId::Models).visible);
        assert_eq!(layout.chat_dock_mode(), ChatDockMode::Horizontal);
        assert!(!layout.settings_open());
        assert!(!layout.share_menu_open());
    }

    #[test]
    fn test_update_panel_shallow_merge() {
        for id in PanelId::ALL {
            let mut layout = WorkspaceLayout::new();
            let before = layout.panel(id).clone();
            layout.update_panel(id, PanelPatch::position(100.0, 200.0));
            let after = layout.panel(id);
            assert_eq!(
                after,
                &PanelState {
                    x: 100.0,
                    y: 200.0,
                    ..before
                }
            );
        }
    }

    #[test]
    fn test_update_panel_leaves_other_panels() {
        let mut layout = WorkspaceLayout::new();
        let agents = layout.panel(PanelId::Agents).clone();
        layout.update_panel(PanelId::Library, PanelPatch::size(500.0, 600.0).with_title("Libs"));
        assert_eq!(layout.panel(PanelId::Agents), &agents);
        assert_eq!(layout.panel(PanelId::Library).title, "Libs");
    }

    #[test]
    fn test_update_panel_commits_unclamped_values() {
        let mut layout = WorkspaceLayout::new();
        layout.update_panel(PanelId::Models, PanelPatch::size(10.0, -5.0));
        assert_eq!(layout.panel(PanelId::Models).width, 10.0);
        assert_eq!(layout.panel(PanelId::Models).height, -5.0);
    }

    #[test]
    fn test_toggle_panel() {
        let mut layout = WorkspaceLayout::new();
        layout.toggle_panel(PanelId::Models, None);
        assert!(layout.panel(PanelId::Models).visible);
        layout.toggle_panel(PanelId::Models, None);
        assert!(!layout.panel(PanelId::Models).visible);
        layout.toggle_panel(PanelId::Library, Some(true));
        assert!(layout.panel(PanelId::Library).visible);
        layout.toggle_panel(PanelId::Library, Some(false));
        assert!(!layout.panel(PanelId::Library).visible);
    }

    #[test]
    fn test_direct_setters() {
        let mut layout = WorkspaceLayout::new();
        layout.set_chat_dock_mode(ChatDockMode::Floating);
        layout.set_settings_open(true);
        layout.set_share_menu_open(true);
        assert_eq!(layout.chat_dock_mode(), ChatDockMode::Floating);
        assert!(layout.settings_open());
        assert!(layout.share_menu_open());
    }

    #[test]
    fn test_snapshot_is_replaced_not_mutated() {
        let mut layout = WorkspaceLayout::new();
        let held = layout.snapshot();
        layout.update_panel(PanelId::Library, PanelPatch::position(50.0, 70.0));
        assert_eq!(held.panel(PanelId::Library).x, 32.0);
        assert_eq!(layout.snapshot().panel(PanelId::Library).x, 50.0);
    }

    #[test]
    fn test_select() {
        let mut layout = WorkspaceLayout::new();
        layout.toggle_panel(PanelId::Models, Some(true));
        let visible = layout.select(|s| s.panels().filter(|p| p.visible).count());
        assert_eq!(visible, 3);
    }

    #[test]
    fn test_observers_notified_synchronously() {
        let mut layout = WorkspaceLayout::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        layout.subscribe(move |s| sink.borrow_mut().push(s.panel(PanelId::Library).x));

        layout.update_panel(PanelId::Library, PanelPatch::position(40.0, 120.0));
        assert_eq!(*seen.borrow(), vec![40.0]);
        layout.set_settings_open(true);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_panel_observer_only_sees_its_panel() {
        let mut layout = WorkspaceLayout::new();
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        layout.subscribe_panel(PanelId::Agents, move |_| *counter.borrow_mut() += 1);

        layout.update_panel(PanelId::Library, PanelPatch::position(40.0, 120.0));
        layout.set_chat_dock_mode(ChatDockMode::Vertical);
        assert_eq!(*hits.borrow(), 0);

        layout.update_panel(PanelId::Agents, PanelPatch::position(400.0, 120.0));
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let mut layout = WorkspaceLayout::new();
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        let id = layout.subscribe(move |_| *counter.borrow_mut() += 1);
        assert!(layout.unsubscribe(id));
        assert!(!layout.unsubscribe(id));
        layout.set_share_menu_open(true);
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn test_instances_are_isolated() {
        let mut a = WorkspaceLayout::new();
        let b = WorkspaceLayout::new();
        a.toggle_panel(PanelId::Library, Some(false));
        assert!(b.panel(PanelId::Library).visible);
    }

    #[test]
    fn test_panel_id_parse() {
        assert_eq!("library".parse::<PanelId>(), Ok(PanelId::Library));
        assert_eq!("AGENTS".parse::<PanelId>(), Ok(PanelId::Agents));
        assert_eq!(
            "sidebar".parse::<PanelId>(),
            Err(CoreError::UnknownPanel("sidebar".to_string()))
        );
    }

    #[test]
    fn test_only_library_is_resizable() {
        assert!(PanelId::Library.resizable());
        assert!(!PanelId::Agents.resizable());
        assert!(!PanelId::Models.resizable());
    }

    #[test]
    fn test_chat_dock_mode_parse() {
        assert_eq!("floating".parse::<ChatDockMode>(), Ok(ChatDockMode::Floating));
        assert!("diagonal".parse::<ChatDockMode>().is_err());
    }

    #[test]
    fn test_snapshot_serializes() {
        let json = serde_json::to_value(LayoutSnapshot::default()).unwrap();
        assert_eq!(json["chat_dock_mode"], "horizontal");
        assert_eq!(json["panels"][0]["id"], "library");
    }
}
