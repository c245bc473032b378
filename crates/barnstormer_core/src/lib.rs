pub mod agents;
pub mod error;
pub mod gesture;
pub mod layout;
pub mod library;
pub mod session;

pub use agents::{AgentProfile, AgentProvider, AgentRoster, AgentStatus};
pub use error::{CoreError, Result};
pub use gesture::{FloatingPanel, GestureKind, PointerEvent, Viewport};
pub use layout::{
    ChatDockMode, LayoutSnapshot, PanelId, PanelPatch, PanelState, SubscriptionId,
    WorkspaceLayout,
};
pub use library::{LibraryEntry, LibrarySourceType};
pub use session::{AgentAuthor, AgentMessage, AgentSession};
