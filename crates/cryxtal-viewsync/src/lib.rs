use cryxtal_base::{DocumentId, ViewId};
use thiserror::Error;

pub mod cameras;
pub mod command;
pub mod config;
pub mod events;
pub mod graph;
pub mod input;
pub mod registry;
pub mod session;
pub mod snapshot;
pub mod transition;
pub mod viewport;

mod engine;

pub use cameras::{CameraStore, Subscriber, SubscriptionHandle};
pub use command::NavCommand;
pub use config::{ModifierKey, SyncConfig};
pub use engine::ViewSync;
pub use engine::menu::{BindingMenu, MenuAction, MenuEntry, MenuGroup};
pub use events::{EventLog, SyncEvent};
pub use input::Modifiers;
pub use registry::{Document, ViewKind, ViewRegistry, ViewWindow};
pub use session::{BroadcastSession, SessionGuard};
pub use snapshot::ViewpointSnapshot;
pub use viewport::{SceneExtents, SnapshotSlot, Viewport};

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown view: {0}")]
    UnknownView(ViewId),
    #[error("unknown document: {0}")]
    UnknownDocument(DocumentId),
    #[error("{0} is not a 3D view")]
    NotThreeDView(ViewId),
    #[error("unknown navigation command: {0}")]
    UnknownCommand(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Base(#[from] cryxtal_base::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
