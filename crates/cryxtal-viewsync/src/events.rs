//! Engine notifications for the UI layer (status bar, menu refresh).

use cryxtal_base::ViewId;
use cryxtal_geometry::ProjectionMode;
use std::collections::VecDeque;

use crate::command::NavCommand;
use crate::viewport::SnapshotSlot;

#[derive(Clone, Debug, PartialEq)]
pub enum SyncEvent {
    Bound { view: ViewId, target: ViewId },
    BindRefused { view: ViewId, title: String },
    Unbound { view: ViewId },
    /// A change on `view`'s `from` snapshot was carried to its other snapshot.
    Propagated { view: ViewId, from: SnapshotSlot },
    /// A change was absorbed without propagating because the decouple key was held.
    Decoupled { view: ViewId },
    CommandExecuted { view: ViewId, command: NavCommand },
    ProjectionChanged { view: ViewId, projection: ProjectionMode },
    ViewClosed { view: ViewId },
}

#[derive(Debug, Default)]
pub struct EventLog {
    events: VecDeque<SyncEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: SyncEvent) {
        self.events.push_back(event);
    }

    #[must_use]
    pub fn take(&mut self) -> Vec<SyncEvent> {
        std::mem::take(&mut self.events).into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
