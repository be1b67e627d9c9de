use cryxtal_base::ViewpointId;
use cryxtal_geometry::Bounds;

use crate::snapshot::ViewpointSnapshot;
use crate::transition::Transition;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SnapshotSlot {
    /// Tracks the view's own camera.
    Own,
    /// Tracks the camera of the view this one is bound to.
    Bound,
}

/// Scene extents the navigation commands frame, supplied by the document layer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SceneExtents {
    pub content: Option<Bounds>,
    pub selection: Option<Bounds>,
}

/// The binding-relevant state of one 3D view.
#[derive(Clone, Debug)]
pub struct Viewport {
    camera: ViewpointId,
    pub(crate) own: ViewpointSnapshot,
    pub(crate) bound: ViewpointSnapshot,
    animation_enabled: bool,
    pub(crate) transition: Option<Transition>,
    extents: SceneExtents,
}

impl Viewport {
    pub(crate) fn new(camera: ViewpointId) -> Self {
        Self {
            camera,
            own: ViewpointSnapshot::new(),
            bound: ViewpointSnapshot::new(),
            animation_enabled: false,
            transition: None,
            extents: SceneExtents::default(),
        }
    }

    /// Identity of this view's own live camera.
    pub fn camera(&self) -> ViewpointId {
        self.camera
    }

    pub(crate) fn set_camera(&mut self, camera: ViewpointId) {
        self.camera = camera;
    }

    pub fn own_state(&self) -> &ViewpointSnapshot {
        &self.own
    }

    /// `None` while unbound.
    pub fn bound_state(&self) -> Option<&ViewpointSnapshot> {
        self.bound.subscription().map(|_| &self.bound)
    }

    pub fn snapshot(&self, slot: SnapshotSlot) -> &ViewpointSnapshot {
        match slot {
            SnapshotSlot::Own => &self.own,
            SnapshotSlot::Bound => &self.bound,
        }
    }

    pub(crate) fn snapshot_mut(&mut self, slot: SnapshotSlot) -> &mut ViewpointSnapshot {
        match slot {
            SnapshotSlot::Own => &mut self.own,
            SnapshotSlot::Bound => &mut self.bound,
        }
    }

    /// `(src, dst)` for a change arriving on `src`.
    pub(crate) fn split_mut(
        &mut self,
        src: SnapshotSlot,
    ) -> (&mut ViewpointSnapshot, &mut ViewpointSnapshot) {
        match src {
            SnapshotSlot::Own => (&mut self.own, &mut self.bound),
            SnapshotSlot::Bound => (&mut self.bound, &mut self.own),
        }
    }

    /// Camera this view follows, if any.
    pub fn bound_camera(&self) -> Option<ViewpointId> {
        self.bound.tracked()
    }

    pub fn animation_enabled(&self) -> bool {
        self.animation_enabled
    }

    pub fn set_animation_enabled(&mut self, enabled: bool) {
        self.animation_enabled = enabled;
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    pub fn extents(&self) -> SceneExtents {
        self.extents
    }

    pub fn set_extents(&mut self, extents: SceneExtents) {
        self.extents = extents;
    }
}
