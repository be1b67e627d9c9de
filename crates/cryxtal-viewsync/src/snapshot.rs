use cgmath::EuclideanSpace;
use cryxtal_base::ViewpointId;
use cryxtal_geometry::{Point3, Pose, ProjectionMode, Quaternion, Viewpoint, identity_rotation};

use crate::cameras::{CameraStore, SubscriptionHandle};

/// Cached copy of one live camera plus the subscription that keeps it current.
///
/// Both zoom scalars are kept so a projection switch on the tracked camera
/// does not lose the other one. Cached values only mean something after the
/// first successful [`sync`](Self::sync).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewpointSnapshot {
    subscription: Option<SubscriptionHandle>,
    pub(crate) position: Point3,
    pub(crate) orientation: Quaternion,
    pub(crate) height: f64,
    pub(crate) focal: f64,
}

impl Default for ViewpointSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewpointSnapshot {
    pub fn new() -> Self {
        Self {
            subscription: None,
            position: Point3::origin(),
            orientation: identity_rotation(),
            height: 0.0,
            focal: 0.0,
        }
    }

    pub fn subscription(&self) -> Option<SubscriptionHandle> {
        self.subscription
    }

    pub(crate) fn replace_subscription(
        &mut self,
        subscription: Option<SubscriptionHandle>,
    ) -> Option<SubscriptionHandle> {
        std::mem::replace(&mut self.subscription, subscription)
    }

    pub fn tracked(&self) -> Option<ViewpointId> {
        self.subscription.map(|handle| handle.camera())
    }

    /// Attached means subscribed to a camera that still exists.
    pub fn is_attached(&self, cameras: &CameraStore) -> bool {
        self.subscription.is_some_and(|handle| cameras.is_live(handle))
    }

    pub fn tracked_mode(&self, cameras: &CameraStore) -> Option<ProjectionMode> {
        self.tracked()
            .and_then(|id| cameras.read(id))
            .map(|viewpoint| viewpoint.projection)
    }

    pub fn position(&self) -> Point3 {
        self.position
    }

    pub fn orientation(&self) -> Quaternion {
        self.orientation
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn focal(&self) -> f64 {
        self.focal
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.orientation)
    }

    pub(crate) fn set_pose(&mut self, pose: Pose) {
        self.position = pose.position;
        self.orientation = pose.orientation;
    }

    /// The cached scalar that is live for a camera of `mode`.
    pub fn zoom_for(&self, mode: ProjectionMode) -> f64 {
        match mode {
            ProjectionMode::Orthographic => self.height,
            ProjectionMode::Perspective => self.focal,
        }
    }

    /// Pulls the latest values from the tracked camera, or from `source` when given.
    ///
    /// The source's zoom lands in the slot matching the *tracked* camera's
    /// projection, whatever the source's own projection is. Values are compared
    /// exactly. Returns whether any cached field changed; a detached snapshot
    /// never changes.
    pub fn sync(&mut self, cameras: &CameraStore, source: Option<ViewpointId>) -> bool {
        if !self.is_attached(cameras) {
            return false;
        }
        let Some(mine) = self.tracked().and_then(|id| cameras.read(id)) else {
            return false;
        };
        let own_mode = mine.projection;
        let from = match source {
            Some(id) => match cameras.read(id) {
                Some(viewpoint) => viewpoint,
                None => return false,
            },
            None => mine,
        };

        let mut touched = false;
        if self.position != from.position {
            self.position = from.position;
            touched = true;
        }
        if self.orientation != from.orientation {
            self.orientation = from.orientation;
            touched = true;
        }
        let slot = match own_mode {
            ProjectionMode::Orthographic => &mut self.height,
            ProjectionMode::Perspective => &mut self.focal,
        };
        if *slot != from.zoom {
            *slot = from.zoom;
            touched = true;
        }
        touched
    }

    /// What applying this snapshot writes into `target`: cached pose plus the
    /// scalar selected by the target's projection.
    pub fn applied_to(&self, target: &Viewpoint) -> Viewpoint {
        Viewpoint::new(
            self.position,
            self.orientation,
            target.projection,
            self.zoom_for(target.projection),
        )
    }
}
