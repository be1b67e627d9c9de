//! Live cameras of the scene layer and their change subscriptions.
//!
//! Writing a camera does not call anything by itself: [`CameraStore::write`]
//! hands back the subscribers to notify, and the engine delivers the
//! notifications synchronously on the same call stack.

use cryxtal_base::{ViewId, ViewpointId};
use cryxtal_geometry::Viewpoint;
use std::collections::HashMap;

use crate::viewport::SnapshotSlot;

/// Which snapshot of which view is listening.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscriber {
    pub view: ViewId,
    pub slot: SnapshotSlot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    camera: ViewpointId,
    serial: u64,
}

impl SubscriptionHandle {
    pub fn camera(&self) -> ViewpointId {
        self.camera
    }
}

#[derive(Clone, Debug)]
struct LiveCamera {
    viewpoint: Viewpoint,
    subscribers: Vec<(u64, Subscriber)>,
}

#[derive(Clone, Debug, Default)]
pub struct CameraStore {
    cameras: HashMap<ViewpointId, LiveCamera>,
    next_serial: u64,
}

impl CameraStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, viewpoint: Viewpoint) -> ViewpointId {
        let id = ViewpointId::new();
        self.cameras.insert(
            id,
            LiveCamera {
                viewpoint,
                subscribers: Vec::new(),
            },
        );
        id
    }

    /// Removes the camera; returns the subscribers whose subscription died with it.
    pub fn destroy(&mut self, id: ViewpointId) -> Vec<Subscriber> {
        self.cameras
            .remove(&id)
            .map(|camera| camera.subscribers.into_iter().map(|(_, s)| s).collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, id: ViewpointId) -> bool {
        self.cameras.contains_key(&id)
    }

    pub fn read(&self, id: ViewpointId) -> Option<&Viewpoint> {
        self.cameras.get(&id).map(|camera| &camera.viewpoint)
    }

    /// Stores `viewpoint` and returns everyone subscribed at the time of the write,
    /// in subscription order. Unknown cameras are ignored.
    pub fn write(&mut self, id: ViewpointId, viewpoint: Viewpoint) -> Vec<Subscriber> {
        match self.cameras.get_mut(&id) {
            Some(camera) => {
                camera.viewpoint = viewpoint;
                camera.subscribers.iter().map(|(_, s)| *s).collect()
            }
            None => Vec::new(),
        }
    }

    pub fn subscribe(&mut self, id: ViewpointId, subscriber: Subscriber) -> Option<SubscriptionHandle> {
        let camera = self.cameras.get_mut(&id)?;
        let serial = self.next_serial;
        self.next_serial += 1;
        camera.subscribers.push((serial, subscriber));
        Some(SubscriptionHandle { camera: id, serial })
    }

    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        let Some(camera) = self.cameras.get_mut(&handle.camera) else {
            return false;
        };
        let before = camera.subscribers.len();
        camera.subscribers.retain(|(serial, _)| *serial != handle.serial);
        camera.subscribers.len() != before
    }

    pub fn is_live(&self, handle: SubscriptionHandle) -> bool {
        self.cameras
            .get(&handle.camera)
            .is_some_and(|camera| camera.subscribers.iter().any(|(serial, _)| *serial == handle.serial))
    }

    pub fn subscribers(&self, id: ViewpointId) -> Vec<Subscriber> {
        self.cameras
            .get(&id)
            .map(|camera| camera.subscribers.iter().map(|(_, s)| *s).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryxtal_geometry::{Point3, identity_rotation};

    fn camera() -> Viewpoint {
        Viewpoint::perspective(Point3::new(0.0, 0.0, 10.0), identity_rotation(), 10.0)
    }

    #[test]
    fn write_reports_subscribers_in_order() {
        let mut store = CameraStore::new();
        let id = store.create(camera());
        let first = Subscriber {
            view: ViewId::new(),
            slot: SnapshotSlot::Own,
        };
        let second = Subscriber {
            view: ViewId::new(),
            slot: SnapshotSlot::Bound,
        };
        store.subscribe(id, first);
        let handle = store.subscribe(id, second).expect("camera exists");

        let mut moved = camera();
        moved.zoom = 20.0;
        assert_eq!(store.write(id, moved), vec![first, second]);
        assert_eq!(store.read(id).map(|v| v.zoom), Some(20.0));

        assert!(store.unsubscribe(handle));
        assert!(!store.is_live(handle));
        assert_eq!(store.subscribers(id), vec![first]);
    }

    #[test]
    fn destroyed_camera_returns_orphans() {
        let mut store = CameraStore::new();
        let id = store.create(camera());
        let sub = Subscriber {
            view: ViewId::new(),
            slot: SnapshotSlot::Bound,
        };
        let handle = store.subscribe(id, sub).expect("camera exists");
        assert_eq!(store.destroy(id), vec![sub]);
        assert!(store.read(id).is_none());
        assert!(!store.unsubscribe(handle));
        assert!(store.write(id, camera()).is_empty());
        assert!(store.subscribe(id, sub).is_none());
    }
}
