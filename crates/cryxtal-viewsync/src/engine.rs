use cryxtal_base::{DocumentId, ViewId, ViewpointId};
use cryxtal_geometry::{ProjectionMode, Viewpoint};
use std::collections::BTreeSet;
use tracing::{debug, trace};

use crate::cameras::{CameraStore, Subscriber};
use crate::config::SyncConfig;
use crate::events::{EventLog, SyncEvent};
use crate::graph;
use crate::input::Modifiers;
use crate::registry::{ViewKind, ViewRegistry};
use crate::session::BroadcastSession;
use crate::snapshot::ViewpointSnapshot;
use crate::viewport::{SnapshotSlot, Viewport};
use crate::{Error, Result};

mod broadcast;
pub(crate) mod menu;
mod navigation;
mod propagate;

/// Owns every open view, its live camera and the binding edges between views.
///
/// All work happens synchronously on the caller's thread: a camera write
/// resolves its whole propagation fan-out before returning.
#[derive(Debug)]
pub struct ViewSync {
    config: SyncConfig,
    registry: ViewRegistry,
    cameras: CameraStore,
    modifiers: Modifiers,
    session: BroadcastSession,
    events: EventLog,
}

impl Default for ViewSync {
    fn default() -> Self {
        Self::new(SyncConfig::default())
    }
}

impl ViewSync {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            registry: ViewRegistry::new(),
            cameras: CameraStore::new(),
            modifiers: Modifiers::default(),
            session: BroadcastSession::new(),
            events: EventLog::new(),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    pub fn cameras(&self) -> &CameraStore {
        &self.cameras
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn is_decouple_held(&self) -> bool {
        self.modifiers.is_only(self.config.decouple_modifier)
    }

    pub fn broadcast_session(&self) -> &BroadcastSession {
        &self.session
    }

    pub fn drain_events(&mut self) -> Vec<SyncEvent> {
        self.events.take()
    }

    pub fn open_document(&mut self, label: impl Into<String>) -> DocumentId {
        self.registry.open_document(label)
    }

    pub fn close_document(&mut self, document: DocumentId) -> Result<()> {
        let views = self
            .registry
            .document(document)
            .ok_or(Error::UnknownDocument(document))?
            .views()
            .to_vec();
        for view in views {
            self.close_view(view)?;
        }
        self.registry.remove_document(document);
        Ok(())
    }

    pub fn open_view(
        &mut self,
        document: DocumentId,
        title: impl Into<String>,
        viewpoint: Viewpoint,
    ) -> Result<ViewId> {
        let viewpoint = viewpoint.checked(self.config.min_zoom)?;
        let camera = self.cameras.create(viewpoint);
        let kind = ViewKind::ThreeD(Viewport::new(camera));
        let view = match self.registry.insert_window(document, title, kind) {
            Ok(view) => view,
            Err(err) => {
                self.cameras.destroy(camera);
                return Err(err);
            }
        };
        self.bind_camera(view, None, false);
        debug!(view = %view, camera = %camera, "3D view opened");
        Ok(view)
    }

    /// Opens a window without a camera (drawing page, spreadsheet).
    pub fn open_window(
        &mut self,
        document: DocumentId,
        title: impl Into<String>,
        kind: ViewKind,
    ) -> Result<ViewId> {
        if matches!(kind, ViewKind::ThreeD(_)) {
            return Err(Error::Base(cryxtal_base::Error::InvalidParameter(
                "3D views are opened with open_view".to_string(),
            )));
        }
        self.registry.insert_window(document, title, kind)
    }

    /// Closes a window. Its own binding edge goes away and every snapshot
    /// subscribed to its camera is detached.
    pub fn close_view(&mut self, view: ViewId) -> Result<()> {
        let window = self.registry.window(view).ok_or(Error::UnknownView(view))?;
        if let Some(camera) = window.as_three_d().map(Viewport::camera) {
            self.unbind_edge(view);
            self.detach(view, SnapshotSlot::Own);
            for orphan in self.cameras.destroy(camera) {
                if let Some(viewport) = self.registry.viewport_mut(orphan.view) {
                    viewport.snapshot_mut(orphan.slot).replace_subscription(None);
                }
                if orphan.slot == SnapshotSlot::Bound {
                    debug!(view = %orphan.view, closed = %view, "binding target closed");
                    self.events.emit(SyncEvent::Unbound { view: orphan.view });
                }
            }
        }
        self.registry.remove_window(view);
        self.events.emit(SyncEvent::ViewClosed { view });
        Ok(())
    }

    pub fn viewport(&self, view: ViewId) -> Option<&Viewport> {
        self.registry.viewport(view)
    }

    pub fn viewpoint(&self, view: ViewId) -> Option<Viewpoint> {
        let camera = self.registry.viewport(view)?.camera();
        self.cameras.read(camera).copied()
    }

    pub fn snapshot(&self, view: ViewId, slot: SnapshotSlot) -> Option<&ViewpointSnapshot> {
        self.registry.viewport(view).map(|viewport| viewport.snapshot(slot))
    }

    pub fn title(&self, view: ViewId) -> Option<&str> {
        self.registry.title(view)
    }

    /// User or script navigation on a view's own camera; bound views follow.
    pub fn navigate(&mut self, view: ViewId, viewpoint: Viewpoint) -> Result<()> {
        let viewpoint = viewpoint.checked(self.config.min_zoom)?;
        let camera = self.camera_of(view)?;
        let current = self.cameras.read(camera).map(|live| live.projection);
        if current.is_some_and(|projection| projection != viewpoint.projection) {
            self.set_projection(view, viewpoint.projection)?;
        }
        let camera = self.camera_of(view)?;
        if let Some(viewport) = self.registry.viewport_mut(view) {
            viewport.transition = None;
        }
        self.write_camera(camera, viewpoint);
        Ok(())
    }

    /// Replaces the view's camera with one of the other projection type.
    /// Snapshots tracking the old camera are re-pointed without propagating.
    pub fn set_projection(&mut self, view: ViewId, projection: ProjectionMode) -> Result<()> {
        let old = self.camera_of(view)?;
        let current = *self.cameras.read(old).ok_or(Error::UnknownView(view))?;
        if current.projection == projection {
            return Ok(());
        }
        let camera = self
            .cameras
            .create(current.converted(projection, self.config.height_angle()));
        let followers: Vec<ViewId> = self
            .cameras
            .subscribers(old)
            .into_iter()
            .filter(|sub| sub.slot == SnapshotSlot::Bound)
            .map(|sub| sub.view)
            .collect();

        let bound = match self.registry.viewport_mut(view) {
            Some(viewport) => {
                viewport.set_camera(camera);
                viewport.transition = None;
                viewport.bound_camera()
            }
            None => return Err(Error::NotThreeDView(view)),
        };
        self.bind_camera(view, bound, false);
        for follower in followers {
            self.bind_camera(follower, Some(camera), false);
        }
        self.cameras.destroy(old);

        debug!(view = %view, %projection, old = %old, new = %camera, "camera replaced");
        self.events.emit(SyncEvent::ProjectionChanged { view, projection });
        Ok(())
    }

    pub fn bound_view(&self, view: ViewId) -> Option<ViewId> {
        graph::binding_target(&self.registry, view)
    }

    pub fn connected_component(&self, view: ViewId, recursive: bool) -> BTreeSet<ViewId> {
        graph::connected_component(&self.registry, view, recursive)
    }

    pub fn can_bind(&self, from: ViewId, to: ViewId) -> bool {
        graph::can_bind(&self.registry, from, to)
    }

    /// Binds `view` to the 3D view titled `title`. Any previous binding of
    /// `view` is dropped first; an empty title only unbinds. Refuses (returns
    /// `None`) when no such view exists or the edge would close a loop.
    pub fn bind_view(&mut self, view: ViewId, title: &str, sync_now: bool) -> Option<ViewId> {
        self.registry.viewport(view)?;
        self.unbind_edge(view);
        if title.is_empty() {
            return None;
        }

        let Some(target) = self.registry.find_viewport(title, Some(view)) else {
            debug!(view = %view, title, "no 3D view with that title");
            self.events.emit(SyncEvent::BindRefused {
                view,
                title: title.to_string(),
            });
            return None;
        };
        if !self.can_bind(view, target) {
            debug!(view = %view, target = %target, "binding would close a loop");
            self.events.emit(SyncEvent::BindRefused {
                view,
                title: title.to_string(),
            });
            return None;
        }

        let camera = self.registry.viewport(target)?.camera();
        self.bind_camera(view, Some(camera), sync_now);
        debug!(view = %view, target = %target, sync_now, "view bound");
        self.events.emit(SyncEvent::Bound { view, target });
        Some(target)
    }

    /// With an empty `filter`, severs `view` from every direct neighbour.
    /// Otherwise severs only the edge to or from the neighbour titled `filter`.
    pub fn unbind_view(&mut self, view: ViewId, filter: &str) -> bool {
        if self.registry.viewport(view).is_none() {
            return false;
        }
        if filter.is_empty() {
            for follower in graph::followers(&self.registry, view) {
                self.unbind_edge(follower);
            }
            self.unbind_edge(view);
            return true;
        }

        for neighbour in self.connected_component(view, false) {
            if self.registry.title(neighbour) != Some(filter) {
                continue;
            }
            if self.bound_view(view) == Some(neighbour) {
                self.unbind_edge(view);
                return true;
            }
            if self.bound_view(neighbour) == Some(view) {
                self.unbind_edge(neighbour);
                return true;
            }
            break;
        }
        false
    }

    /// Snaps `view` onto `other`'s camera once, or onto its bound camera when
    /// `other` is `None`.
    pub fn sync_camera(&mut self, view: ViewId, other: Option<ViewId>) {
        let Some(viewport) = self.registry.viewport(view) else {
            return;
        };
        let camera = viewport.camera();
        let Some(other) = other else {
            if let Some(bound) = viewport.bound_camera() {
                self.bind_camera(view, Some(bound), true);
            }
            return;
        };
        let Some(other_viewport) = self.registry.viewport(other) else {
            return;
        };
        let other_camera = other_viewport.camera();
        if other_viewport.bound_camera() == Some(camera) {
            self.sync_snapshot(other, SnapshotSlot::Bound, Some(other_camera));
            self.apply_snapshot(other, SnapshotSlot::Bound, None);
        } else {
            self.sync_snapshot(view, SnapshotSlot::Own, Some(other_camera));
            self.apply_snapshot(view, SnapshotSlot::Own, None);
        }
    }

    fn camera_of(&self, view: ViewId) -> Result<ViewpointId> {
        let window = self.registry.window(view).ok_or(Error::UnknownView(view))?;
        window
            .as_three_d()
            .map(Viewport::camera)
            .ok_or(Error::NotThreeDView(view))
    }

    fn unbind_edge(&mut self, view: ViewId) {
        let was_bound = self
            .registry
            .viewport(view)
            .is_some_and(|viewport| viewport.bound_camera().is_some());
        self.bind_camera(view, None, false);
        if was_bound {
            debug!(view = %view, "view unbound");
            self.events.emit(SyncEvent::Unbound { view });
        }
    }

    /// Re-points the own snapshot at the view's current camera, then points the
    /// bound snapshot at `camera` (or detaches it). With `sync_now` the view
    /// snaps onto `camera` once.
    fn bind_camera(&mut self, view: ViewId, camera: Option<ViewpointId>, sync_now: bool) {
        let Some(viewport) = self.registry.viewport(view) else {
            return;
        };
        let own_camera = viewport.camera();
        let tracked_own = viewport.own.tracked();
        let tracked_bound = viewport.bound.tracked();

        if tracked_own != Some(own_camera) {
            self.attach(view, SnapshotSlot::Own, own_camera);
        }
        self.sync_snapshot(view, SnapshotSlot::Own, None);

        let Some(camera) = camera else {
            self.detach(view, SnapshotSlot::Bound);
            return;
        };
        if camera == own_camera {
            return;
        }
        if tracked_bound != Some(camera) {
            self.attach(view, SnapshotSlot::Bound, camera);
        }
        self.sync_snapshot(view, SnapshotSlot::Bound, None);

        if sync_now {
            self.sync_snapshot(view, SnapshotSlot::Own, Some(camera));
            self.apply_snapshot(view, SnapshotSlot::Own, None);
        }
    }

    fn attach(&mut self, view: ViewId, slot: SnapshotSlot, camera: ViewpointId) {
        let handle = self.cameras.subscribe(camera, Subscriber { view, slot });
        if let Some(viewport) = self.registry.viewport_mut(view) {
            if let Some(old) = viewport.snapshot_mut(slot).replace_subscription(handle) {
                self.cameras.unsubscribe(old);
            }
        }
    }

    fn detach(&mut self, view: ViewId, slot: SnapshotSlot) {
        if let Some(viewport) = self.registry.viewport_mut(view) {
            if let Some(old) = viewport.snapshot_mut(slot).replace_subscription(None) {
                self.cameras.unsubscribe(old);
            }
        }
    }

    fn sync_snapshot(&mut self, view: ViewId, slot: SnapshotSlot, source: Option<ViewpointId>) -> bool {
        match self.registry.viewport_mut(view) {
            Some(viewport) => viewport.snapshot_mut(slot).sync(&self.cameras, source),
            None => false,
        }
    }

    /// Writes a snapshot's cached state into `target` (default: the tracked camera).
    fn apply_snapshot(&mut self, view: ViewId, slot: SnapshotSlot, target: Option<ViewpointId>) {
        let Some(snapshot) = self.registry.viewport(view).map(|viewport| *viewport.snapshot(slot)) else {
            return;
        };
        if !snapshot.is_attached(&self.cameras) {
            return;
        }
        let Some(target) = target.or(snapshot.tracked()) else {
            return;
        };
        let Some(live) = self.cameras.read(target) else {
            return;
        };
        let written = snapshot.applied_to(live);
        self.write_camera(target, written);
    }

    /// Stores a camera and delivers change notifications depth-first.
    pub(crate) fn write_camera(&mut self, camera: ViewpointId, viewpoint: Viewpoint) {
        let subscribers = self.cameras.write(camera, viewpoint);
        if self.session.is_active() {
            trace!(camera = %camera, "notifications held while a broadcast is in flight");
            return;
        }
        for subscriber in subscribers {
            self.on_viewpoint_changed(subscriber.view, subscriber.slot);
        }
    }
}
