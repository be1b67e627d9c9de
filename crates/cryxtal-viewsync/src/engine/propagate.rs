use cgmath::{EuclideanSpace, InnerSpace};
use cryxtal_base::ViewId;
use cryxtal_geometry::ProjectionMode;
use tracing::trace;

use super::ViewSync;
use crate::config::SyncConfig;
use crate::events::SyncEvent;
use crate::snapshot::ViewpointSnapshot;
use crate::viewport::SnapshotSlot;

impl ViewSync {
    /// Reacts to a write on the camera tracked by `view`'s `src_slot` snapshot.
    ///
    /// The motion the source camera just made (relative to its cached pose) is
    /// carried onto the other snapshot and applied to the camera that one
    /// tracks. Recursion stops at the first snapshot whose sync finds nothing
    /// new.
    pub(crate) fn on_viewpoint_changed(&mut self, view: ViewId, src_slot: SnapshotSlot) {
        let decoupled = self.is_decouple_held();
        let config = self.config;
        let cameras = &self.cameras;
        let Some(viewport) = self.registry.viewport_mut(view) else {
            return;
        };
        let (src, dst) = viewport.split_mut(src_slot);
        if !src.is_attached(cameras) || !dst.is_attached(cameras) {
            return;
        }
        let (Some(src_mode), Some(dst_mode)) = (src.tracked_mode(cameras), dst.tracked_mode(cameras)) else {
            return;
        };

        let old_pose = src.pose();
        let old_zoom = src.zoom_for(src_mode);
        if !src.sync(cameras, None) {
            return;
        }
        if decoupled {
            trace!(view = %view, slot = ?src_slot, "decoupled, change absorbed");
            self.events.emit(SyncEvent::Decoupled { view });
            return;
        }

        let new_pose = src.pose();
        let new_zoom = src.zoom_for(src_mode);
        let Some(carried) = dst.pose().carried(&old_pose, &new_pose) else {
            trace!(view = %view, "degenerate source orientation, nothing carried");
            return;
        };
        dst.set_pose(carried);
        scale_zoom(dst, src_mode, dst_mode, old_zoom, new_zoom, &config);

        let Some(target) = dst.tracked() else {
            return;
        };
        let Some(live) = cameras.read(target) else {
            return;
        };
        let written = dst.applied_to(live);

        trace!(view = %view, from = ?src_slot, camera = %target, "carrying camera motion");
        self.events.emit(SyncEvent::Propagated { view, from: src_slot });
        self.write_camera(target, written);
    }
}

/// Scales `dst`'s cached zoom by the source's zoom ratio. An orthographic
/// source driving a perspective destination dollies along the view axis so
/// the apparent size follows.
fn scale_zoom(
    dst: &mut ViewpointSnapshot,
    src_mode: ProjectionMode,
    dst_mode: ProjectionMode,
    old_zoom: f64,
    new_zoom: f64,
    config: &SyncConfig,
) {
    if new_zoom == old_zoom || old_zoom.abs() <= config.zoom_epsilon {
        return;
    }
    let ratio = new_zoom / old_zoom;
    match (src_mode, dst_mode) {
        (ProjectionMode::Perspective, _) => {
            let (focal, height) = (dst.focal * ratio, dst.height * ratio);
            if !focal.is_finite() || !height.is_finite() {
                return;
            }
            dst.focal = focal;
            dst.height = height;
        }
        (ProjectionMode::Orthographic, ProjectionMode::Orthographic) => {
            let height = dst.height * ratio;
            if !height.is_finite() {
                return;
            }
            dst.height = height;
        }
        (ProjectionMode::Orthographic, ProjectionMode::Perspective) => {
            let focal = dst.focal * ratio;
            if !focal.is_finite() {
                return;
            }
            let direction = dst.pose().view_direction();
            let position = dst.position - direction * (focal - dst.focal);
            if position.to_vec().magnitude() <= config.position_limit {
                dst.position = position;
            }
            dst.focal = focal;
        }
    }
}
