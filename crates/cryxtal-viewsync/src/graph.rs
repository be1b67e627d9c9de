//! Binding graph queries. Every view has at most one outgoing edge, toward the
//! view whose own camera its bound snapshot tracks.

use cryxtal_base::ViewId;
use std::collections::BTreeSet;

use crate::registry::ViewRegistry;

/// The view whose own camera `view` follows.
pub fn binding_target(registry: &ViewRegistry, view: ViewId) -> Option<ViewId> {
    let camera = registry.viewport(view)?.bound_camera()?;
    registry
        .viewports()
        .find(|(_, viewport)| viewport.camera() == camera)
        .map(|(id, _)| id)
}

/// Views directly bound to `view`.
pub fn followers(registry: &ViewRegistry, view: ViewId) -> Vec<ViewId> {
    registry
        .view_ids()
        .into_iter()
        .filter(|other| binding_target(registry, *other) == Some(view))
        .collect()
}

/// Views linked to `view` by binding edges in either direction; with
/// `recursive`, the whole transitive component. Never contains `view`.
pub fn connected_component(registry: &ViewRegistry, view: ViewId, recursive: bool) -> BTreeSet<ViewId> {
    let mut visited = BTreeSet::new();
    visited.insert(view);
    collect(registry, view, recursive, &mut visited);
    visited.remove(&view);
    visited
}

fn collect(registry: &ViewRegistry, view: ViewId, recursive: bool, visited: &mut BTreeSet<ViewId>) {
    if let Some(target) = binding_target(registry, view) {
        if visited.insert(target) && recursive {
            collect(registry, target, true, visited);
        }
    }
    for follower in followers(registry, view) {
        if visited.insert(follower) && recursive {
            collect(registry, follower, true, visited);
        }
    }
}

/// Binding `from` to `to` must not close a loop in the binding graph.
pub fn can_bind(registry: &ViewRegistry, from: ViewId, to: ViewId) -> bool {
    if from == to {
        return false;
    }
    !connected_component(registry, to, true).contains(&from)
}
