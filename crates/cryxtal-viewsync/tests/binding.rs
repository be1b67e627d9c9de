mod common;

use common::{assert_point, camera, persp, scene};
use cryxtal_geometry::Point3;
use cryxtal_viewsync::{Error, Result, SnapshotSlot, SyncEvent, ViewKind, ViewSync};
use std::collections::BTreeSet;

#[test]
fn bind_records_one_outgoing_edge() -> Result<()> {
    let (mut sync, _, ids) = scene(&[("A", persp(0.0, 0.0, 10.0, 10.0)), ("B", persp(5.0, 0.0, 10.0, 10.0))])?;
    let (a, b) = (ids[0], ids[1]);

    assert_eq!(sync.bind_view(b, "A", false), Some(a));
    assert_eq!(sync.bound_view(b), Some(a));
    assert_eq!(sync.bound_view(a), None);
    assert_eq!(sync.connected_component(a, false), BTreeSet::from([b]));
    assert_eq!(sync.connected_component(b, false), BTreeSet::from([a]));
    // Without sync_now the follower keeps its camera.
    assert_point(camera(&sync, b).position, Point3::new(5.0, 0.0, 10.0));
    assert!(sync.drain_events().contains(&SyncEvent::Bound { view: b, target: a }));
    Ok(())
}

#[test]
fn sync_now_snaps_follower_onto_target() -> Result<()> {
    let (mut sync, _, ids) = scene(&[("A", persp(0.0, 0.0, 10.0, 10.0)), ("B", persp(5.0, 3.0, 1.0, 4.0))])?;
    let (a, b) = (ids[0], ids[1]);

    sync.bind_view(b, "A", true);
    assert_eq!(camera(&sync, b), camera(&sync, a));
    Ok(())
}

#[test]
fn loops_are_refused() -> Result<()> {
    let (mut sync, _, ids) = scene(&[
        ("A", persp(0.0, 0.0, 10.0, 10.0)),
        ("B", persp(1.0, 0.0, 10.0, 10.0)),
        ("C", persp(2.0, 0.0, 10.0, 10.0)),
    ])?;
    let (a, b, c) = (ids[0], ids[1], ids[2]);

    sync.bind_view(b, "A", false);
    sync.bind_view(c, "B", false);
    assert!(!sync.can_bind(a, c));
    assert!(!sync.can_bind(a, a));
    assert_eq!(sync.bind_view(a, "C", false), None);
    assert_eq!(sync.bound_view(a), None);
    assert_eq!(sync.bind_view(a, "A", false), None);
    assert_eq!(
        sync.connected_component(a, true),
        BTreeSet::from([b, c])
    );
    assert!(sync.drain_events().iter().any(|event| matches!(event, SyncEvent::BindRefused { view, .. } if *view == a)));
    Ok(())
}

#[test]
fn rebinding_replaces_the_edge() -> Result<()> {
    let (mut sync, _, ids) = scene(&[
        ("A", persp(0.0, 0.0, 10.0, 10.0)),
        ("B", persp(1.0, 0.0, 10.0, 10.0)),
        ("C", persp(2.0, 0.0, 10.0, 10.0)),
    ])?;
    let (a, b, c) = (ids[0], ids[1], ids[2]);

    sync.bind_view(b, "A", false);
    assert_eq!(sync.bind_view(b, "C", false), Some(c));
    assert_eq!(sync.bound_view(b), Some(c));
    assert!(sync.connected_component(a, false).is_empty());

    assert_eq!(sync.bind_view(b, "", false), None);
    assert_eq!(sync.bound_view(b), None);
    assert!(sync.snapshot(b, SnapshotSlot::Bound).is_some_and(|s| s.subscription().is_none()));
    Ok(())
}

#[test]
fn unbind_without_filter_clears_every_incident_edge() -> Result<()> {
    let (mut sync, _, ids) = scene(&[
        ("A", persp(0.0, 0.0, 10.0, 10.0)),
        ("B", persp(1.0, 0.0, 10.0, 10.0)),
        ("C", persp(2.0, 0.0, 10.0, 10.0)),
        ("D", persp(3.0, 0.0, 10.0, 10.0)),
    ])?;
    let (a, b, c) = (ids[0], ids[1], ids[2]);

    sync.bind_view(b, "A", false);
    sync.bind_view(c, "A", false);
    sync.bind_view(a, "D", false);
    assert!(sync.unbind_view(a, ""));
    assert_eq!(sync.bound_view(a), None);
    assert_eq!(sync.bound_view(b), None);
    assert_eq!(sync.bound_view(c), None);
    Ok(())
}

#[test]
fn unbind_by_title_severs_one_edge_either_direction() -> Result<()> {
    let (mut sync, _, ids) = scene(&[
        ("A", persp(0.0, 0.0, 10.0, 10.0)),
        ("B", persp(1.0, 0.0, 10.0, 10.0)),
        ("C", persp(2.0, 0.0, 10.0, 10.0)),
    ])?;
    let (a, b, c) = (ids[0], ids[1], ids[2]);

    sync.bind_view(b, "A", false);
    sync.bind_view(c, "A", false);
    assert!(!sync.unbind_view(a, "Nope"));
    assert!(sync.unbind_view(a, "B"));
    assert_eq!(sync.bound_view(b), None);
    assert_eq!(sync.bound_view(c), Some(a));

    assert!(sync.unbind_view(c, "A"));
    assert_eq!(sync.bound_view(c), None);
    Ok(())
}

#[test]
fn closing_a_target_detaches_its_followers() -> Result<()> {
    let (mut sync, _, ids) = scene(&[("A", persp(0.0, 0.0, 10.0, 10.0)), ("B", persp(1.0, 0.0, 10.0, 10.0))])?;
    let (a, b) = (ids[0], ids[1]);

    sync.bind_view(b, "A", false);
    sync.drain_events();
    sync.close_view(a)?;

    assert_eq!(sync.bound_view(b), None);
    assert!(sync.viewport(b).is_some_and(|viewport| viewport.bound_camera().is_none()));
    assert_eq!(sync.cameras().len(), 1);
    let events = sync.drain_events();
    assert!(events.contains(&SyncEvent::Unbound { view: b }));
    assert!(events.contains(&SyncEvent::ViewClosed { view: a }));

    // The survivor still navigates normally.
    sync.navigate(b, persp(4.0, 0.0, 10.0, 10.0))?;
    assert_point(camera(&sync, b).position, Point3::new(4.0, 0.0, 10.0));
    Ok(())
}

#[test]
fn non_3d_windows_cannot_be_bound_or_navigated() -> Result<()> {
    let mut sync = ViewSync::default();
    let doc = sync.open_document("Part");
    let view = sync.open_view(doc, "Model", persp(0.0, 0.0, 10.0, 10.0))?;
    let page = sync.open_window(doc, "Page", ViewKind::Drawing)?;

    assert_eq!(sync.bind_view(view, "Page", false), None);
    assert!(matches!(
        sync.navigate(page, persp(0.0, 0.0, 1.0, 1.0)),
        Err(Error::NotThreeDView(_))
    ));
    assert_eq!(sync.bind_view(page, "Model", false), None);
    assert!(!sync.unbind_view(page, ""));
    Ok(())
}

#[test]
fn host_errors_are_reported() -> Result<()> {
    let mut sync = ViewSync::default();
    let other = ViewSync::default().open_document("Elsewhere");
    assert!(matches!(
        sync.open_view(other, "A", persp(0.0, 0.0, 10.0, 10.0)),
        Err(Error::UnknownDocument(_))
    ));
    assert!(sync.cameras().is_empty());

    let doc = sync.open_document("Part");
    assert!(matches!(
        sync.open_view(doc, "A", persp(0.0, 0.0, 10.0, -1.0)),
        Err(Error::Base(_))
    ));
    Ok(())
}

#[test]
fn closing_a_document_closes_its_views() -> Result<()> {
    let mut sync = ViewSync::default();
    let first = sync.open_document("First");
    let second = sync.open_document("Second");
    let a = sync.open_view(first, "A", persp(0.0, 0.0, 10.0, 10.0))?;
    let b = sync.open_view(second, "B", persp(1.0, 0.0, 10.0, 10.0))?;
    sync.bind_view(b, "A", false);

    sync.close_document(first)?;
    assert!(sync.viewport(a).is_none());
    assert_eq!(sync.bound_view(b), None);
    assert_eq!(sync.registry().documents().len(), 1);
    Ok(())
}

#[test]
fn binding_across_documents_by_title() -> Result<()> {
    let mut sync = ViewSync::default();
    let first = sync.open_document("First");
    let second = sync.open_document("Second");
    let a = sync.open_view(first, "Shared", persp(0.0, 0.0, 10.0, 10.0))?;
    let b = sync.open_view(second, "Shared", persp(1.0, 0.0, 10.0, 10.0))?;

    // The view itself is skipped when resolving the title.
    assert_eq!(sync.bind_view(b, "Shared", false), Some(a));
    assert_eq!(sync.bind_view(a, "Shared", false), None);
    Ok(())
}

#[test]
fn components_agree_from_every_member() -> Result<()> {
    let (mut sync, _, ids) = scene(&[
        ("A", persp(0.0, 0.0, 10.0, 10.0)),
        ("B", persp(1.0, 0.0, 10.0, 10.0)),
        ("C", persp(2.0, 0.0, 10.0, 10.0)),
    ])?;
    let (a, b, c) = (ids[0], ids[1], ids[2]);
    sync.bind_view(a, "B", false);
    sync.bind_view(c, "B", false);

    assert_eq!(sync.connected_component(a, true), BTreeSet::from([b, c]));
    assert_eq!(sync.connected_component(b, true), BTreeSet::from([a, c]));
    assert_eq!(sync.connected_component(c, true), BTreeSet::from([a, b]));
    // Non-recursive queries only see direct neighbours.
    assert_eq!(sync.connected_component(a, false), BTreeSet::from([b]));
    Ok(())
}

#[test]
fn binding_the_head_of_a_chain_to_its_tail_is_refused() -> Result<()> {
    let (mut sync, _, ids) = scene(&[
        ("A", persp(0.0, 0.0, 10.0, 10.0)),
        ("B", persp(1.0, 0.0, 10.0, 10.0)),
        ("C", persp(2.0, 0.0, 10.0, 10.0)),
    ])?;
    let (a, c) = (ids[0], ids[2]);
    sync.bind_view(a, "B", false);
    sync.bind_view(ids[1], "C", false);

    assert!(!sync.can_bind(c, a));
    assert_eq!(sync.bind_view(c, "A", false), None);
    Ok(())
}
