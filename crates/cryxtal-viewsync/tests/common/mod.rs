#![allow(dead_code)]

use cryxtal_base::{DocumentId, ViewId};
use cryxtal_geometry::{Point3, Vector3, Viewpoint, identity_rotation};
use cryxtal_viewsync::{Result, ViewSync};

pub const EPS: f64 = 1.0e-9;

pub fn persp(x: f64, y: f64, z: f64, focal: f64) -> Viewpoint {
    Viewpoint::perspective(Point3::new(x, y, z), identity_rotation(), focal)
}

pub fn ortho(x: f64, y: f64, z: f64, height: f64) -> Viewpoint {
    Viewpoint::orthographic(Point3::new(x, y, z), identity_rotation(), height)
}

/// One document holding a 3D view per `(title, camera)` pair.
pub fn scene(views: &[(&str, Viewpoint)]) -> Result<(ViewSync, DocumentId, Vec<ViewId>)> {
    let mut sync = ViewSync::default();
    let doc = sync.open_document("Part");
    let mut ids = Vec::new();
    for (title, viewpoint) in views {
        ids.push(sync.open_view(doc, *title, *viewpoint)?);
    }
    Ok((sync, doc, ids))
}

pub fn camera(sync: &ViewSync, view: ViewId) -> Viewpoint {
    sync.viewpoint(view).expect("view has a camera")
}

pub fn assert_point(actual: Point3, expected: Point3) {
    assert!(
        (actual.x - expected.x).abs() < EPS
            && (actual.y - expected.y).abs() < EPS
            && (actual.z - expected.z).abs() < EPS,
        "expected {expected:?}, got {actual:?}"
    );
}

pub fn assert_vector(actual: Vector3, expected: Vector3) {
    assert!(
        (actual.x - expected.x).abs() < EPS
            && (actual.y - expected.y).abs() < EPS
            && (actual.z - expected.z).abs() < EPS,
        "expected {expected:?}, got {actual:?}"
    );
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < EPS, "expected {expected}, got {actual}");
}
