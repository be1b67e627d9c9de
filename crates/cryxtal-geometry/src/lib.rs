pub type Point3 = cgmath::Point3<f64>;
pub type Vector3 = cgmath::Vector3<f64>;
pub type Quaternion = cgmath::Quaternion<f64>;
pub type RigidTransform = cgmath::Decomposed<Vector3, Quaternion>;

pub use cgmath::{Deg, Rad};

mod bounds;
mod pose;
mod viewpoint;

pub use bounds::Bounds;
pub use pose::{Pose, look_rotation};
pub use viewpoint::{ProjectionMode, Viewpoint};

pub fn identity_rotation() -> Quaternion {
    Quaternion::new(1.0, 0.0, 0.0, 0.0)
}
