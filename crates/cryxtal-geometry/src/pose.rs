use cgmath::{Decomposed, EuclideanSpace, InnerSpace, Matrix3, Rotation, Transform};

use crate::{Point3, Quaternion, RigidTransform, Vector3, identity_rotation};

/// Rigid camera placement. Cameras look down their local -Z axis with +Y up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Point3,
    pub orientation: Quaternion,
}

impl Pose {
    pub fn new(position: Point3, orientation: Quaternion) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn identity() -> Self {
        Self::new(Point3::origin(), identity_rotation())
    }

    pub fn to_transform(&self) -> RigidTransform {
        Decomposed {
            scale: 1.0,
            rot: self.orientation,
            disp: self.position.to_vec(),
        }
    }

    pub fn from_transform(transform: &RigidTransform) -> Self {
        Self::new(Point3::from_vec(transform.disp), transform.rot)
    }

    pub fn view_direction(&self) -> Vector3 {
        self.orientation.rotate_vector(Vector3::new(0.0, 0.0, -1.0))
    }

    /// Moves this pose by the world-space motion that took `from` to `to`,
    /// i.e. `to * from^-1 * self`. Offsets between the poses survive.
    pub fn carried(&self, from: &Pose, to: &Pose) -> Option<Pose> {
        if from.orientation.magnitude2() <= f64::EPSILON {
            return None;
        }
        let inverse = <RigidTransform as Transform<Point3>>::inverse_transform(&from.to_transform())?;
        let delta = concat(&to.to_transform(), &inverse);
        let moved = concat(&delta, &self.to_transform());
        Some(Self::from_transform(&moved))
    }
}

fn concat(a: &RigidTransform, b: &RigidTransform) -> RigidTransform {
    <RigidTransform as Transform<Point3>>::concat(a, b)
}

/// Orientation whose -Z axis points along `direction`, keeping `up` as close to +Y as possible.
pub fn look_rotation(direction: Vector3, up: Vector3) -> Option<Quaternion> {
    if direction.magnitude2() <= 1.0e-12 {
        return None;
    }
    let back = (-direction).normalize();
    let mut right = up.cross(back);
    if right.magnitude2() <= 1.0e-12 {
        let fallback = if back.z.abs() < 0.9 {
            Vector3::unit_z()
        } else {
            Vector3::unit_y()
        };
        right = fallback.cross(back);
    }
    let right = right.normalize();
    let up = back.cross(right);
    Some(Quaternion::from(Matrix3::from_cols(right, up, back)))
}
