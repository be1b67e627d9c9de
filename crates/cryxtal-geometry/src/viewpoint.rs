use cgmath::{EuclideanSpace, InnerSpace, Rad};
use cryxtal_base::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::{Bounds, Point3, Pose, Quaternion, Vector3, look_rotation};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    Perspective,
    Orthographic,
}

impl std::fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Perspective => f.write_str("perspective"),
            Self::Orthographic => f.write_str("orthographic"),
        }
    }
}

/// Camera state of one 3D view.
///
/// `zoom` is the focal distance for perspective cameras and the visible
/// world-space height for orthographic ones.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewpoint {
    pub position: Point3,
    pub orientation: Quaternion,
    pub projection: ProjectionMode,
    pub zoom: f64,
}

impl Viewpoint {
    pub fn new(
        position: Point3,
        orientation: Quaternion,
        projection: ProjectionMode,
        zoom: f64,
    ) -> Self {
        Self {
            position,
            orientation,
            projection,
            zoom,
        }
    }

    pub fn perspective(position: Point3, orientation: Quaternion, focal_distance: f64) -> Self {
        Self::new(position, orientation, ProjectionMode::Perspective, focal_distance)
    }

    pub fn orthographic(position: Point3, orientation: Quaternion, height: f64) -> Self {
        Self::new(position, orientation, ProjectionMode::Orthographic, height)
    }

    pub fn look_at(
        eye: Point3,
        target: Point3,
        up: Vector3,
        projection: ProjectionMode,
        zoom: f64,
    ) -> Option<Self> {
        let orientation = look_rotation(target - eye, up)?;
        Some(Self::new(eye, orientation, projection, zoom))
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.orientation)
    }

    pub fn view_direction(&self) -> Vector3 {
        self.pose().view_direction()
    }

    /// Validates host input: finite values, a usable rotation and a positive zoom.
    /// The rotation is normalized and tiny zooms are raised to `min_zoom`.
    pub fn checked(mut self, min_zoom: f64) -> Result<Self> {
        let p = self.position;
        if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
            return Err(Error::InvalidParameter("position must be finite".to_string()));
        }
        let len = self.orientation.magnitude();
        if !len.is_finite() || len <= 1.0e-12 {
            return Err(Error::InvalidParameter(
                "orientation must be a non-zero rotation".to_string(),
            ));
        }
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "zoom must be > 0 (got {})",
                self.zoom
            )));
        }
        self.orientation = self.orientation / len;
        self.zoom = self.zoom.max(min_zoom);
        Ok(self)
    }

    /// Focal distance of the equivalent perspective camera.
    pub fn equivalent_focal(&self, height_angle: Rad<f64>) -> f64 {
        match self.projection {
            ProjectionMode::Perspective => self.zoom,
            ProjectionMode::Orthographic => self.zoom / (2.0 * half_tan(height_angle)),
        }
    }

    pub fn focal_point(&self, height_angle: Rad<f64>) -> Point3 {
        self.position + self.view_direction() * self.equivalent_focal(height_angle)
    }

    /// Half of the visible height at the focal point.
    pub fn framed_radius(&self, height_angle: Rad<f64>) -> f64 {
        match self.projection {
            ProjectionMode::Perspective => self.zoom * half_tan(height_angle),
            ProjectionMode::Orthographic => self.zoom * 0.5,
        }
    }

    /// Same pose expressed as a camera of another projection type.
    pub fn converted(&self, projection: ProjectionMode, height_angle: Rad<f64>) -> Self {
        if projection == self.projection {
            return *self;
        }
        let zoom = match projection {
            ProjectionMode::Orthographic => 2.0 * self.zoom * half_tan(height_angle),
            ProjectionMode::Perspective => self.equivalent_focal(height_angle),
        };
        Self::new(self.position, self.orientation, projection, zoom)
    }

    /// Keeps the view direction and frames `bounds` at `margin` bounding radii.
    pub fn fitted(&self, bounds: &Bounds, margin: f64, height_angle: Rad<f64>) -> Self {
        let radius = bounds.radius();
        let distance = radius * margin;
        let dir = self.view_direction();
        let position = bounds.center() - dir * distance;
        let zoom = match self.projection {
            ProjectionMode::Perspective => distance,
            ProjectionMode::Orthographic => 2.0 * distance * half_tan(height_angle),
        };
        Self::new(position, self.orientation, self.projection, zoom)
    }

    /// Scales the view by `factor`; perspective cameras dolly toward the focal point.
    pub fn zoomed(&self, factor: f64) -> Self {
        let mut out = *self;
        match self.projection {
            ProjectionMode::Perspective => {
                let focal = self.zoom / factor;
                out.position = self.position + self.view_direction() * (self.zoom - focal);
                out.zoom = focal;
            }
            ProjectionMode::Orthographic => out.zoom = self.zoom / factor,
        }
        out
    }

    pub fn interpolate(&self, to: &Viewpoint, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let position = Point3::from_vec(
            self.position.to_vec() + (to.position.to_vec() - self.position.to_vec()) * t,
        );
        let orientation = if t >= 1.0 {
            to.orientation
        } else {
            self.orientation.slerp(to.orientation, t)
        };
        let zoom = self.zoom + (to.zoom - self.zoom) * t;
        let projection = if t >= 1.0 { to.projection } else { self.projection };
        Self::new(position, orientation, projection, zoom)
    }
}

fn half_tan(height_angle: Rad<f64>) -> f64 {
    (height_angle.0 * 0.5).tan()
}
