use cryxtal_geometry::Viewpoint;

/// Timed camera move started by a navigation command while animation is on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    from: Viewpoint,
    to: Viewpoint,
    elapsed: f64,
    duration: f64,
}

impl Transition {
    pub fn new(from: Viewpoint, to: Viewpoint, duration: f64) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration: duration.max(1.0e-6),
        }
    }

    pub fn target(&self) -> Viewpoint {
        self.to
    }

    /// Advances by `dt` seconds and returns the camera for the new time.
    pub fn step(&mut self, dt: f64) -> Viewpoint {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        let t = self.elapsed / self.duration;
        let eased = t * t * (3.0 - 2.0 * t);
        if self.is_finished() {
            self.to
        } else {
            self.from.interpolate(&self.to, eased)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryxtal_geometry::{Point3, identity_rotation};

    #[test]
    fn reaches_target_exactly() {
        let from = Viewpoint::perspective(Point3::new(0.0, 0.0, 10.0), identity_rotation(), 10.0);
        let to = Viewpoint::perspective(Point3::new(4.0, 0.0, 10.0), identity_rotation(), 20.0);
        let mut transition = Transition::new(from, to, 1.0);

        let mid = transition.step(0.5);
        assert!(!transition.is_finished());
        assert!((mid.position.x - 2.0).abs() < 1.0e-9);
        assert!((mid.zoom - 15.0).abs() < 1.0e-9);

        assert_eq!(transition.step(0.75), to);
        assert!(transition.is_finished());
    }
}
