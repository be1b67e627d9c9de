use crate::{Point3, Vector3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Point3,
    pub max: Point3,
}

impl Bounds {
    pub fn new(a: Point3, b: Point3) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    pub fn around(center: Point3, radius: f64) -> Self {
        let r = Vector3::new(radius, radius, radius);
        Self::new(center - r, center + r)
    }

    pub fn center(&self) -> Point3 {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    /// Half of the largest extent, never below 0.5.
    pub fn radius(&self) -> f64 {
        let size = self.size();
        size.x.abs().max(size.y.abs()).max(size.z.abs()).max(1.0) * 0.5
    }

    pub fn union(&self, other: &Bounds) -> Self {
        Self {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_covers_both_boxes() {
        let a = Bounds::new(Point3::new(-1.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let b = Bounds::new(Point3::new(0.0, -2.0, 0.5), Point3::new(3.0, 0.5, 0.5));
        let joined = a.union(&b);
        assert_eq!(joined.min, Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(joined.max, Point3::new(3.0, 1.0, 1.0));
        assert_eq!(b.union(&a), joined);
    }

    #[test]
    fn around_is_a_cube_centered_on_the_point() {
        let cube = Bounds::around(Point3::new(1.0, 2.0, 3.0), 2.0);
        assert_eq!(cube.min, Point3::new(-1.0, 0.0, 1.0));
        assert_eq!(cube.max, Point3::new(3.0, 4.0, 5.0));
        assert_eq!(cube.center(), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn radius_follows_the_largest_extent() {
        let slab = Bounds::new(Point3::new(0.0, 0.0, 0.0), Point3::new(6.0, 2.0, 1.0));
        assert_eq!(slab.radius(), 3.0);
        let speck = Bounds::new(Point3::new(0.0, 0.0, 0.0), Point3::new(0.1, 0.1, 0.1));
        assert_eq!(speck.radius(), 0.5);
    }
}
