//! Axis-aligned bounding boxes in block space.

use cgmath::Point3;

/// An axis-aligned bounding box.
///
/// `min` is inclusive. `max` is exclusive for chunk volumes and for the
/// range boxes built by the cache manager, so adjacent chunks touch without
/// overlapping.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    /// Lowest corner.
    pub min: Point3<f32>,
    /// Highest corner.
    pub max: Point3<f32>,
}

impl Aabb {
    /// Creates a box from two corners.
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// Whether `other` lies entirely inside this box (touching faces count).
    pub fn contains_aabb(&self, other: &Aabb) -> bool {
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.min.z >= self.min.z
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
            && other.max.z <= self.max.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box(x: f32, z: f32) -> Aabb {
        Aabb::new(Point3::new(x, 0.0, z), Point3::new(x + 1.0, 1.0, z + 1.0))
    }

    #[test]
    fn touching_faces_count_as_contained() {
        let outer = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 1.0, 2.0));

        assert!(outer.contains_aabb(&unit_box(1.0, 1.0)));
        assert!(outer.contains_aabb(&unit_box(0.0, 0.0)));
        assert!(!outer.contains_aabb(&unit_box(1.5, 1.0)));
        assert!(!outer.contains_aabb(&unit_box(-0.5, 0.0)));
    }
}
