//! Math utilities
//!
//! Re-exports from glam and bounds helpers for imported point sets.

pub use glam::{IVec3, Vec2, Vec3};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create an empty AABB
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Bounds of a point set, `None` when there are no points
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut aabb = Self::EMPTY;
        for &point in points {
            aabb.expand_to_include(point);
        }
        Some(aabb)
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the full size of the AABB
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Expand the AABB to include a point
    pub fn expand_to_include(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points() {
        let points = [
            Vec3::new(-1.0, 2.0, 0.0),
            Vec3::new(3.0, -2.0, 4.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        let aabb = Aabb::from_points(&points).unwrap();
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(3.0, 2.0, 4.0));
        assert_eq!(aabb.center(), Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(aabb.size(), Vec3::new(4.0, 4.0, 4.0));
    }

    #[test]
    fn test_aabb_empty() {
        assert!(Aabb::from_points(&[]).is_none());
    }

    #[test]
    fn test_aabb_single_point() {
        let aabb = Aabb::from_points(&[Vec3::splat(2.0)]).unwrap();
        assert_eq!(aabb.center(), Vec3::splat(2.0));
        assert_eq!(aabb.size(), Vec3::ZERO);
    }
}
