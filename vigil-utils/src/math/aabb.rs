//! Axis-aligned bounding boxes with the exclusive-bound overlap rules the
//! client's collision code uses.

use glam::Vec3;

/// An axis-aligned bounding box between two corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// The lower corner on all three axes.
    pub min: Vec3,
    /// The upper corner on all three axes.
    pub max: Vec3,
}

impl Aabb {
    /// Creates a box from two corners. The caller is responsible for
    /// `min <= max` component-wise.
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Creates an entity box of the given width and height with its feet at
    /// the origin, centered on X and Z.
    #[must_use]
    pub fn from_dimensions(width: f32, height: f32) -> Self {
        let half = width / 2.0;
        Self {
            min: Vec3::new(-half, 0.0, -half),
            max: Vec3::new(half, height, half),
        }
    }

    /// Returns the box moved by `delta`.
    #[must_use]
    pub fn translate(&self, delta: Vec3) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Grows the box along `vel`: negative components extend `min`, positive
    /// components extend `max`. This is the swept volume used to gather
    /// collision candidates for one step of motion.
    #[must_use]
    pub fn extend(&self, vel: Vec3) -> Self {
        let mut min = self.min;
        let mut max = self.max;
        for axis in 0..3 {
            if vel[axis] < 0.0 {
                min[axis] += vel[axis];
            } else {
                max[axis] += vel[axis];
            }
        }
        Self { min, max }
    }

    /// Grows the box by `amount` in every direction.
    #[must_use]
    pub fn grow(&self, amount: f32) -> Self {
        let delta = Vec3::splat(amount);
        Self {
            min: self.min - delta,
            max: self.max + delta,
        }
    }

    /// Returns whether the two boxes overlap. Bounds are exclusive: touching
    /// faces do not count as an intersection.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Returns the point inside the box closest to `p`.
    #[must_use]
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        p.clamp(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_faces_do_not_intersect() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = a.translate(Vec3::new(1.0, 0.0, 0.0));
        assert!(!a.intersects(&b));
        assert!(a.intersects(&a.translate(Vec3::new(0.5, 0.0, 0.0))));
    }

    #[test]
    fn extend_is_directional() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let swept = a.extend(Vec3::new(0.5, -0.25, 0.0));
        assert_eq!(swept.max.x, 1.5);
        assert_eq!(swept.min.y, -0.25);
        assert_eq!(swept.min.x, 0.0);
    }

    #[test]
    fn closest_point_clamps_to_bounds() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert_eq!(a.closest_point(Vec3::new(2.0, 0.5, -1.0)), Vec3::new(1.0, 0.5, 0.0));
    }
}
