/*!
Core collision types and math aliases shared by the collision submodules.

This module intentionally contains no queries. It defines the data exchanged
between the static query world, the capsule penetration query and the
physics integrator.
*/

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Point3 = na::Point3<f32>;
pub type Iso = na::Isometry3<f32>;

/// Swept collision volume of the character: a segment plus a radius.
///
/// `start` is the lower segment point and `end` the upper one. The character's
/// feet sit one radius below `start`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Capsule {
    pub start: Vec3,
    pub end: Vec3,
    pub radius: f32,
}

impl Capsule {
    #[inline]
    pub fn new(start: Vec3, end: Vec3, radius: f32) -> Self {
        Self { start, end, radius }
    }

    /// Build an upright capsule whose feet rest at `feet`.
    ///
    /// `height` is the height of the upper segment point above the feet.
    #[inline]
    pub fn standing_at(feet: Vec3, radius: f32, height: f32) -> Self {
        Self {
            start: feet + Vec3::new(0.0, radius, 0.0),
            end: feet + Vec3::new(0.0, height, 0.0),
            radius,
        }
    }

    /// Move both segment points by `delta`.
    #[inline]
    pub fn translate(&mut self, delta: Vec3) {
        self.start += delta;
        self.end += delta;
    }

    /// World position of the feet (lower segment point minus one radius).
    #[inline]
    pub fn feet(&self) -> Vec3 {
        self.start - Vec3::new(0.0, self.radius, 0.0)
    }

    /// Place the capsule so its feet land on `feet`, keeping its shape.
    #[inline]
    pub fn set_feet(&mut self, feet: Vec3) {
        let delta = feet - self.feet();
        self.translate(delta);
    }
}

/// Deepest contact between the capsule and the static world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapsuleContact {
    /// Unit surface normal pointing out of the world, toward the capsule.
    pub normal: Vec3,
    /// Penetration depth along `normal` (meters, `>= 0`).
    pub depth: f32,
}

impl CapsuleContact {
    /// Whether this contact counts as standing ground: the normal must point
    /// up at least `min_normal_y` (the cosine of the steepest walkable slope).
    #[inline]
    pub fn is_floor(&self, min_normal_y: f32) -> bool {
        self.normal.y > min_normal_y
    }
}

/// Triangle soup in world space (vertices plus index triples).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3>,
    pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    pub fn new(vertices: Vec<Point3>, indices: Vec<[u32; 3]>) -> Self {
        Self { vertices, indices }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Transform every vertex by `iso` after scaling by `scale`.
    pub fn transformed(&self, iso: &Iso, scale: Vec3) -> Self {
        let vertices = self
            .vertices
            .iter()
            .map(|p| iso * Point3::new(p.x * scale.x, p.y * scale.y, p.z * scale.z))
            .collect();
        Self {
            vertices,
            indices: self.indices.clone(),
        }
    }

    /// Axis-aligned quad at height `y`, spanning `[-half, half]` on X and Z.
    ///
    /// Handy for floors in tests and simple scenes.
    pub fn horizontal_quad(y: f32, half: f32) -> Self {
        Self::new(
            vec![
                Point3::new(-half, y, -half),
                Point3::new(half, y, -half),
                Point3::new(half, y, half),
                Point3::new(-half, y, half),
            ],
            vec![[0, 2, 1], [0, 3, 2]],
        )
    }

    /// Closed axis-aligned box centered at `center`.
    pub fn cuboid(center: Vec3, half_extents: Vec3) -> Self {
        let (hx, hy, hz) = (half_extents.x, half_extents.y, half_extents.z);
        let c = center;
        let vertices = vec![
            Point3::new(c.x - hx, c.y - hy, c.z - hz),
            Point3::new(c.x + hx, c.y - hy, c.z - hz),
            Point3::new(c.x + hx, c.y + hy, c.z - hz),
            Point3::new(c.x - hx, c.y + hy, c.z - hz),
            Point3::new(c.x - hx, c.y - hy, c.z + hz),
            Point3::new(c.x + hx, c.y - hy, c.z + hz),
            Point3::new(c.x + hx, c.y + hy, c.z + hz),
            Point3::new(c.x - hx, c.y + hy, c.z + hz),
        ];
        let indices = vec![
            // -Z
            [0, 2, 1],
            [0, 3, 2],
            // +Z
            [4, 5, 6],
            [4, 6, 7],
            // -X
            [0, 4, 7],
            [0, 7, 3],
            // +X
            [1, 2, 6],
            [1, 6, 5],
            // -Y
            [0, 1, 5],
            [0, 5, 4],
            // +Y
            [3, 7, 6],
            [3, 6, 2],
        ];
        Self { vertices, indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn standing_capsule_reports_its_feet() {
        let feet = Vec3::new(1.0, 2.0, 3.0);
        let capsule = Capsule::standing_at(feet, 0.35, 1.0);

        assert_relative_eq!(capsule.feet(), feet, epsilon = 1.0e-5);
        assert!((capsule.start.y - 2.35).abs() < 1.0e-6);
        assert!((capsule.end.y - 3.0).abs() < 1.0e-6);
    }

    #[test]
    fn set_feet_keeps_segment_length() {
        let mut capsule = Capsule::standing_at(Vec3::zeros(), 0.35, 1.0);
        let len = (capsule.end - capsule.start).norm();

        capsule.set_feet(Vec3::new(-4.0, 7.5, 2.0));

        assert!((capsule.feet() - Vec3::new(-4.0, 7.5, 2.0)).norm() < 1.0e-6);
        assert!(((capsule.end - capsule.start).norm() - len).abs() < 1.0e-6);
    }

    #[test]
    fn transformed_mesh_applies_scale_then_pose() {
        let mesh = TriangleMesh::horizontal_quad(0.0, 1.0);
        let iso = Iso::translation(0.0, 5.0, 0.0);

        let moved = mesh.transformed(&iso, Vec3::new(2.0, 1.0, 2.0));

        assert_eq!(moved.indices, mesh.indices);
        assert!((moved.vertices[2] - Point3::new(2.0, 5.0, 2.0)).norm() < 1.0e-6);
    }
}
