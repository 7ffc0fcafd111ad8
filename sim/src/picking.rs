/*!
Pointer picking: NDC coordinate → world ray → nearest interactable owner.

Interactable objects may be built from several child meshes. The registry
stores every leaf mesh as its own collider but reports hits by the logical
owner (the named parent group), so a click on a creature's ear resolves to the
creature.

Notes
- Ray hits are arbitrated by the smallest time of impact; the first entry in
  registry order wins exact ties.
- An empty registry never hits.
*/

use rapier3d::prelude::{QueryFilter, Ray};

use crate::{
    camera::{CameraPose, Projection},
    collision::{MeshRejected, Point3, StaticQueryWorld, TriangleMesh, Vec3},
};
use nalgebra::Vector2;

/// Camera state needed to turn a screen coordinate into a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraView {
    pub position: Vec3,
    pub target: Vec3,
    pub projection: Projection,
}

impl CameraView {
    pub fn new(pose: CameraPose, projection: Projection) -> Self {
        Self {
            position: pose.position,
            target: pose.target,
            projection,
        }
    }

    /// World-space ray through `ndc` (`[-1, 1]` on both axes, +Y up).
    ///
    /// The direction is normalized, so ray parameters are distances.
    pub fn ray_through(&self, ndc: Vector2<f32>) -> Ray {
        let forward = (self.target - self.position)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(|| Vec3::new(0.0, 0.0, 1.0));
        // A camera looking straight up or down has no horizon; pick any right axis.
        let right = forward
            .cross(&Vec3::y())
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vec3::x);
        let up = right.cross(&forward);

        match self.projection {
            Projection::Perspective { fov_y, aspect } => {
                let half = (fov_y * 0.5).tan();
                let dir = forward + right * (ndc.x * half * aspect) + up * (ndc.y * half);
                Ray::new(Point3::from(self.position), dir.normalize())
            }
            Projection::Orthographic {
                half_height,
                aspect,
            } => {
                let origin = self.position
                    + right * (ndc.x * half_height * aspect)
                    + up * (ndc.y * half_height);
                Ray::new(Point3::from(origin), forward)
            }
        }
    }
}

/// One pickable leaf mesh and the logical object it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interactable {
    /// Scene name of the leaf mesh.
    pub leaf: String,
    /// Name reported to the dispatcher.
    pub owner: String,
}

/// Ordered, immutable set of pickable meshes.
#[derive(Default)]
pub struct InteractableRegistry {
    entries: Vec<Interactable>,
    statics: Option<StaticQueryWorld>,
}

impl InteractableRegistry {
    /// Registry with nothing to pick.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from `(entry, world-space mesh)` pairs, keeping their order.
    pub fn build(
        items: impl IntoIterator<Item = (Interactable, TriangleMesh)>,
    ) -> Result<Self, MeshRejected> {
        let (entries, meshes): (Vec<_>, Vec<_>) = items.into_iter().unzip();
        if entries.is_empty() {
            return Ok(Self::empty());
        }
        let statics = StaticQueryWorld::build(meshes.iter())?;
        Ok(Self {
            entries,
            statics: Some(statics),
        })
    }

    #[inline]
    pub fn entries(&self) -> &[Interactable] {
        &self.entries
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Owner name of the nearest entry hit by `ray` within `max_distance`.
    pub fn pick(&self, ray: &Ray, max_distance: f32) -> Option<&str> {
        let statics = self.statics.as_ref()?;
        let pipeline = statics.as_query_pipeline(QueryFilter::default());
        let (handle, _) = pipeline.cast_ray_and_get_normal(ray, max_distance, true)?;
        let index = statics.mesh_index(handle)?;
        self.entries.get(index).map(|entry| entry.owner.as_str())
    }
}

/// Resolve a pointer coordinate to the owner name under it, if any.
pub fn pick<'r>(
    ndc: Vector2<f32>,
    view: &CameraView,
    registry: &'r InteractableRegistry,
    max_distance: f32,
) -> Option<&'r str> {
    registry.pick(&view.ray_through(ndc), max_distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn entry(leaf: &str, owner: &str) -> Interactable {
        Interactable {
            leaf: leaf.into(),
            owner: owner.into(),
        }
    }

    fn block(z: f32) -> TriangleMesh {
        TriangleMesh::cuboid(Vec3::new(0.0, 0.0, z), Vec3::new(0.5, 0.5, 0.5))
    }

    fn view_down_z() -> CameraView {
        CameraView {
            position: Vec3::zeros(),
            target: Vec3::new(0.0, 0.0, 1.0),
            projection: Projection::Perspective {
                fov_y: 0.5,
                aspect: 1.0,
            },
        }
    }

    #[test]
    fn nearest_hit_wins_regardless_of_order() {
        let registry = InteractableRegistry::build([
            (entry("far_leaf", "far"), block(10.0)),
            (entry("near_leaf", "near"), block(5.0)),
        ])
        .unwrap();

        let hit = pick(Vector2::zeros(), &view_down_z(), &registry, 100.0);

        assert_eq!(hit, Some("near"));
    }

    #[test]
    fn leaf_hits_report_their_owner() {
        let registry =
            InteractableRegistry::build([(entry("ear", "creature_1"), block(5.0))]).unwrap();

        assert_eq!(
            pick(Vector2::zeros(), &view_down_z(), &registry, 100.0),
            Some("creature_1")
        );
    }

    #[test]
    fn misses_and_empty_registries_return_none() {
        let registry = InteractableRegistry::build([(entry("a", "a"), block(5.0))]).unwrap();
        let view = view_down_z();

        // Off to the side of the frustum edge.
        assert_eq!(pick(Vector2::new(1.0, 1.0), &view, &registry, 100.0), None);
        // Beyond reach.
        assert_eq!(pick(Vector2::zeros(), &view, &registry, 2.0), None);
        assert_eq!(
            pick(Vector2::zeros(), &view, &InteractableRegistry::empty(), 100.0),
            None
        );
    }

    #[test]
    fn center_ray_follows_the_view_direction() {
        let view = CameraView {
            position: Vec3::new(0.0, 18.0, -22.0),
            target: Vec3::new(0.0, 1.0, 2.0),
            projection: Projection::Perspective {
                fov_y: 0.5,
                aspect: 16.0 / 9.0,
            },
        };

        let ray = view.ray_through(Vector2::zeros());
        let expected = (view.target - view.position).normalize();

        assert_relative_eq!(ray.dir, expected, epsilon = 1.0e-5);
        assert_relative_eq!(ray.dir.norm(), 1.0, epsilon = 1.0e-5);
    }

    #[test]
    fn ndc_edges_span_the_field_of_view() {
        let view = view_down_z();

        let top = view.ray_through(Vector2::new(0.0, 1.0));
        let right = view.ray_through(Vector2::new(1.0, 0.0));

        assert_relative_eq!(top.dir.y.atan2(top.dir.z), 0.25, epsilon = 1.0e-5);
        // +X is left in this frame, so the right edge leans toward -X.
        assert!(right.dir.x < 0.0);
        assert_relative_eq!((-right.dir.x).atan2(right.dir.z), 0.25, epsilon = 1.0e-5);
    }

    #[test]
    fn orthographic_rays_are_parallel() {
        let view = CameraView {
            projection: Projection::Orthographic {
                half_height: 4.0,
                aspect: 1.0,
            },
            ..view_down_z()
        };

        let a = view.ray_through(Vector2::new(-1.0, 0.5));
        let b = view.ray_through(Vector2::new(0.5, -1.0));

        assert_eq!(a.dir, b.dir);
        assert_relative_eq!(a.origin.y, 2.0, epsilon = 1.0e-5);
        assert_relative_eq!(b.origin.y, -4.0, epsilon = 1.0e-5);
    }
}
