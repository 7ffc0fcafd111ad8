//! Rapier-based query world for immutable triangle geometry.
//!
//! Both the collision world (environment) and the interactable registry are
//! built on top of this: a `ColliderSet` of triangle-mesh colliders plus the
//! broad phase needed to borrow a Rapier `QueryPipeline`.
//!
//! Design goals
//! - Deterministic: colliders are inserted in input order and tagged with that index.
//! - Query-focused: no simulation is stepped; the broad phase is updated once.
//! - Immutable world: nothing moves after construction.

use rapier3d::prelude::{
    BroadPhaseBvh, Collider, ColliderBuilder, ColliderHandle, ColliderSet, IntegrationParameters,
    NarrowPhase, QueryFilter, QueryPipeline, RigidBodySet,
};

use super::types::TriangleMesh;
use crate::constants::FIXED_TICK_SECONDS;

/// A triangle mesh that could not be turned into a collider.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshRejected {
    /// Index of the mesh in the input order.
    pub index: usize,
    pub reason: String,
}

/// In-memory Rapier structures for scene queries against static meshes.
pub struct StaticQueryWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
}

impl StaticQueryWorld {
    /// Build a query world with one trimesh collider per input mesh.
    ///
    /// Each collider's `user_data` holds the mesh's index in `meshes`, so query
    /// results can be mapped back to caller-side records.
    pub fn build<'a>(
        meshes: impl IntoIterator<Item = &'a TriangleMesh>,
    ) -> Result<Self, MeshRejected> {
        let bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let mut modified_colliders = Vec::new();

        for (index, mesh) in meshes.into_iter().enumerate() {
            let collider = collider_from_mesh(mesh)
                .map_err(|reason| MeshRejected { index, reason })?
                .user_data(index as u128)
                .build();
            modified_colliders.push(colliders.insert(collider));
        }

        let mut broad_phase = BroadPhaseBvh::new();
        let mut events = Vec::new();
        broad_phase.update(
            &IntegrationParameters {
                dt: FIXED_TICK_SECONDS,
                ..IntegrationParameters::default()
            },
            &colliders,
            &bodies,
            &modified_colliders,
            &[],
            &mut events,
        );

        Ok(Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase: NarrowPhase::default(),
        })
    }

    /// Borrow a `QueryPipeline` over the static colliders.
    pub fn as_query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    /// Iterate every collider in insertion order.
    pub fn colliders(&self) -> impl Iterator<Item = &Collider> {
        self.colliders.iter().map(|(_, collider)| collider)
    }

    /// Input index of the mesh a collider was built from.
    pub fn mesh_index(&self, handle: ColliderHandle) -> Option<usize> {
        self.colliders
            .get(handle)
            .map(|collider| collider.user_data as usize)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

/// Build a fixed trimesh collider from world-space triangles.
///
/// The vertices are already in world space, so the collider keeps an identity pose.
fn collider_from_mesh(mesh: &TriangleMesh) -> Result<ColliderBuilder, String> {
    if mesh.is_empty() {
        return Err("mesh has no triangles".into());
    }
    let vertex_count = mesh.vertices.len() as u32;
    if let Some(bad) = mesh.indices.iter().flatten().find(|&&i| i >= vertex_count) {
        return Err(format!(
            "index {bad} out of range for {vertex_count} vertices"
        ));
    }

    ColliderBuilder::trimesh(mesh.vertices.clone(), mesh.indices.clone())
        .map_err(|err| format!("{err:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::types::{Point3, Vec3};
    use rapier3d::prelude::Ray;

    #[test]
    fn colliders_are_tagged_with_input_index() {
        let floor = TriangleMesh::horizontal_quad(0.0, 5.0);
        let block = TriangleMesh::cuboid(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.5, 0.5, 0.5));

        let world = StaticQueryWorld::build([&floor, &block]).unwrap();
        let pipeline = world.as_query_pipeline(QueryFilter::default());

        // Straight down onto the block: the block is hit before the floor.
        let ray = Ray::new(Point3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let (handle, hit) = pipeline.cast_ray_and_get_normal(&ray, 100.0, true).unwrap();

        assert_eq!(world.len(), 2);
        assert_eq!(world.mesh_index(handle), Some(1));
        assert!((hit.time_of_impact - 8.5).abs() < 1.0e-4);
    }

    #[test]
    fn empty_mesh_is_rejected_with_its_index() {
        let floor = TriangleMesh::horizontal_quad(0.0, 5.0);
        let empty = TriangleMesh::default();

        let err = StaticQueryWorld::build([&floor, &empty]).err().unwrap();

        assert_eq!(err.index, 1);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mesh = TriangleMesh::new(vec![Point3::origin()], vec![[0, 1, 2]]);

        assert!(StaticQueryWorld::build([&mesh]).is_err());
    }
}
