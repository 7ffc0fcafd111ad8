/*!
Collision root module.

This module re-exports submodules that implement the static collision side of
the controller using Rapier/parry for queries:

- types:       shared data types (Capsule, CapsuleContact, TriangleMesh, math aliases)
- query_world: immutable Rapier query world over triangle meshes
- world:       the environment collision world and its capsule penetration query
*/

pub mod query_world;
pub mod types;
pub mod world;

// Re-export commonly used types.
pub use query_world::{MeshRejected, StaticQueryWorld};
pub use types::{Capsule, CapsuleContact, Iso, Point3, TriangleMesh, Vec3};
pub use world::CollisionWorld;
