//! Environment collision world and the capsule penetration query.
//!
//! Every environment triangle is kept as a one-sided face: a capsule overlapping
//! a face is pushed out along that face's normal, never through it. Contacts
//! that only graze an edge or a vertex fall back to a parry capsule-triangle
//! query.

use rapier3d::parry::{
    bounding_volume::{Aabb, BoundingVolume},
    query,
    shape as pshape,
};

use super::{
    query_world::{MeshRejected, StaticQueryWorld},
    types::{Capsule, CapsuleContact, Iso, Point3, TriangleMesh, Vec3},
};

/// Signed distances closer than this are treated as equal when picking the
/// deepest contact.
const DEPTH_TIE: f32 = 1.0e-5;

/// Slack for the point-in-triangle test, so points on a shared edge belong to
/// both neighbours.
const EDGE_SLACK: f32 = 1.0e-5;

/// One environment triangle with its outward normal.
struct Face {
    triangle: pshape::Triangle,
    normal: Vec3,
    aabb: Aabb,
}

impl Face {
    /// `None` for degenerate triangles, which have no normal.
    fn new(a: Point3, b: Point3, c: Point3) -> Option<Self> {
        let normal = (b - a).cross(&(c - a)).try_normalize(1.0e-12)?;
        let triangle = pshape::Triangle::new(a, b, c);
        Some(Self {
            aabb: Aabb::new(a.inf(&b).inf(&c), a.sup(&b).sup(&c)),
            triangle,
            normal,
        })
    }

    /// Signed distance of `p` from the face plane, positive on the front side.
    #[inline]
    fn height(&self, p: &Vec3) -> f32 {
        self.normal.dot(&(p - self.triangle.a.coords))
    }

    /// Whether `p`, projected onto the face plane, lies inside the triangle.
    fn covers(&self, p: &Vec3) -> bool {
        let t = &self.triangle;
        [(t.a, t.b), (t.b, t.c), (t.c, t.a)]
            .iter()
            .all(|(from, to)| {
                let edge = to - from;
                self.normal.dot(&edge.cross(&(p - from.coords))) >= -EDGE_SLACK * edge.norm()
            })
    }
}

/// Candidate contact, ordered by signed distance (negative means overlap).
struct Candidate {
    dist: f32,
    normal: Vec3,
}

impl Candidate {
    /// Deeper wins. Near ties go to the more upward-facing normal, so a
    /// character resting in a corner keeps its floor.
    fn beats(&self, other: &Candidate) -> bool {
        if (self.dist - other.dist).abs() <= DEPTH_TIE {
            self.normal.y > other.normal.y
        } else {
            self.dist < other.dist
        }
    }
}

/// Immutable static collision surface built once from the environment mesh.
///
/// Answers a single question per tick: how deeply does the character capsule
/// penetrate the environment, and along which normal should it be pushed out.
pub struct CollisionWorld {
    statics: StaticQueryWorld,
    faces: Vec<Face>,
    skin: f32,
}

impl CollisionWorld {
    /// Build the world from environment meshes (world space).
    ///
    /// `skin` is the separation still reported as a (zero-depth) contact.
    pub fn build<'a>(
        meshes: impl IntoIterator<Item = &'a TriangleMesh>,
        skin: f32,
    ) -> Result<Self, MeshRejected> {
        let meshes: Vec<&TriangleMesh> = meshes.into_iter().collect();
        let statics = StaticQueryWorld::build(meshes.iter().copied())?;

        // Indices were range-checked by the query world above.
        let faces = meshes
            .iter()
            .flat_map(|mesh| {
                mesh.indices.iter().filter_map(move |&[a, b, c]| {
                    let v = |i: u32| mesh.vertices[i as usize];
                    Face::new(v(a), v(b), v(c))
                })
            })
            .collect();

        Ok(Self {
            statics,
            faces,
            skin: skin.max(0.0),
        })
    }

    /// Underlying query world, for ray casts and debugging.
    pub fn statics(&self) -> &StaticQueryWorld {
        &self.statics
    }

    /// Return the deepest contact between `capsule` and the environment, if any.
    ///
    /// Per face whose AABB overlaps the capsule's (inflated by the skin):
    /// - Skip it when the capsule segment is more than one radius behind the
    ///   plane; faces are one-sided.
    /// - If the deepest segment point projects inside the triangle, the contact
    ///   is the face normal with depth `radius - height`.
    /// - Otherwise, while the segment is still in front of the plane, ask parry
    ///   for the edge or vertex contact.
    ///
    /// The deepest candidate wins.
    pub fn capsule_intersect(&self, capsule: &Capsule) -> Option<CapsuleContact> {
        let shape = pshape::Capsule::new(
            Point3::from(capsule.start),
            Point3::from(capsule.end),
            capsule.radius,
        );
        let identity = Iso::identity();
        let capsule_aabb = shape.aabb(&identity).loosened(self.skin);

        let mut best: Option<Candidate> = None;
        for face in &self.faces {
            if !face.aabb.intersects(&capsule_aabb) {
                continue;
            }
            let Some(candidate) = self.face_contact(face, capsule, &shape) else {
                continue;
            };
            if best.as_ref().map_or(true, |b| candidate.beats(b)) {
                best = Some(candidate);
            }
        }

        best.map(|contact| CapsuleContact {
            normal: contact.normal,
            depth: (-contact.dist).max(0.0),
        })
    }

    fn face_contact(
        &self,
        face: &Face,
        capsule: &Capsule,
        shape: &pshape::Capsule,
    ) -> Option<Candidate> {
        let radius = capsule.radius;
        let h_start = face.height(&capsule.start);
        let h_end = face.height(&capsule.end);
        let lowest = h_start.min(h_end);

        if lowest - radius > self.skin || h_start.max(h_end) < -radius {
            return None;
        }

        // Deepest segment points first. With the segment parallel to the
        // face, the point nearest the triangle centroid is tried too.
        let centroid = face.triangle.center().coords;
        let axis = capsule.end - capsule.start;
        let along = match axis.norm_squared() {
            len2 if len2 > 0.0 => ((centroid - capsule.start).dot(&axis) / len2).clamp(0.0, 1.0),
            _ => 0.0,
        };
        let (deep, shallow) = if h_start <= h_end {
            (capsule.start, capsule.end)
        } else {
            (capsule.end, capsule.start)
        };
        let covered = [deep, capsule.start + axis * along, shallow]
            .into_iter()
            .filter(|p| face.covers(p))
            .map(|p| face.height(&p))
            .reduce(f32::min)
            .filter(|height| height - radius <= self.skin);

        if let Some(height) = covered {
            return Some(Candidate {
                dist: height - radius,
                normal: face.normal,
            });
        }

        // Edge or vertex contact. Only trusted while the segment itself has
        // not crossed the plane; deeper overlaps are left to the covering face.
        if lowest < -self.skin {
            return None;
        }
        let identity = Iso::identity();
        let contact = query::contact(&identity, shape, &identity, &face.triangle, self.skin)
            .ok()
            .flatten()?;
        // normal2 is the triangle-side normal, pointing back toward the capsule.
        let normal = contact.normal2.into_inner();
        (normal.dot(&face.normal) > 0.0).then_some(Candidate {
            dist: contact.dist,
            normal,
        })
    }
}
