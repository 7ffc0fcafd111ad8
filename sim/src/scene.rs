/*!
Two-phase scene load: a flat node list in, a bound scene out.

The asset loader flattens its scene graph into [`SceneNode`]s (name, parent
name, world transform, optional local mesh). [`bind`] then resolves the named
nodes into the collision world, the character spawn and the interactable
registry. Binding only looks nodes up by name and walks parent links, so the
order nodes arrive in does not matter.

Notes
- The environment is the named node plus every descendant that carries a mesh.
- An interactable is the named node plus its mesh-carrying descendants; every
  leaf reports the named node as its owner.
- Missing interactables are logged and skipped. Missing environment or
  character nodes fail the bind.
*/

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::{
    character::CharacterState,
    collision::{CollisionWorld, Iso, TriangleMesh, Vec3},
    interaction::ContentCatalog,
    picking::{Interactable, InteractableRegistry},
    settings::ControllerSettings,
};

/// One node of the flattened scene graph.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub parent: Option<String>,
    /// World-space pose.
    pub transform: Iso,
    /// World-space scale, applied before `transform`.
    pub scale: Vec3,
    /// Geometry in the node's local space.
    pub mesh: Option<TriangleMesh>,
}

impl SceneNode {
    /// Node without geometry (a group or an empty).
    pub fn group(name: impl Into<String>, parent: Option<&str>, transform: Iso) -> Self {
        Self {
            name: name.into(),
            parent: parent.map(str::to_owned),
            transform,
            scale: Vec3::repeat(1.0),
            mesh: None,
        }
    }

    /// Node carrying a mesh.
    pub fn mesh(
        name: impl Into<String>,
        parent: Option<&str>,
        transform: Iso,
        mesh: TriangleMesh,
    ) -> Self {
        Self {
            mesh: Some(mesh),
            ..Self::group(name, parent, transform)
        }
    }

    /// The node's mesh in world space.
    pub fn world_mesh(&self) -> Option<TriangleMesh> {
        self.mesh
            .as_ref()
            .map(|mesh| mesh.transformed(&self.transform, self.scale))
    }
}

/// Names the bind step looks for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneBindings {
    /// Root of the static collision geometry.
    pub environment: String,
    /// Node whose position is the character spawn.
    pub character: String,
    /// Pickable objects that bounce.
    pub creatures: Vec<String>,
    /// Pickable objects that open content; keyed by node name.
    pub catalog: ContentCatalog,
}

/// Why a scene could not be bound.
#[derive(Debug, Error, PartialEq)]
pub enum BindError {
    #[error("environment node `{0}` not found")]
    MissingEnvironment(String),
    #[error("character node `{0}` not found")]
    MissingCharacter(String),
    #[error("environment `{0}` has no triangles")]
    EmptyEnvironment(String),
    #[error("mesh on node `{node}` is invalid: {reason}")]
    InvalidMesh { node: String, reason: String },
}

/// Everything the simulation needs once assets have loaded.
pub struct BoundScene {
    pub world: CollisionWorld,
    pub character: CharacterState,
    pub registry: InteractableRegistry,
    pub creatures: Vec<String>,
    pub catalog: ContentCatalog,
}

/// Resolve `nodes` against `bindings`.
pub fn bind(
    nodes: &[SceneNode],
    bindings: &SceneBindings,
    settings: &ControllerSettings,
) -> Result<BoundScene, BindError> {
    let graph = SceneGraph::new(nodes);

    let environment = graph
        .index_of(&bindings.environment)
        .ok_or_else(|| BindError::MissingEnvironment(bindings.environment.clone()))?;
    let env_nodes: Vec<&SceneNode> = graph
        .subtree(environment)
        .into_iter()
        .map(|i| &nodes[i])
        .filter(|node| node.mesh.as_ref().is_some_and(|m| !m.is_empty()))
        .collect();
    if env_nodes.is_empty() {
        return Err(BindError::EmptyEnvironment(bindings.environment.clone()));
    }
    let env_meshes: Vec<TriangleMesh> = env_nodes.iter().filter_map(|n| n.world_mesh()).collect();
    let world = CollisionWorld::build(env_meshes.iter(), settings.contact_skin).map_err(|err| {
        BindError::InvalidMesh {
            node: env_nodes
                .get(err.index)
                .map_or_else(|| bindings.environment.clone(), |n| n.name.clone()),
            reason: err.reason,
        }
    })?;

    let character_node = graph
        .index_of(&bindings.character)
        .map(|i| &nodes[i])
        .ok_or_else(|| BindError::MissingCharacter(bindings.character.clone()))?;
    let spawn = character_node.transform.translation.vector;
    let character = CharacterState::spawn_at(spawn, settings);

    let owners = bindings
        .creatures
        .iter()
        .map(String::as_str)
        .chain(bindings.catalog.ids());
    let mut seen = HashSet::new();
    let mut items = Vec::new();
    let mut leaf_names = Vec::new();
    for owner in owners {
        if !seen.insert(owner) {
            continue;
        }
        let Some(root) = graph.index_of(owner) else {
            log::warn!("interactable `{owner}` not found in scene, skipping");
            continue;
        };
        let before = items.len();
        for leaf in graph.subtree(root).into_iter().map(|i| &nodes[i]) {
            let Some(mesh) = leaf.world_mesh().filter(|m| !m.is_empty()) else {
                continue;
            };
            leaf_names.push(leaf.name.clone());
            items.push((
                Interactable {
                    leaf: leaf.name.clone(),
                    owner: owner.to_owned(),
                },
                mesh,
            ));
        }
        if items.len() == before {
            log::warn!("interactable `{owner}` has no pickable geometry, skipping");
        }
    }
    let registry = InteractableRegistry::build(items).map_err(|err| BindError::InvalidMesh {
        node: leaf_names.get(err.index).cloned().unwrap_or_default(),
        reason: err.reason,
    })?;

    log::debug!(
        "scene bound: {} environment meshes, {} pickable leaves, spawn {:?}",
        env_meshes.len(),
        registry.entries().len(),
        spawn
    );

    Ok(BoundScene {
        world,
        character,
        registry,
        creatures: bindings.creatures.clone(),
        catalog: bindings.catalog.clone(),
    })
}

/// Name and child lookups over the flat node list.
struct SceneGraph<'a> {
    nodes: &'a [SceneNode],
    by_name: HashMap<&'a str, usize>,
    children: HashMap<&'a str, Vec<usize>>,
}

impl<'a> SceneGraph<'a> {
    fn new(nodes: &'a [SceneNode]) -> Self {
        let mut by_name = HashMap::new();
        let mut children: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, node) in nodes.iter().enumerate() {
            // First node wins a duplicated name.
            by_name.entry(node.name.as_str()).or_insert(i);
            if let Some(parent) = node.parent.as_deref() {
                children.entry(parent).or_default().push(i);
            }
        }
        Self {
            nodes,
            by_name,
            children,
        }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// `root` and all its descendants, parents before children.
    fn subtree(&self, root: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            // Parent cycles in malformed input.
            if !visited.insert(i) {
                continue;
            }
            out.push(i);
            if let Some(kids) = self.children.get(self.nodes[i].name.as_str()) {
                stack.extend(kids.iter().rev());
            }
        }
        out
    }
}
