//! Scene loading in two phases.
//!
//! Startup spawns the island from primitive meshes and, while doing so, records
//! a flat [`SceneNode`] list. PostStartup binds that list by name and hands the
//! result to the simulation. A failed bind is logged and leaves the simulation
//! idle.

use bevy::{
    mesh::{Indices, VertexAttributeValues},
    platform::collections::HashMap,
    prelude::*,
};
use islet_sim::{Content, ContentCatalog, Iso, Point3, SceneBindings, SceneNode, TriangleMesh, bind};

use crate::simulation::Sim;

pub const ENVIRONMENT: &str = "island";
pub const CHARACTER: &str = "hero";
pub const CREATURES: [&str; 2] = ["bunny", "chicken"];

/// Name of a spawned scene prop, matching its `SceneNode`.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct PropName(pub String);

/// Root entity of the character model.
#[derive(Component, Debug)]
pub struct PlayerModel;

/// Node list recorded at spawn time, waiting to be bound.
#[derive(Resource, Default)]
struct PendingScene {
    nodes: Vec<SceneNode>,
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<PendingScene>();
    app.add_systems(Startup, spawn_island);
    app.add_systems(PostStartup, bind_scene);
}

/// One prop of the hand-built island.
struct Prop {
    name: &'static str,
    parent: Option<&'static str>,
    /// Relative to the parent.
    translation: Vec3,
    mesh: Option<Mesh>,
    color: Color,
}

impl Prop {
    fn group(name: &'static str, parent: Option<&'static str>, translation: Vec3) -> Self {
        Self {
            name,
            parent,
            translation,
            mesh: None,
            color: Color::WHITE,
        }
    }

    fn solid(
        name: &'static str,
        parent: &'static str,
        translation: Vec3,
        mesh: impl Into<Mesh>,
        color: Color,
    ) -> Self {
        Self {
            name,
            parent: Some(parent),
            translation,
            mesh: Some(mesh.into()),
            color,
        }
    }
}

fn island_props() -> Vec<Prop> {
    let grass = Color::srgb(0.36, 0.62, 0.34);
    let sand = Color::srgb(0.86, 0.79, 0.58);
    let rock = Color::srgb(0.5, 0.5, 0.55);
    let wood = Color::srgb(0.55, 0.38, 0.22);
    let fur = Color::srgb(0.93, 0.91, 0.88);
    let feathers = Color::srgb(0.98, 0.86, 0.35);

    vec![
        Prop::group(ENVIRONMENT, None, Vec3::ZERO),
        Prop::solid("island_ground", ENVIRONMENT, Vec3::new(0.0, -0.5, 0.0), Cuboid::new(30.0, 1.0, 30.0), grass),
        Prop::solid("island_beach", ENVIRONMENT, Vec3::new(0.0, -1.0, 17.0), Cuboid::new(30.0, 1.0, 4.0), sand),
        Prop::solid("island_step", ENVIRONMENT, Vec3::new(6.0, 0.4, 6.0), Cuboid::new(4.0, 0.8, 4.0), rock),
        Prop::solid("island_ridge", ENVIRONMENT, Vec3::new(-9.0, 1.0, 0.0), Cuboid::new(2.0, 2.0, 10.0), rock),
        Prop::group(CHARACTER, None, Vec3::new(0.0, 0.0, 0.0)),
        Prop::group("bunny", None, Vec3::new(4.0, 0.0, 2.0)),
        Prop::solid("bunny_body", "bunny", Vec3::new(0.0, 0.5, 0.0), Sphere::new(0.5), fur),
        Prop::solid("bunny_ear_left", "bunny", Vec3::new(0.18, 1.15, 0.0), Cuboid::new(0.14, 0.5, 0.1), fur),
        Prop::solid("bunny_ear_right", "bunny", Vec3::new(-0.18, 1.15, 0.0), Cuboid::new(0.14, 0.5, 0.1), fur),
        Prop::group("chicken", None, Vec3::new(-4.0, 0.0, 4.0)),
        Prop::solid("chicken_body", "chicken", Vec3::new(0.0, 0.4, 0.0), Sphere::new(0.4), feathers),
        Prop::solid("chicken_comb", "chicken", Vec3::new(0.0, 0.9, 0.15), Cuboid::new(0.08, 0.2, 0.25), Color::srgb(0.85, 0.15, 0.1)),
        Prop::group("sign_about", None, Vec3::new(0.0, 0.0, 8.0)),
        Prop::solid("sign_about_post", "sign_about", Vec3::new(0.0, 0.6, 0.0), Cuboid::new(0.15, 1.2, 0.15), wood),
        Prop::solid("sign_about_board", "sign_about", Vec3::new(0.0, 1.4, 0.0), Cuboid::new(2.0, 0.9, 0.12), wood),
        Prop::group("sign_projects", None, Vec3::new(-6.0, 0.0, -4.0)),
        Prop::solid("sign_projects_post", "sign_projects", Vec3::new(0.0, 0.6, 0.0), Cuboid::new(0.15, 1.2, 0.15), wood),
        Prop::solid("sign_projects_board", "sign_projects", Vec3::new(0.0, 1.4, 0.0), Cuboid::new(2.0, 0.9, 0.12), wood),
    ]
}

pub fn catalog() -> ContentCatalog {
    let mut catalog = ContentCatalog::new();
    catalog
        .insert(
            "sign_about",
            Content {
                title: "About".into(),
                body: "A small island to hop around. Click the animals, read the signs.".into(),
                link: None,
            },
        )
        .insert(
            "sign_projects",
            Content {
                title: "Projects".into(),
                body: "Hop-based character controller, capsule collision and pointer picking.".into(),
                link: Some("https://github.com/".into()),
            },
        );
    catalog
}

fn spawn_island(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut pending: ResMut<PendingScene>,
) {
    let mut spawned: HashMap<&'static str, (Entity, Vec3)> = HashMap::default();

    for prop in island_props() {
        let parent = prop.parent.and_then(|name| spawned.get(name).copied());
        let world = parent.map_or(Vec3::ZERO, |(_, at)| at) + prop.translation;

        let mut entity = commands.spawn((
            PropName(prop.name.to_string()),
            Transform::from_translation(prop.translation),
            Visibility::default(),
        ));
        if let Some((parent_entity, _)) = parent {
            entity.insert(ChildOf(parent_entity));
        }
        if prop.name == CHARACTER {
            entity.insert(PlayerModel);
        }

        let triangles = prop.mesh.as_ref().and_then(triangle_mesh);
        if let Some(mesh) = prop.mesh {
            entity.insert((
                Mesh3d(meshes.add(mesh)),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: prop.color,
                    perceptual_roughness: 1.0,
                    metallic: 0.0,
                    ..default()
                })),
            ));
        }
        spawned.insert(prop.name, (entity.id(), world));

        let transform = Iso::translation(world.x, world.y, world.z);
        pending.nodes.push(match triangles {
            Some(triangles) => SceneNode::mesh(prop.name, prop.parent, transform, triangles),
            None => SceneNode::group(prop.name, prop.parent, transform),
        });
    }

    if let Some(&(hero, _)) = spawned.get(CHARACTER) {
        spawn_hero_model(&mut commands, &mut meshes, &mut materials, hero);
    }

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            illuminance: 8_000.0,
            ..default()
        },
        Transform::from_xyz(8.0, 20.0, -6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    info!("island spawned with {} scene nodes", pending.nodes.len());
}

/// Capsule body matching the collision capsule, plus a nose to show facing.
fn spawn_hero_model(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    hero: Entity,
) {
    let radius = islet_sim::constants::CAPSULE_RADIUS;
    let height = islet_sim::constants::CAPSULE_HEIGHT;
    let body = materials.add(Color::srgb(0.2, 0.45, 0.85));

    commands.spawn((
        Mesh3d(meshes.add(Capsule3d::new(radius, height - radius))),
        MeshMaterial3d(body.clone()),
        Transform::from_xyz(0.0, (height + radius) * 0.5, 0.0),
        ChildOf(hero),
    ));
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(0.15, 0.15, 0.3))),
        MeshMaterial3d(body),
        Transform::from_xyz(0.0, height, radius),
        ChildOf(hero),
    ));
}

/// Local-space triangles of a Bevy triangle-list mesh.
fn triangle_mesh(mesh: &Mesh) -> Option<TriangleMesh> {
    let Some(VertexAttributeValues::Float32x3(positions)) = mesh.attribute(Mesh::ATTRIBUTE_POSITION)
    else {
        return None;
    };
    let flat: Vec<u32> = match mesh.indices()? {
        Indices::U16(indices) => indices.iter().map(|&i| u32::from(i)).collect(),
        Indices::U32(indices) => indices.clone(),
    };

    let vertices = positions
        .iter()
        .map(|p| Point3::new(p[0], p[1], p[2]))
        .collect();
    let indices = flat
        .chunks_exact(3)
        .map(|tri| [tri[0], tri[1], tri[2]])
        .collect();
    Some(TriangleMesh::new(vertices, indices))
}

fn bind_scene(mut sim: ResMut<Sim>, mut pending: ResMut<PendingScene>) {
    let nodes = std::mem::take(&mut pending.nodes);
    let bindings = SceneBindings {
        environment: ENVIRONMENT.into(),
        character: CHARACTER.into(),
        creatures: CREATURES.iter().map(|name| name.to_string()).collect(),
        catalog: catalog(),
    };

    match bind(&nodes, &bindings, sim.settings()) {
        Ok(scene) => {
            info!(
                "scene bound: {} pickable meshes",
                scene.registry.entries().len()
            );
            sim.load_scene(scene);
        }
        Err(err) => error!("scene failed to bind: {err}"),
    }
}
