use bevy::{camera::Exposure, prelude::*, window::WindowResized};
use islet_sim::Projection as PickProjection;

use crate::simulation::{Sim, SimSet, to_bevy};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, add_camera);
    app.add_systems(Update, sync_aspect.in_set(SimSet::Input));
    app.add_systems(Update, follow_player.in_set(SimSet::Present));
}

fn add_camera(mut commands: Commands, sim: Res<Sim>) {
    let camera = &sim.settings().camera;
    let projection = match camera.projection {
        PickProjection::Perspective { fov_y, aspect } => Projection::Perspective(PerspectiveProjection {
            fov: fov_y,
            aspect_ratio: aspect,
            ..default()
        }),
        PickProjection::Orthographic { half_height, .. } => Projection::Orthographic(OrthographicProjection {
            scaling_mode: bevy::camera::ScalingMode::FixedVertical {
                viewport_height: half_height * 2.0,
            },
            ..OrthographicProjection::default_3d()
        }),
    };

    commands.spawn((
        Exposure { ev100: 9.7 },
        bevy::core_pipeline::tonemapping::Tonemapping::AcesFitted,
        Camera3d::default(),
        projection,
        Transform::from_translation(to_bevy(camera.offset)).looking_at(Vec3::ZERO, Vec3::Y),
        DistanceFog {
            color: Color::srgba(0.55, 0.75, 0.9, 1.0),
            falloff: FogFalloff::Linear {
                start: 40.0,
                end: 120.0,
            },
            ..default()
        },
    ));
}

/// Rigid follow: copy the pose the simulation published this tick.
fn follow_player(sim: Res<Sim>, mut camera: Single<&mut Transform, With<Camera3d>>) {
    let Some(pose) = sim.camera_pose() else {
        return;
    };
    **camera = Transform::from_translation(to_bevy(pose.position))
        .looking_at(to_bevy(pose.target), Vec3::Y);
}

/// Keep pick rays in sync with the rendered aspect ratio.
fn sync_aspect(mut sim: ResMut<Sim>, mut resized: MessageReader<WindowResized>) {
    for message in resized.read() {
        if message.height > 0.0 {
            sim.set_viewport_aspect(message.width / message.height);
        }
    }
}
