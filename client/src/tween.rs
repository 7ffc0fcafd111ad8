//! Cosmetic tweens. A finished creature bounce is reported back to the
//! simulation exactly once; no other gameplay state is touched here.

use std::f32::consts::PI;

use bevy::prelude::*;
use islet_sim::PresentationRequest;

use crate::{
    scene::{PlayerModel, PropName},
    simulation::{Presented, Sim, SimSet},
};

const BOUNCE_SECONDS: f32 = 0.6;
const BOUNCE_HEIGHT: f32 = 0.8;
const HOP_SQUASH_SECONDS: f32 = 0.25;

#[derive(Component)]
struct Bounce {
    timer: Timer,
    rest: Vec3,
}

#[derive(Component)]
struct HopSquash {
    timer: Timer,
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Update, start_tweens.in_set(SimSet::Present));
    app.add_systems(Update, (advance_bounces, advance_hops).after(start_tweens));
}

fn start_tweens(
    mut commands: Commands,
    mut presented: MessageReader<Presented>,
    mut sim: ResMut<Sim>,
    props: Query<(Entity, &PropName, &Transform)>,
    player: Query<Entity, With<PlayerModel>>,
) {
    for Presented(request) in presented.read() {
        match request {
            PresentationRequest::PlayBounce(name) => {
                let Some((entity, _, transform)) = props.iter().find(|(_, prop, _)| prop.0 == *name)
                else {
                    // Nothing to animate; release the lock right away.
                    warn!("no entity for creature {name}");
                    sim.finish_bounce();
                    continue;
                };
                commands.entity(entity).insert(Bounce {
                    timer: Timer::from_seconds(BOUNCE_SECONDS, TimerMode::Once),
                    rest: transform.translation,
                });
            }
            PresentationRequest::PlayHop => {
                for entity in &player {
                    commands.entity(entity).insert(HopSquash {
                        timer: Timer::from_seconds(HOP_SQUASH_SECONDS, TimerMode::Once),
                    });
                }
            }
            _ => {}
        }
    }
}

fn advance_bounces(
    mut commands: Commands,
    time: Res<Time>,
    mut sim: ResMut<Sim>,
    mut bounces: Query<(Entity, &mut Bounce, &mut Transform)>,
) {
    for (entity, mut bounce, mut transform) in &mut bounces {
        bounce.timer.tick(time.delta());
        let t = bounce.timer.fraction();
        let lift = (PI * t).sin();
        transform.translation = bounce.rest + Vec3::Y * (BOUNCE_HEIGHT * lift);
        transform.scale = Vec3::new(1.0 - 0.1 * lift, 1.0 + 0.2 * lift, 1.0 - 0.1 * lift);

        if bounce.timer.is_finished() {
            transform.translation = bounce.rest;
            transform.scale = Vec3::ONE;
            commands.entity(entity).remove::<Bounce>();
            sim.finish_bounce();
        }
    }
}

fn advance_hops(
    mut commands: Commands,
    time: Res<Time>,
    mut hops: Query<(Entity, &mut HopSquash, &mut Transform)>,
) {
    for (entity, mut hop, mut transform) in &mut hops {
        hop.timer.tick(time.delta());
        let squash = (PI * hop.timer.fraction()).sin() * 0.2;
        transform.scale = Vec3::new(1.0 + squash * 0.5, 1.0 - squash, 1.0 + squash * 0.5);

        if hop.timer.is_finished() {
            transform.scale = Vec3::ONE;
            commands.entity(entity).remove::<HopSquash>();
        }
    }
}
