use bevy::prelude::*;

use crate::{
    scene::PlayerModel,
    simulation::{Sim, SimSet, to_bevy},
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Update, sync_player.in_set(SimSet::Present));
}

/// Place the character model at the simulated feet position and facing.
fn sync_player(sim: Res<Sim>, mut player: Single<&mut Transform, With<PlayerModel>>) {
    let Some(character) = sim.character() else {
        return;
    };
    player.translation = to_bevy(character.position);
    player.rotation = Quat::from_rotation_y(character.yaw);
}
