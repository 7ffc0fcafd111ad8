//! Debug/performance tooling for native dev builds.
//!
//! Gated behind `dev_native` in `main.rs`. Frame time, entity counts and system
//! load are shown in an on-screen perf overlay; F3 logs the character state.

use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin, SystemInformationDiagnosticsPlugin,
};
use bevy::prelude::*;
use iyes_perf_ui::prelude::*;

use crate::simulation::Sim;

/// Add debug/perf tooling (intended for `dev_native` builds only).
pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        SystemInformationDiagnosticsPlugin::default(),
        PerfUiPlugin,
    ));

    app.add_systems(Startup, spawn_perf_ui);
    app.add_systems(Update, log_character_state);
}

fn spawn_perf_ui(mut commands: Commands) {
    commands.spawn(PerfUiAllEntries::default());
}

/// Log the character state whenever F3 is pressed.
fn log_character_state(keys: Res<ButtonInput<KeyCode>>, sim: Res<Sim>) {
    if !keys.just_pressed(KeyCode::F3) {
        return;
    }
    match sim.character() {
        Some(character) => info!(
            "character: pos {:?} vel {:?} yaw {:.2} on_floor {} moving {} | modal {:?} lock {:?}",
            character.position,
            character.velocity,
            character.yaw,
            character.on_floor,
            character.is_moving,
            sim.modal(),
            sim.dispatcher().lock().holder(),
        ),
        None => info!("simulation not ready"),
    }
}
