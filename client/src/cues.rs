//! Sound cues. Playback itself is not wired up yet; each cue is logged unless muted.

use bevy::prelude::*;
use islet_sim::{Cue, PresentationRequest};
use leafwing_input_manager::prelude::ActionState;

use crate::{
    input::InputAction,
    simulation::{Presented, SimSet},
};

#[derive(Resource, Debug, Default)]
pub struct Muted(pub bool);

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<Muted>();
    app.add_systems(Update, toggle_mute.in_set(SimSet::Input));
    app.add_systems(Update, play_cues.in_set(SimSet::Present));
}

fn toggle_mute(actions: Res<ActionState<InputAction>>, mut muted: ResMut<Muted>) {
    if actions.just_pressed(&InputAction::ToggleMute) {
        muted.0 = !muted.0;
        info!("sound {}", if muted.0 { "muted" } else { "on" });
    }
}

fn play_cues(mut presented: MessageReader<Presented>, muted: Res<Muted>) {
    for Presented(request) in presented.read() {
        let PresentationRequest::PlayCue(cue) = request else {
            continue;
        };
        if muted.0 {
            continue;
        }
        match cue {
            Cue::Hop => debug!("cue: hop"),
            Cue::Creature(name) => info!("cue: {name}"),
            Cue::ModalOpen => info!("cue: modal open"),
            Cue::ModalClose => info!("cue: modal close"),
        }
    }
}
