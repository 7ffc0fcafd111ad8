//! Bevy side of the simulation: owns the `Simulation`, ticks it once per frame
//! and republishes its presentation requests as messages.

use bevy::prelude::*;
use islet_sim::{ControllerSettings, PresentationRequest, Simulation};

/// Ordering of the per-frame work.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Platform events are written into the simulation.
    Input,
    /// `Simulation::tick` runs.
    Tick,
    /// Presentation requests are carried out.
    Present,
}

#[derive(Resource, Deref, DerefMut)]
pub struct Sim(pub Simulation);

/// One presentation request emitted by the last tick.
#[derive(Message, Clone, Debug, PartialEq, Eq)]
pub struct Presented(pub PresentationRequest);

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(Sim(Simulation::new(ControllerSettings::default())));
    app.add_message::<Presented>();
    app.configure_sets(
        Update,
        (SimSet::Input, SimSet::Tick, SimSet::Present).chain(),
    );
    app.add_systems(Update, tick.in_set(SimSet::Tick));
}

fn tick(mut sim: ResMut<Sim>, mut presented: MessageWriter<Presented>) {
    let mut outbox = Vec::new();
    let report = sim.tick(&mut outbox);
    if report.dispatch.is_some() {
        debug!("tick: {report:?}");
    }
    presented.write_batch(outbox.into_iter().map(Presented));
}

/// Convert a simulation vector to a Bevy one.
#[inline]
pub fn to_bevy(v: islet_sim::Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Convert a Bevy vector to a simulation one.
#[inline]
pub fn to_sim(v: Vec3) -> islet_sim::Vec3 {
    islet_sim::Vec3::new(v.x, v.y, v.z)
}
