//! The playable character: capsule pose plus the movement flags the tick reads.

use crate::{
    collision::{Capsule, Vec3},
    settings::ControllerSettings,
};

/// Simulation-owned state of the single playable character.
///
/// Invariant: `is_moving` is set only when a hop impulse is applied and cleared
/// only by a floor contact or a respawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacterState {
    /// Feet position, derived from the capsule after every physics step.
    pub position: Vec3,
    /// Current facing yaw (radians about +Y).
    pub yaw: f32,
    /// Yaw the orientation smoother is easing toward.
    pub target_yaw: f32,
    pub velocity: Vec3,
    /// Whether the last collision resolution found standing ground.
    pub on_floor: bool,
    /// True while a hop is in flight.
    pub is_moving: bool,
    /// Feet position the character returns to on respawn.
    pub spawn: Vec3,
    pub capsule: Capsule,
}

impl CharacterState {
    /// Create a character standing at `spawn`, at rest, facing +Z.
    pub fn spawn_at(spawn: Vec3, settings: &ControllerSettings) -> Self {
        Self {
            position: spawn,
            yaw: 0.0,
            target_yaw: 0.0,
            velocity: Vec3::zeros(),
            on_floor: false,
            is_moving: false,
            spawn,
            capsule: Capsule::standing_at(spawn, settings.capsule_radius, settings.capsule_height),
        }
    }

    /// Put the character back at its spawn point with no velocity and no hop in flight.
    ///
    /// Facing is kept so the respawn doesn't visibly snap the model around.
    pub fn respawn(&mut self) {
        self.capsule.set_feet(self.spawn);
        self.position = self.spawn;
        self.velocity = Vec3::zeros();
        self.is_moving = false;
        self.on_floor = false;
    }

    /// Sync the feet position from the capsule's lower point.
    #[inline]
    pub fn sync_position(&mut self) {
        self.position = self.capsule.feet();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respawn_is_idempotent_from_any_state() {
        let settings = ControllerSettings::default();
        let spawn = Vec3::new(2.0, 1.0, -3.0);
        let mut character = CharacterState::spawn_at(spawn, &settings);

        character.capsule.translate(Vec3::new(40.0, -60.0, 5.0));
        character.velocity = Vec3::new(3.0, -12.0, 7.0);
        character.is_moving = true;
        character.on_floor = true;

        for _ in 0..2 {
            character.respawn();

            assert_eq!(character.position, spawn);
            assert!((character.capsule.feet() - spawn).norm() < 1.0e-5);
            assert_eq!(character.velocity, Vec3::zeros());
            assert!(!character.is_moving);
        }
    }
}
