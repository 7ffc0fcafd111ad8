/*!
Fixed-step integrator for the character capsule.

One call advances the character by one tick of `settings.fixed_dt`:

1. Respawn if the feet dropped below `respawn_depth` (the rest of the tick is skipped).
2. Apply gravity when the previous tick found no floor (semi-implicit Euler).
3. Translate the capsule by `velocity * dt`.
4. Query the collision world once and push the capsule out along the contact
   normal by the penetration depth. A single resolution pass per tick; deep
   overlaps left over are resolved on the following ticks.
5. On floor contact, zero horizontal velocity and end the hop.
6. Derive the feet position from the capsule.

The tick length is a constant rather than the measured frame time, so the
simulation speed follows the frame rate.
*/

use crate::{
    character::CharacterState, collision::CollisionWorld, orientation::smooth_yaw,
    settings::ControllerSettings,
};

/// What happened during one integrator step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Fell below the world; the character was reset to spawn.
    Respawned,
    /// Normal step; `landed` is true when this step ended a hop.
    Moved { on_floor: bool, landed: bool },
}

/// Advance the character by one fixed tick against `world`.
pub fn step(
    character: &mut CharacterState,
    world: &CollisionWorld,
    settings: &ControllerSettings,
) -> StepOutcome {
    let dt = settings.fixed_dt.max(0.0);

    if character.position.y < settings.respawn_depth {
        log::debug!(
            "character fell to y = {:.2}, respawning at {:?}",
            character.position.y,
            character.spawn
        );
        character.respawn();
        return StepOutcome::Respawned;
    }

    if !character.on_floor {
        character.velocity.y -= settings.gravity_mps2 * dt;
    }

    character.capsule.translate(character.velocity * dt);

    let was_moving = character.is_moving;
    character.on_floor = false;

    if let Some(contact) = world.capsule_intersect(&character.capsule) {
        character.on_floor = contact.is_floor(settings.floor_min_normal_y);
        character.capsule.translate(contact.normal * contact.depth);

        // Drop the velocity component driving into the surface so a resting
        // character doesn't sink a full tick's fall into the mesh.
        let into = contact.normal.dot(&character.velocity);
        if into < 0.0 {
            character.velocity -= contact.normal * into;
        }

        if character.on_floor {
            character.velocity.x = 0.0;
            character.velocity.z = 0.0;
            character.is_moving = false;
        }
    }

    character.sync_position();

    StepOutcome::Moved {
        on_floor: character.on_floor,
        landed: was_moving && !character.is_moving,
    }
}

/// Ease the character's facing one tick toward its target yaw.
#[inline]
pub fn smooth_facing(character: &mut CharacterState, settings: &ControllerSettings) {
    character.yaw = smooth_yaw(character.yaw, character.target_yaw, settings.yaw_blend);
}
