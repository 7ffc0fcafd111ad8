//! Held-input movement: one discrete hop per landing.
//!
//! Movement is impulse based. While any direction is held and no hop is in
//! flight, the controller sets the hop velocity and facing in a single tick and
//! then ignores input until the integrator reports a floor contact.

use crate::{
    character::CharacterState,
    collision::Vec3,
    constants::{YAW_BACK, YAW_FORWARD, YAW_LEFT, YAW_RIGHT},
    input::{Direction, InputState},
    settings::ControllerSettings,
};

/// Unit world axis and facing yaw for a held direction.
///
/// Forward is +Z and left is +X (the camera looks along +Z).
#[inline]
pub fn direction_axis(direction: Direction) -> (Vec3, f32) {
    match direction {
        Direction::Forward => (Vec3::new(0.0, 0.0, 1.0), YAW_FORWARD),
        Direction::Back => (Vec3::new(0.0, 0.0, -1.0), YAW_BACK),
        Direction::Left => (Vec3::new(1.0, 0.0, 0.0), YAW_LEFT),
        Direction::Right => (Vec3::new(-1.0, 0.0, 0.0), YAW_RIGHT),
    }
}

/// Apply a hop impulse if any direction is held and the character is not mid-hop.
///
/// - Each held direction adds `move_speed_mps` along its axis; opposing
///   directions cancel, combinations add.
/// - The last held direction in [`Direction::ALL`] order sets `target_yaw`.
/// - `velocity.y` is set to `jump_speed_mps` and `is_moving` to true.
///
/// Returns whether an impulse was applied.
pub fn apply_held_input(
    character: &mut CharacterState,
    input: &InputState,
    settings: &ControllerSettings,
) -> bool {
    if !input.any() || character.is_moving {
        return false;
    }

    for direction in Direction::ALL {
        if !input.is_held(direction) {
            continue;
        }
        let (axis, yaw) = direction_axis(direction);
        character.velocity += axis * settings.move_speed_mps;
        character.target_yaw = yaw;
    }

    character.velocity.y = settings.jump_speed_mps;
    character.is_moving = true;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn resting() -> (CharacterState, ControllerSettings) {
        let settings = ControllerSettings::default();
        let mut character = CharacterState::spawn_at(Vec3::zeros(), &settings);
        character.on_floor = true;
        (character, settings)
    }

    #[test]
    fn forward_hop_from_rest() {
        let (mut character, settings) = resting();
        let input = InputState {
            forward: true,
            ..Default::default()
        };

        assert!(apply_held_input(&mut character, &input, &settings));

        assert_eq!(
            character.velocity,
            Vec3::new(0.0, settings.jump_speed_mps, settings.move_speed_mps)
        );
        assert_eq!(character.target_yaw, 0.0);
        assert!(character.is_moving);
    }

    #[test]
    fn held_input_is_ignored_until_landing() {
        let (mut character, settings) = resting();
        let input = InputState {
            left: true,
            ..Default::default()
        };
        assert!(apply_held_input(&mut character, &input, &settings));
        let velocity = character.velocity;
        let yaw = character.target_yaw;

        let other = InputState {
            back: true,
            right: true,
            ..Default::default()
        };
        for _ in 0..10 {
            assert!(!apply_held_input(&mut character, &other, &settings));
            assert_eq!(character.velocity, velocity);
            assert_eq!(character.target_yaw, yaw);
        }

        character.is_moving = false;
        assert!(apply_held_input(&mut character, &other, &settings));
    }

    #[test]
    fn nothing_held_is_a_no_op() {
        let (mut character, settings) = resting();

        assert!(!apply_held_input(&mut character, &InputState::default(), &settings));
        assert_eq!(character.velocity, Vec3::zeros());
        assert!(!character.is_moving);
    }

    #[test]
    fn opposing_inputs_cancel_and_last_direction_wins_yaw() {
        let (mut character, settings) = resting();
        let input = InputState {
            left: true,
            right: true,
            ..Default::default()
        };

        apply_held_input(&mut character, &input, &settings);

        assert_eq!(character.velocity.x, 0.0);
        assert_eq!(character.target_yaw, -FRAC_PI_2);
    }

    #[test]
    fn diagonal_inputs_sum() {
        let (mut character, settings) = resting();
        let input = InputState {
            forward: true,
            left: true,
            ..Default::default()
        };

        apply_held_input(&mut character, &input, &settings);

        assert_eq!(character.velocity.x, settings.move_speed_mps);
        assert_eq!(character.velocity.z, settings.move_speed_mps);
        assert_eq!(character.target_yaw, FRAC_PI_2);
    }
}
