/*!
Runtime configuration for the character controller and camera follower.

A single settings record is built at startup (usually via `Default`) and handed
to [`crate::Simulation::new`]. Values are expressed in meters, seconds and
radians; defaults come from [`crate::constants`].
*/

use crate::{
    camera::Projection,
    collision::Vec3,
    constants::{
        CAMERA_FOV_Y, CAMERA_LOOK_DROP, CAMERA_LOOK_PLANAR_OFFSET, CAMERA_OFFSET, CAPSULE_HEIGHT,
        CAPSULE_RADIUS, CONTACT_SKIN, DEFAULT_ASPECT, FIXED_TICK_SECONDS, FLOOR_MIN_NORMAL_Y,
        GRAVITY_MPS2, JUMP_SPEED_MPS, MAX_PICK_DISTANCE, MOVE_SPEED_MPS, RESPAWN_DEPTH, YAW_BLEND,
    },
};
use nalgebra::Vector2;

/// Character controller settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControllerSettings {
    /// Constant tick length fed to the integrator (seconds).
    pub fixed_dt: f32,

    /// Downward acceleration applied while airborne (m/s^2, positive).
    pub gravity_mps2: f32,

    /// Horizontal speed contributed by each held direction (m/s).
    pub move_speed_mps: f32,

    /// Vertical speed assigned at the start of every hop (m/s).
    pub jump_speed_mps: f32,

    /// Capsule radius (meters).
    pub capsule_radius: f32,

    /// Height of the upper capsule segment point above the feet (meters).
    pub capsule_height: f32,

    /// Separation still treated as contact (meters).
    pub contact_skin: f32,

    /// Contacts whose normal has at least this `y` component are floor.
    pub floor_min_normal_y: f32,

    /// Feet below this height trigger a respawn (meters).
    pub respawn_depth: f32,

    /// Yaw easing factor per tick, in `[0, 1]`.
    pub yaw_blend: f32,

    /// Camera follower and picking projection.
    pub camera: CameraSettings,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            fixed_dt: FIXED_TICK_SECONDS,
            gravity_mps2: GRAVITY_MPS2,
            move_speed_mps: MOVE_SPEED_MPS,
            jump_speed_mps: JUMP_SPEED_MPS,
            capsule_radius: CAPSULE_RADIUS,
            capsule_height: CAPSULE_HEIGHT,
            contact_skin: CONTACT_SKIN,
            floor_min_normal_y: FLOOR_MIN_NORMAL_Y,
            respawn_depth: RESPAWN_DEPTH,
            yaw_blend: YAW_BLEND,
            camera: CameraSettings::default(),
        }
    }
}

/// Rigid camera follow parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSettings {
    /// Camera position relative to the character.
    pub offset: Vec3,
    /// Planar (x, z) offset from the character to the look-at point.
    pub look_planar_offset: Vector2<f32>,
    /// Distance below the camera height of the look-at point.
    pub look_drop: f32,
    /// Projection used to build pick rays.
    pub projection: Projection,
    /// Longest pick ray (meters).
    pub max_pick_distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            offset: Vec3::from(CAMERA_OFFSET),
            look_planar_offset: Vector2::from(CAMERA_LOOK_PLANAR_OFFSET),
            look_drop: CAMERA_LOOK_DROP,
            projection: Projection::Perspective {
                fov_y: CAMERA_FOV_Y,
                aspect: DEFAULT_ASPECT,
            },
            max_pick_distance: MAX_PICK_DISTANCE,
        }
    }
}
