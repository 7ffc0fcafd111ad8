/*!
Controller tuning constants.

These are the compile-time defaults gathered into [`crate::ControllerSettings`]
and [`crate::CameraSettings`]. Keeping them together makes tuning easier and
keeps the tests pinned to the same numbers the client runs with.

Notes
- Distances are in meters, time in "tick seconds" (see [`FIXED_TICK_SECONDS`]).
- Yaw is in radians about +Y. Yaw 0 faces +Z.
*/

use std::f32::consts::{FRAC_PI_2, PI};

/// Length of one simulation tick (seconds).
///
/// The simulation advances by this constant once per rendered frame, not by the
/// measured frame delta. Play feel is therefore frame-rate dependent.
pub const FIXED_TICK_SECONDS: f32 = 0.035;

/// Gravity magnitude in meters per second squared (positive value).
pub const GRAVITY_MPS2: f32 = 30.0;

/// Horizontal speed added per held direction when a hop starts (m/s).
pub const MOVE_SPEED_MPS: f32 = 7.0;

/// Vertical speed assigned when a hop starts (m/s).
pub const JUMP_SPEED_MPS: f32 = 11.0;

/// Radius of the character capsule (meters).
pub const CAPSULE_RADIUS: f32 = 0.35;

/// Height of the capsule's upper segment point above the feet (meters).
///
/// The lower segment point sits one radius above the feet, so the capsule
/// spans `[feet, feet + CAPSULE_HEIGHT + CAPSULE_RADIUS]`.
pub const CAPSULE_HEIGHT: f32 = 1.0;

/// Separation under which a surface still counts as touching (meters).
/// Too large creates visible gaps; too small lets a resting character flicker off the floor.
pub const CONTACT_SKIN: f32 = 0.02;

/// Smallest vertical component of a contact normal that counts as floor.
///
/// 0.7 is roughly a 45 degree slope. Steeper faces are walls.
pub const FLOOR_MIN_NORMAL_Y: f32 = 0.7;

/// Characters whose feet fall below this height are respawned (meters).
pub const RESPAWN_DEPTH: f32 = -20.0;

/// Per-tick blend factor used when easing yaw toward its target.
pub const YAW_BLEND: f32 = 0.4;

/// Target yaw for each held direction.
pub const YAW_FORWARD: f32 = 0.0;
pub const YAW_BACK: f32 = PI;
pub const YAW_LEFT: f32 = FRAC_PI_2;
pub const YAW_RIGHT: f32 = -FRAC_PI_2;

/// Camera position relative to the character (world space, does not rotate).
pub const CAMERA_OFFSET: [f32; 3] = [0.0, 18.0, -22.0];

/// Planar (XZ) offset from the character to the camera's look-at point.
pub const CAMERA_LOOK_PLANAR_OFFSET: [f32; 2] = [0.0, 2.0];

/// How far below the camera's own height the look-at point sits (meters).
pub const CAMERA_LOOK_DROP: f32 = 17.0;

/// Vertical field of view for the default perspective projection (radians).
pub const CAMERA_FOV_Y: f32 = 0.5;

/// Default viewport aspect ratio (width / height) until the outer loop reports one.
pub const DEFAULT_ASPECT: f32 = 16.0 / 9.0;

/// Maximum distance a pick ray is tested against interactables (meters).
pub const MAX_PICK_DISTANCE: f32 = 500.0;
