//! Rigid camera follow and the projection used for pointer rays.
//!
//! The camera does not rotate with the character: every tick its position is
//! the character's feet plus a fixed world-space offset, and it looks at a
//! point slightly ahead of the character and well below the camera.

use crate::{collision::Vec3, settings::CameraSettings};

/// Camera projection, kept in sync with the rendered viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    /// Vertical field of view in radians; `aspect` is width / height.
    Perspective { fov_y: f32, aspect: f32 },
    /// Half the visible height in world units; `aspect` is width / height.
    Orthographic { half_height: f32, aspect: f32 },
}

impl Projection {
    /// Same projection with a new viewport aspect ratio.
    ///
    /// Non-finite or non-positive ratios (a zero-height window) are ignored.
    pub fn with_aspect(self, aspect: f32) -> Self {
        if !aspect.is_finite() || aspect <= 0.0 {
            return self;
        }
        match self {
            Projection::Perspective { fov_y, .. } => Projection::Perspective { fov_y, aspect },
            Projection::Orthographic { half_height, .. } => {
                Projection::Orthographic {
                    half_height,
                    aspect,
                }
            }
        }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        match *self {
            Projection::Perspective { aspect, .. } | Projection::Orthographic { aspect, .. } => {
                aspect
            }
        }
    }
}

/// Where the camera sits and what it looks at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

/// Camera pose for a character whose feet are at `feet`.
pub fn follow(feet: Vec3, settings: &CameraSettings) -> CameraPose {
    let position = feet + settings.offset;
    let target = Vec3::new(
        feet.x + settings.look_planar_offset.x,
        position.y - settings.look_drop,
        feet.z + settings.look_planar_offset.y,
    );
    CameraPose { position, target }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_uses_fixed_world_offset() {
        let settings = CameraSettings::default();

        let pose = follow(Vec3::new(1.0, 0.0, 2.0), &settings);

        assert_eq!(pose.position, Vec3::new(1.0, 18.0, -20.0));
        assert_eq!(pose.target, Vec3::new(1.0, 1.0, 4.0));
    }

    #[test]
    fn follow_tracks_height() {
        let settings = CameraSettings::default();

        let low = follow(Vec3::new(0.0, 0.0, 0.0), &settings);
        let high = follow(Vec3::new(0.0, 3.0, 0.0), &settings);

        assert_eq!(high.position - low.position, Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(high.target - low.target, Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn aspect_updates_ignore_degenerate_viewports() {
        let projection = Projection::Perspective {
            fov_y: 0.5,
            aspect: 1.0,
        };

        assert_eq!(projection.with_aspect(2.0).aspect(), 2.0);
        assert_eq!(projection.with_aspect(0.0), projection);
        assert_eq!(projection.with_aspect(f32::NAN), projection);

        let ortho = Projection::Orthographic {
            half_height: 10.0,
            aspect: 1.0,
        };
        assert_eq!(
            ortho.with_aspect(1.5),
            Projection::Orthographic {
                half_height: 10.0,
                aspect: 1.5
            }
        );
    }
}
