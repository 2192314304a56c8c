// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Perspective camera with engine-style screen projection.

use glam::{Mat4, Vec2, Vec3};
use vista_core::{CameraPort, PixelRect};

// Depth magnitude floor for the perspective divide.
const MIN_DEPTH: f32 = 1e-6;

/// A pinhole perspective camera projecting onto a pixel viewport.
///
/// Projection follows the convention of engine `WorldToScreenPoint`
/// APIs: the viewport origin is the lower-left corner, y grows upward,
/// and points behind the eye plane divide by a negative depth and come
/// back mirrored rather than clamped. The clipper downstream discards
/// the junk, so no special casing is needed here.
#[derive(Debug, Clone)]
pub struct PinholeCamera {
    view: Mat4,
    position: Vec3,
    rect: PixelRect,
    tan_half_fov_y: f32,
    aspect: f32,
    near_clip: f32,
}

impl PinholeCamera {
    /// Creates a camera at `eye` looking toward `target`, with a
    /// vertical field of view in degrees and the given pixel viewport.
    /// The near clip plane defaults to 0.3 world units.
    ///
    /// `eye` and `target` must not coincide.
    #[must_use]
    pub fn look_at(eye: Vec3, target: Vec3, fov_y_degrees: f32, rect: PixelRect) -> Self {
        Self {
            view: Mat4::look_at_rh(eye, target, Vec3::Y),
            position: eye,
            rect,
            tan_half_fov_y: (fov_y_degrees.to_radians() * 0.5).tan(),
            aspect: rect.width() / rect.height(),
            near_clip: 0.3,
        }
    }

    /// Overrides the near clip plane distance.
    #[must_use]
    pub fn with_near_clip(mut self, near_clip: f32) -> Self {
        self.near_clip = near_clip;
        self
    }
}

impl CameraPort for PinholeCamera {
    fn world_to_screen(&self, world: Vec3) -> Vec2 {
        let view = self.view.transform_point3(world);
        // View space looks down -z, so depth is -view.z. Keep the sign
        // for behind-eye points; only the magnitude gets floored.
        let mut depth = -view.z;
        if depth.abs() < MIN_DEPTH {
            depth = MIN_DEPTH.copysign(depth);
        }
        let ndc = Vec2::new(
            view.x / (depth * self.tan_half_fov_y * self.aspect),
            view.y / (depth * self.tan_half_fov_y),
        );
        self.rect.min
            + (ndc + Vec2::ONE) * 0.5 * Vec2::new(self.rect.width(), self.rect.height())
    }

    fn pixel_rect(&self) -> PixelRect {
        self.rect
    }

    fn near_clip(&self) -> f32 {
        self.near_clip
    }

    fn position(&self) -> Vec3 {
        self.position
    }
}
