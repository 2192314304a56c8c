// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! World placement of an ad quad.

use glam::{Quat, Vec3};

/// Translation-rotation-scale pose of an ad quad.
///
/// Points transform scale-first: `world = translation + rotation * (scale *
/// local)`. The quad's local footprint is the unit square on the XY plane,
/// so `scale.x`/`scale.y` are its world width and height and `scale.z` is
/// ignored by the quad itself (kept for symmetry with host transforms).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadPose {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,
}

impl QuadPose {
    /// Identity pose: origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Creates a pose from explicit components.
    #[must_use]
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Identity rotation and scale at `translation`.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Translation component.
    #[must_use]
    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Rotation component.
    #[must_use]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Scale component.
    #[must_use]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Returns the pose with `translation` replaced.
    #[must_use]
    pub fn with_translation(self, translation: Vec3) -> Self {
        Self {
            translation,
            ..self
        }
    }

    /// Returns the pose with `rotation` replaced.
    #[must_use]
    pub fn with_rotation(self, rotation: Quat) -> Self {
        Self { rotation, ..self }
    }

    /// Returns the pose with `scale` replaced.
    #[must_use]
    pub fn with_scale(self, scale: Vec3) -> Self {
        Self { scale, ..self }
    }

    /// Transforms a local-space point into world space.
    #[must_use]
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.translation + self.rotation * (self.scale * local)
    }
}

impl Default for QuadPose {
    fn default() -> Self {
        Self::IDENTITY
    }
}
