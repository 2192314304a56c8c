// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use glam::{Vec2, Vec3};
use vista_core::{CameraPort, OcclusionPort, PixelRect};

/// Orthographic stub camera: world (x, y) are pixel coordinates, z is
/// depth and ignored by projection. Keeps expected values exact.
pub struct OrthoCamera {
    pub rect: PixelRect,
    pub eye: Vec3,
}

impl OrthoCamera {
    pub fn full_hd() -> Self {
        Self {
            rect: PixelRect::from_size(1920.0, 1080.0),
            eye: Vec3::new(960.0, 540.0, -10.0),
        }
    }
}

impl CameraPort for OrthoCamera {
    fn world_to_screen(&self, world: Vec3) -> Vec2 {
        Vec2::new(world.x, world.y)
    }

    fn pixel_rect(&self) -> PixelRect {
        self.rect
    }

    fn near_clip(&self) -> f32 {
        0.1
    }

    fn position(&self) -> Vec3 {
        self.eye
    }
}

/// Blocks every line of sight, or none.
pub struct FixedBlocker(pub bool);

impl OcclusionPort for FixedBlocker {
    fn line_blocked(&self, _from: Vec3, _to: Vec3) -> bool {
        self.0
    }
}

/// Blocks lines of sight to targets left of an x threshold.
pub struct HalfSpaceBlocker {
    pub x_threshold: f32,
}

impl OcclusionPort for HalfSpaceBlocker {
    fn line_blocked(&self, _from: Vec3, to: Vec3) -> bool {
        to.x < self.x_threshold
    }
}
