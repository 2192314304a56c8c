// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Boundary ports between the measurement engine and the host scene.
//!
//! The tracker never reaches into a host engine. Everything it needs from
//! the outside world arrives through these traits plus the per-frame
//! [`FrameInput`] bundle, so the same measurement code runs under a real
//! renderer, the simulation harness, or a hand-rolled test stub.

use glam::{Vec2, Vec3};

use crate::audio::AudioSourceState;
use crate::pose::QuadPose;

/// Axis-aligned viewport rectangle in pixel coordinates.
///
/// `min` is the lower-left corner, `max` the upper-right. Invariant:
/// `min.x <= max.x && min.y <= max.y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    /// Lower-left corner in pixels.
    pub min: Vec2,
    /// Upper-right corner in pixels.
    pub max: Vec2,
}

impl PixelRect {
    /// Creates a rect from explicit corners.
    ///
    /// # Panics
    /// Panics if any component of `min` exceeds the matching component of
    /// `max`.
    #[must_use]
    pub fn new(min: Vec2, max: Vec2) -> Self {
        assert!(
            min.x <= max.x && min.y <= max.y,
            "PixelRect requires min <= max per component"
        );
        Self { min, max }
    }

    /// Creates a rect anchored at the origin, `width` by `height` pixels.
    ///
    /// # Panics
    /// Panics if `width` or `height` is negative.
    #[must_use]
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(Vec2::ZERO, Vec2::new(width, height))
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Area in square pixels.
    #[must_use]
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Center point of the rect.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// Projection and placement queries answered by the host's active camera.
pub trait CameraPort {
    /// Projects a world-space point into pixel coordinates on this
    /// camera's viewport. Points behind the eye plane come back mirrored,
    /// the way engine screen-projection APIs behave; the clipper downstream
    /// discards the junk.
    fn world_to_screen(&self, world: Vec3) -> Vec2;

    /// The camera's viewport rectangle in pixels.
    fn pixel_rect(&self) -> PixelRect;

    /// Near clip plane distance in world units.
    fn near_clip(&self) -> f32;

    /// Camera position in world space. Occlusion rays originate here.
    fn position(&self) -> Vec3;
}

/// Line-of-sight queries answered by the host's physics or spatial index.
pub trait OcclusionPort {
    /// Whether any scene geometry blocks the open segment from `from` to
    /// `to`. The ad quad itself must not be part of the queried set.
    fn line_blocked(&self, from: Vec3, to: Vec3) -> bool;
}

/// Everything the tracker consumes for one frame.
///
/// Hosts rebuild this every frame from whatever services are currently
/// alive. Any of the optional services may be absent; the tracker degrades
/// per field (no camera: geometry metrics idle, no listener: audibility
/// samples zero) instead of failing.
#[derive(Clone, Copy)]
pub struct FrameInput<'a> {
    /// World pose of the ad quad this frame.
    pub pose: QuadPose,
    /// Active camera, if one is resolvable.
    pub camera: Option<&'a dyn CameraPort>,
    /// Occlusion query service, if one is resolvable.
    pub occlusion: Option<&'a dyn OcclusionPort>,
    /// Audio listener position, if one is resolvable.
    pub listener: Option<Vec3>,
    /// State of the spot's spatial audio source, when the current media
    /// carries an audio track.
    pub audio: Option<&'a AudioSourceState>,
    /// Seconds elapsed since the previous frame. Negative values are
    /// treated as zero.
    pub dt: f32,
}

impl FrameInput<'_> {
    /// A frame with no services, an identity pose, and zero elapsed time.
    #[must_use]
    pub fn idle() -> Self {
        FrameInput {
            pose: QuadPose::IDENTITY,
            camera: None,
            occlusion: None,
            listener: None,
            audio: None,
            dt: 0.0,
        }
    }
}

impl Default for FrameInput<'_> {
    fn default() -> Self {
        Self::idle()
    }
}
