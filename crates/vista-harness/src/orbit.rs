// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Orbit rig: a camera eye circling a focus point.

use glam::{EulerRot, Quat, Vec3};

/// Closest the eye may approach the focus, world units.
pub const DISTANCE_MIN: f32 = 3.0;
/// Farthest the eye may retreat from the focus, world units.
pub const DISTANCE_MAX: f32 = 100.0;
/// Shallowest allowed pitch, degrees above the horizon. Keeps the rig
/// off the pole where yaw and roll collapse into each other.
pub const PITCH_MIN: f32 = 1.0;
/// Steepest allowed pitch, degrees above the horizon.
pub const PITCH_MAX: f32 = 87.5;

/// Yaw/pitch/distance rig orbiting a focus point.
///
/// Positive pitch raises the eye above the focus looking down; yaw
/// sweeps it around the vertical axis. Distance and pitch are clamped
/// on every change, so the rig can be driven blindly from scripted or
/// user input.
#[derive(Debug, Clone, Copy)]
pub struct OrbitRig {
    focus: Vec3,
    distance: f32,
    yaw: f32,
    pitch: f32,
}

impl OrbitRig {
    /// Creates a rig around `focus` at the given distance, yaw 0,
    /// pitch at the lower limit.
    #[must_use]
    pub fn new(focus: Vec3, distance: f32) -> Self {
        Self {
            focus,
            distance: distance.clamp(DISTANCE_MIN, DISTANCE_MAX),
            yaw: 0.0,
            pitch: PITCH_MIN,
        }
    }

    /// The point the rig circles.
    #[must_use]
    pub fn focus(&self) -> Vec3 {
        self.focus
    }

    /// Current eye distance from the focus.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Current yaw in degrees.
    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Current pitch in degrees.
    #[must_use]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Adds to yaw and pitch, in degrees. Pitch is clamped to
    /// [`PITCH_MIN`]..=[`PITCH_MAX`]; yaw wraps freely.
    pub fn orbit(&mut self, yaw_degrees: f32, pitch_degrees: f32) {
        self.yaw += yaw_degrees;
        self.pitch = (self.pitch + pitch_degrees).clamp(PITCH_MIN, PITCH_MAX);
    }

    /// Moves the eye toward (positive) or away from (negative) the
    /// focus, clamped to [`DISTANCE_MIN`]..=[`DISTANCE_MAX`].
    pub fn zoom(&mut self, toward_focus: f32) {
        self.distance = (self.distance - toward_focus).clamp(DISTANCE_MIN, DISTANCE_MAX);
    }

    /// Eye position implied by the current yaw, pitch, and distance.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        let rotation = Quat::from_euler(
            EulerRot::YXZ,
            self.yaw.to_radians(),
            -self.pitch.to_radians(),
            0.0,
        );
        self.focus - rotation * Vec3::NEG_Z * self.distance
    }
}
