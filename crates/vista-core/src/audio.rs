// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Perceived loudness model for a spot's spatial audio source.
//!
//! Mirrors the distance attenuation families game engines ship: a linear
//! fade, a logarithmic fade, or an authored attenuation curve. The tracker
//! folds the resulting perceived volume into its time-weighted mean every
//! frame the media carries audio.

use glam::Vec3;

/// One `(distance, gain)` key of an authored attenuation curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveKey {
    /// Listener distance in world units.
    pub distance: f32,
    /// Gain at that distance, normally in `[0, 1]`.
    pub gain: f32,
}

impl CurveKey {
    /// Creates a key.
    #[must_use]
    pub fn new(distance: f32, gain: f32) -> Self {
        Self { distance, gain }
    }
}

/// Piecewise-linear attenuation curve, clamped at its end keys.
///
/// Evaluation interpolates between the two keys bracketing the query
/// distance. Distances before the first key return the first key's gain,
/// distances past the last key the last key's. An empty curve evaluates
/// to zero everywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct AttenuationCurve {
    keys: Vec<CurveKey>,
}

impl AttenuationCurve {
    /// Builds a curve, sorting keys by distance. Keys must be finite.
    #[must_use]
    pub fn new(mut keys: Vec<CurveKey>) -> Self {
        keys.sort_unstable_by(|a, b| a.distance.total_cmp(&b.distance));
        Self { keys }
    }

    /// The curve's keys in ascending distance order.
    #[must_use]
    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    /// Gain at `distance`.
    #[must_use]
    pub fn evaluate(&self, distance: f32) -> f32 {
        let Some(first) = self.keys.first() else {
            return 0.0;
        };
        if distance <= first.distance {
            return first.gain;
        }
        for pair in self.keys.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if distance <= hi.distance {
                let span = hi.distance - lo.distance;
                if span <= 0.0 {
                    return hi.gain;
                }
                let t = (distance - lo.distance) / span;
                return lo.gain + (hi.gain - lo.gain) * t;
            }
        }
        // Past the last key.
        self.keys[self.keys.len() - 1].gain
    }
}

/// Distance attenuation family of a spatial audio source.
#[derive(Debug, Clone, PartialEq)]
pub enum Rolloff {
    /// Full gain at `min_distance` fading linearly to silence at
    /// `max_distance`.
    Linear,
    /// Logarithmic interpolation from full gain toward silence across
    /// `[min_distance, max_distance]`. Effectively silent almost
    /// immediately past `min_distance`.
    Logarithmic,
    /// Host-authored curve, evaluated at the raw listener distance.
    Custom(AttenuationCurve),
}

/// Live state of the spatial audio source attached to an ad spot.
///
/// Hosts refresh this from their audio engine each frame; the tracker
/// only ever reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSourceState {
    /// Source position in world space.
    pub position: Vec3,
    /// Attenuation family.
    pub rolloff: Rolloff,
    /// Distance at which attenuation begins.
    pub min_distance: f32,
    /// Distance at or past which the source is silent (linear and
    /// logarithmic families).
    pub max_distance: f32,
    /// Spatialization amount: `0.0` is pure 2D, `1.0` fully 3D. Scales
    /// the perceived volume directly.
    pub spatial_blend: f32,
    /// Source volume before distance attenuation, in `[0, 1]`.
    pub volume: f32,
}

impl AudioSourceState {
    /// Perceived volume of this source at `listener`, in `[0, 1]` for
    /// in-range inputs.
    ///
    /// The attenuation parameter is clamped to `[0, 1]` before shaping,
    /// so listeners inside `min_distance` hear full gain and listeners
    /// past `max_distance` hear none; no input produces a NaN or
    /// infinite result.
    #[must_use]
    pub fn perceived_volume(&self, listener: Vec3) -> f32 {
        let distance = self.position.distance(listener);
        let gain = match &self.rolloff {
            Rolloff::Linear => 1.0 - self.attenuation_t(distance),
            Rolloff::Logarithmic => logerp(1.0, 0.0, self.attenuation_t(distance)),
            Rolloff::Custom(curve) => curve.evaluate(distance),
        };
        gain * self.spatial_blend * self.volume
    }

    /// Normalized position of `distance` within `[min_distance,
    /// max_distance]`, clamped to `[0, 1]`. A degenerate span acts as a
    /// step at `min_distance`.
    fn attenuation_t(&self, distance: f32) -> f32 {
        let span = self.max_distance - self.min_distance;
        if span <= 0.0 {
            return if distance <= self.min_distance { 0.0 } else { 1.0 };
        }
        ((distance - self.min_distance) / span).clamp(0.0, 1.0)
    }
}

/// Logarithmic interpolation: `a * (b / a).powf(t)`.
///
/// With `b = 0` this collapses toward silence as soon as `t` leaves zero,
/// matching how engines render logarithmic rolloff perceptually. Callers
/// keep `t` in `[0, 1]`; `powf(0.0, 0.0)` is `1.0`, so `t = 0` yields
/// exactly `a`.
fn logerp(a: f32, b: f32, t: f32) -> f32 {
    a * (b / a).powf(t)
}
