// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Time-weighted running means over non-uniform frame intervals.

/// Online mean where each sample is weighted by the frame interval it
/// covered.
///
/// Folding sample `s` over interval `dt` against previously accumulated
/// time `elapsed` updates the mean in O(1):
///
/// ```text
/// mean' = (mean * elapsed + s * dt) / (elapsed + dt)
/// ```
///
/// The accumulator does not own its clock. Several means can share one
/// elapsed-time base (advanced by the caller after all of them fold), and
/// different means in the same tracker deliberately run against different
/// bases.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeWeightedMean {
    value: f32,
}

impl TimeWeightedMean {
    /// A mean that has seen no samples.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mean. Zero before the first effective fold.
    #[must_use]
    pub fn value(self) -> f32 {
        self.value
    }

    /// Folds `sample` covering `dt` seconds into the mean, where
    /// `elapsed` is the total time already represented by the mean.
    ///
    /// When `elapsed + dt` is zero or negative the fold is a no-op, so
    /// the first real sample becomes the mean exactly and a zero-length
    /// frame changes nothing.
    pub fn fold(&mut self, sample: f32, dt: f32, elapsed: f32) {
        let total = elapsed + dt;
        if total <= 0.0 {
            return;
        }
        self.value = (self.value * elapsed + sample * dt) / total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn first_fold_adopts_the_sample_exactly() {
        let mut mean = TimeWeightedMean::new();
        mean.fold(42.0, 0.25, 0.0);
        assert_eq!(mean.value(), 42.0);
    }

    #[test]
    fn zero_total_time_is_a_no_op() {
        let mut mean = TimeWeightedMean::new();
        mean.fold(99.0, 0.0, 0.0);
        assert_eq!(mean.value(), 0.0);
    }

    #[test]
    fn uniform_steps_match_the_arithmetic_mean() {
        let mut mean = TimeWeightedMean::new();
        let samples = [10.0, 20.0, 30.0, 40.0];
        let mut elapsed = 0.0;
        for s in samples {
            mean.fold(s, 0.5, elapsed);
            elapsed += 0.5;
        }
        assert_relative_eq!(mean.value(), 25.0, epsilon = 1e-4);
    }

    #[test]
    fn longer_intervals_weigh_heavier() {
        let mut mean = TimeWeightedMean::new();
        mean.fold(0.0, 1.0, 0.0);
        mean.fold(100.0, 3.0, 1.0);
        assert_relative_eq!(mean.value(), 75.0, epsilon = 1e-4);
    }

    #[test]
    fn constant_signal_is_a_fixed_point() {
        let mut mean = TimeWeightedMean::new();
        let mut elapsed = 0.0;
        for _ in 0..1000 {
            mean.fold(60.0, 1.0 / 60.0, elapsed);
            elapsed += 1.0 / 60.0;
        }
        assert_relative_eq!(mean.value(), 60.0, epsilon = 1e-3);
    }
}
