// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Fixed-step clock for deterministic simulated sessions.

/// Produces a constant frame interval and counts elapsed time.
///
/// Elapsed time is recomputed from the tick count instead of
/// accumulated, so a long session does not drift from float summation.
#[derive(Debug, Clone, Copy)]
pub struct StepClock {
    dt: f32,
    ticks: u64,
}

impl StepClock {
    /// Creates a clock stepping `dt` seconds per tick.
    ///
    /// # Panics
    /// Panics unless `dt` is finite and positive.
    #[must_use]
    pub fn new(dt: f32) -> Self {
        assert!(dt.is_finite() && dt > 0.0, "StepClock requires dt > 0");
        Self { dt, ticks: 0 }
    }

    /// Creates a clock stepping at `rate` ticks per second.
    ///
    /// # Panics
    /// Panics unless `rate` is finite and positive.
    #[must_use]
    pub fn hz(rate: f32) -> Self {
        assert!(rate.is_finite() && rate > 0.0, "StepClock requires rate > 0");
        Self::new(1.0 / rate)
    }

    /// Seconds per tick.
    #[must_use]
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Ticks taken so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Seconds covered by the ticks taken so far.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.ticks as f32 * self.dt
    }

    /// Advances one tick and returns the frame interval.
    pub fn tick(&mut self) -> f32 {
        self.ticks += 1;
        self.dt
    }
}
