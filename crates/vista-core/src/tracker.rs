// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Per-frame viewability tracking for one ad quad.

use glam::{Vec2, Vec3};
use tracing::warn;

use crate::average::TimeWeightedMean;
use crate::clip::{clip_quad_to_rect, fan_area, ClipScratch};
use crate::grid::OccluderGrid;
use crate::port::FrameInput;

/// Local-space corners of the unit ad quad: top-left, top-right,
/// bottom-right, bottom-left. The clipper's area sign convention depends
/// on this winding.
const QUAD_CORNERS: [Vec3; 4] = [
    Vec3::new(-0.5, 0.5, 0.0),
    Vec3::new(0.5, 0.5, 0.0),
    Vec3::new(0.5, -0.5, 0.0),
    Vec3::new(-0.5, -0.5, 0.0),
];

/// Aggregated viewability metrics for one ad spot, as shipped to the
/// reporting backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSummary {
    /// Identifier of the creative these metrics were accumulated for,
    /// when one has been bound.
    pub ad_id: Option<i64>,
    /// Cumulative seconds the quad was visible and not fully occluded.
    pub hit_time: f32,
    /// Mean share of the viewport covered by the visible, unoccluded
    /// quad, in percent, weighted over visible time.
    pub mean_screen_percent: f32,
    /// Mean offset of the quad's projected center from the viewport
    /// center, in pixels. `x` is a visible-time weighted mean; `y` is
    /// the raw offset of the last visible frame (see
    /// [`QuadViewTracker::update`]).
    pub mean_screen_offset: Vec2,
    /// Mean share of occlusion sample points blocked, in percent,
    /// weighted over visible time.
    pub mean_occluded_percent: f32,
    /// Mean perceived audio volume, in percent, weighted over the whole
    /// session.
    pub mean_volume_percent: f32,
}

/// Per-frame viewability tracker for one ad quad.
///
/// Each frame [`update`](Self::update) projects the quad through the
/// camera port, clips it to the viewport, estimates occlusion and
/// audibility, and folds the results into time-weighted means. Metrics
/// accumulate for the lifetime of the tracker; [`summary`](Self::summary)
/// snapshots them without resetting.
///
/// Single-threaded by construction: one tracker per ad quad, driven from
/// the host's frame loop. It owns its clip scratch so steady-state frames
/// allocate nothing.
#[derive(Debug)]
pub struct QuadViewTracker {
    grid: OccluderGrid,
    scratch: ClipScratch,
    ad_id: Option<i64>,
    hit_time: f32,
    screen_percent: TimeWeightedMean,
    occluded_percent: TimeWeightedMean,
    volume_percent: TimeWeightedMean,
    offset_x: TimeWeightedMean,
    // Raw last-visible-frame offset, not a mean. See update().
    offset_y: f32,
    last_screen_percent: f32,
    view_time: f32,
    elapsed: f32,
    warned_no_camera: bool,
    warned_no_listener: bool,
}

impl QuadViewTracker {
    /// Creates a tracker with the default occlusion grid.
    #[must_use]
    pub fn new() -> Self {
        Self::with_grid(OccluderGrid::default())
    }

    /// Creates a tracker sampling occlusion through `grid`.
    #[must_use]
    pub fn with_grid(grid: OccluderGrid) -> Self {
        Self {
            grid,
            scratch: ClipScratch::new(),
            ad_id: None,
            hit_time: 0.0,
            screen_percent: TimeWeightedMean::new(),
            occluded_percent: TimeWeightedMean::new(),
            volume_percent: TimeWeightedMean::new(),
            offset_x: TimeWeightedMean::new(),
            offset_y: 0.0,
            last_screen_percent: 0.0,
            view_time: 0.0,
            elapsed: 0.0,
            warned_no_camera: false,
            warned_no_listener: false,
        }
    }

    /// Associates the metrics with a creative id, or clears the
    /// association. Accumulated metrics are not reset; the canvas decides
    /// when a new accumulation window starts.
    pub fn bind_creative(&mut self, ad_id: Option<i64>) {
        self.ad_id = ad_id;
    }

    /// Currently bound creative id.
    #[must_use]
    pub fn ad_id(&self) -> Option<i64> {
        self.ad_id
    }

    /// The occlusion sampling grid.
    #[must_use]
    pub fn grid(&self) -> &OccluderGrid {
        &self.grid
    }

    /// Share of the viewport the quad covered on the most recent frame,
    /// in percent, ignoring occlusion. Zero while invisible. Proximity
    /// gating reads this.
    #[must_use]
    pub fn screen_percent(&self) -> f32 {
        self.last_screen_percent
    }

    /// Cumulative seconds the quad was visible and not fully occluded.
    #[must_use]
    pub fn hit_time(&self) -> f32 {
        self.hit_time
    }

    /// Total seconds accumulated across all updates after the first.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Seconds accumulated while the quad was visible.
    #[must_use]
    pub fn view_time(&self) -> f32 {
        self.view_time
    }

    /// Advances the tracker by one frame.
    ///
    /// Work proceeds in a fixed order each frame:
    ///
    /// 1. audibility sampled and folded against total elapsed time;
    /// 2. the quad projected, clipped to the viewport, and measured;
    /// 3. when visible: occlusion sampled, then the screen-share,
    ///    center-offset, and occluded-share means folded against visible
    ///    time, visible time advanced, and hit time advanced unless every
    ///    occlusion sample was blocked;
    /// 4. total elapsed time advanced, unconditionally and last.
    ///
    /// The very first update only starts the clock: there is no previous
    /// frame interval for its samples to cover, so folding them would
    /// invent weight. A negative or NaN `dt` is treated as zero.
    ///
    /// Missing services degrade rather than fail: with no camera the
    /// geometry metrics idle (only the clock advances), with no occlusion
    /// service nothing is blocked, and with no listener audibility
    /// samples zero. Each missing-service case logs a warning once per
    /// tracker.
    pub fn update(&mut self, frame: FrameInput<'_>) {
        let dt = frame.dt.max(0.0);
        if self.elapsed > 0.0 {
            self.fold_volume(&frame, dt);
            self.measure_quad(&frame, dt);
        }
        self.elapsed += dt;
    }

    /// Snapshots the accumulated metrics. Does not reset anything.
    #[must_use]
    pub fn summary(&self) -> ViewSummary {
        ViewSummary {
            ad_id: self.ad_id,
            hit_time: self.hit_time,
            mean_screen_percent: self.screen_percent.value(),
            mean_screen_offset: Vec2::new(self.offset_x.value(), self.offset_y),
            mean_occluded_percent: self.occluded_percent.value(),
            mean_volume_percent: self.volume_percent.value(),
        }
    }

    fn fold_volume(&mut self, frame: &FrameInput<'_>, dt: f32) {
        let sample = match (frame.audio, frame.listener) {
            (Some(source), Some(listener)) => source.perceived_volume(listener) * 100.0,
            (Some(_), None) => {
                if !self.warned_no_listener {
                    self.warned_no_listener = true;
                    warn!("no audio listener supplied; audibility samples zero until one appears");
                }
                0.0
            }
            (None, _) => 0.0,
        };
        self.volume_percent.fold(sample, dt, self.elapsed);
    }

    fn measure_quad(&mut self, frame: &FrameInput<'_>, dt: f32) {
        self.last_screen_percent = 0.0;
        let Some(camera) = frame.camera else {
            if !self.warned_no_camera {
                self.warned_no_camera = true;
                warn!("no camera supplied; screen metrics idle until one appears");
            }
            return;
        };

        let rect = camera.pixel_rect();
        let viewport_area = rect.area();
        if viewport_area <= 0.0 {
            return;
        }

        let center = camera.world_to_screen(frame.pose.transform_point(Vec3::ZERO));
        let corners = QUAD_CORNERS.map(|c| camera.world_to_screen(frame.pose.transform_point(c)));

        let area = match clip_quad_to_rect(&mut self.scratch, corners, &rect) {
            Some(clipped) => fan_area(clipped),
            None => return,
        };
        // Non-positive area means off-screen, edge-on, or back-facing.
        if area <= 0.0 {
            return;
        }

        self.last_screen_percent = 100.0 * area / viewport_area;

        let blocked = match frame.occlusion {
            Some(occlusion) => self
                .grid
                .count_blocked(&frame.pose, camera.position(), occlusion),
            None => 0,
        };
        let occluded = 100.0 * blocked as f32 / self.grid.len() as f32;

        let screen_sample = area * (100.0 - occluded) / viewport_area;
        self.screen_percent.fold(screen_sample, dt, self.view_time);

        let offset = center - rect.center();
        self.offset_x.fold(offset.x, dt, self.view_time);
        // The y offset has always shipped unblended: the last visible
        // frame's raw value wins. Reporting consumers are calibrated to
        // that, so only x carries the weighted mean.
        self.offset_y = offset.y;

        self.occluded_percent.fold(occluded, dt, self.view_time);
        self.view_time += dt;

        if occluded < 100.0 {
            self.hit_time += dt;
        }
    }
}

impl Default for QuadViewTracker {
    fn default() -> Self {
        Self::new()
    }
}
