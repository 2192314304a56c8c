// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]

//! Aggregation behavior: what the time-weighted means converge to over
//! multi-frame sessions, and the reporting snapshot they produce.

use approx::assert_relative_eq;
use glam::{Vec2, Vec3};
use vista_core::{
    AudioSourceState, FrameInput, QuadPose, QuadViewTracker, Rolloff,
};

mod common;
use common::OrthoCamera;

fn pose_at(x: f32, y: f32) -> QuadPose {
    QuadPose::from_translation(Vec3::new(x, y, 5.0)).with_scale(Vec3::new(400.0, 300.0, 1.0))
}

fn loud_source() -> AudioSourceState {
    AudioSourceState {
        position: Vec3::new(960.0, 540.0, 5.0),
        rolloff: Rolloff::Linear,
        min_distance: 50.0,
        max_distance: 500.0,
        spatial_blend: 1.0,
        volume: 1.0,
    }
}

/// Share of the Full HD viewport covered by a 400x300 pixel quad.
const FULL_SHARE: f32 = 120000.0 / 2073600.0 * 100.0;

#[test]
fn screen_share_mean_is_weighted_over_visible_time_only() {
    let cam = OrthoCamera::full_hd();
    let mut tracker = QuadViewTracker::new();
    let visible = |tracker: &mut QuadViewTracker, n: usize| {
        for _ in 0..n {
            tracker.update(FrameInput {
                pose: pose_at(960.0, 540.0),
                camera: Some(&cam),
                dt: 0.25,
                ..FrameInput::idle()
            });
        }
    };
    let hidden = |tracker: &mut QuadViewTracker, n: usize| {
        for _ in 0..n {
            tracker.update(FrameInput {
                pose: pose_at(-2000.0, 540.0),
                camera: Some(&cam),
                dt: 0.25,
                ..FrameInput::idle()
            });
        }
    };

    visible(&mut tracker, 5); // first frame only starts the clock
    hidden(&mut tracker, 4);
    visible(&mut tracker, 4);

    assert_relative_eq!(tracker.view_time(), 2.0, epsilon = 1e-5);
    assert_relative_eq!(tracker.hit_time(), 2.0, epsilon = 1e-5);
    assert_relative_eq!(tracker.elapsed(), 3.25, epsilon = 1e-5);
    // Hidden stretches contribute no weight, so the mean holds steady.
    assert_relative_eq!(
        tracker.summary().mean_screen_percent,
        FULL_SHARE,
        epsilon = 1e-3
    );
}

#[test]
fn screen_share_mean_blends_changing_coverage() {
    let cam = OrthoCamera::full_hd();
    let mut tracker = QuadViewTracker::new();
    let step = |tracker: &mut QuadViewTracker, scale_x: f32, n: usize| {
        for _ in 0..n {
            tracker.update(FrameInput {
                pose: pose_at(960.0, 540.0).with_scale(Vec3::new(scale_x, 300.0, 1.0)),
                camera: Some(&cam),
                dt: 0.25,
                ..FrameInput::idle()
            });
        }
    };

    step(&mut tracker, 400.0, 3); // one clock-start frame, two measured
    step(&mut tracker, 800.0, 2);

    let double = FULL_SHARE * 2.0;
    let expected = (FULL_SHARE * 2.0 + double * 2.0) / 4.0;
    assert_relative_eq!(tracker.summary().mean_screen_percent, expected, epsilon = 1e-3);
}

#[test]
fn offset_y_is_instantaneous_while_x_is_blended() {
    let cam = OrthoCamera::full_hd();
    let mut tracker = QuadViewTracker::new();
    let frame = |x: f32, y: f32| FrameInput {
        pose: pose_at(x, y),
        camera: Some(&cam),
        dt: 0.5,
        ..FrameInput::idle()
    };

    tracker.update(frame(960.0, 540.0)); // clock start
    tracker.update(frame(1060.0, 620.0)); // offset (100, 80)
    tracker.update(frame(900.0, 560.0)); // offset (-60, 20)

    let offset = tracker.summary().mean_screen_offset;
    // x: equal-weight blend of 100 and -60.
    assert_eq!(offset.x, 20.0);
    // y: the last visible frame's raw offset, not the blend (which would
    // be 50). Reporting consumers are calibrated to this asymmetry.
    assert_eq!(offset.y, 20.0);
}

#[test]
fn offset_y_persists_while_the_quad_is_hidden() {
    let cam = OrthoCamera::full_hd();
    let mut tracker = QuadViewTracker::new();
    let frame = |x: f32, y: f32| FrameInput {
        pose: pose_at(x, y),
        camera: Some(&cam),
        dt: 0.5,
        ..FrameInput::idle()
    };

    tracker.update(frame(960.0, 540.0));
    tracker.update(frame(960.0, 600.0)); // offset (0, 60)
    tracker.update(frame(-2000.0, 540.0)); // hidden
    tracker.update(frame(-2000.0, 540.0)); // hidden

    assert_eq!(tracker.summary().mean_screen_offset, Vec2::new(0.0, 60.0));
}

#[test]
fn volume_mean_is_weighted_over_total_elapsed_time() {
    // No camera at all: audibility accrues independently of visibility.
    let mut tracker = QuadViewTracker::new();
    let source = loud_source();
    for _ in 0..4 {
        tracker.update(FrameInput {
            pose: pose_at(960.0, 540.0),
            listener: Some(Vec3::new(960.0, 540.0, 5.0)),
            audio: Some(&source),
            dt: 0.25,
            ..FrameInput::idle()
        });
    }
    // Three of four quarter-second intervals sampled at full volume; the
    // clock-start interval weighs in as silence.
    assert_relative_eq!(tracker.summary().mean_volume_percent, 75.0, epsilon = 1e-3);
    assert_eq!(tracker.summary().mean_screen_percent, 0.0);
}

#[test]
fn missing_listener_samples_silence() {
    let mut tracker = QuadViewTracker::new();
    let source = loud_source();
    for _ in 0..5 {
        tracker.update(FrameInput {
            pose: pose_at(960.0, 540.0),
            audio: Some(&source),
            dt: 0.25,
            ..FrameInput::idle()
        });
    }
    assert_eq!(tracker.summary().mean_volume_percent, 0.0);
}

#[test]
fn listener_distance_shapes_the_volume_mean() {
    let mut tracker = QuadViewTracker::new();
    let source = loud_source();
    // Halfway across the linear window: 50 + (500 - 50) / 2 = 275 world
    // units from the source, so each sample is 50 percent.
    let listener = Vec3::new(960.0 + 275.0, 540.0, 5.0);
    for _ in 0..3 {
        tracker.update(FrameInput {
            pose: pose_at(960.0, 540.0),
            listener: Some(listener),
            audio: Some(&source),
            dt: 0.5,
            ..FrameInput::idle()
        });
    }
    // Two sampled intervals at 50, one clock-start interval at 0.
    assert_relative_eq!(
        tracker.summary().mean_volume_percent,
        50.0 * 2.0 / 3.0,
        epsilon = 1e-3
    );
}

#[test]
fn one_second_full_hd_session_end_to_end() {
    let cam = OrthoCamera::full_hd();
    let mut tracker = QuadViewTracker::new();
    tracker.bind_creative(Some(42));
    let dt = 1.0 / 60.0;
    for _ in 0..60 {
        tracker.update(FrameInput {
            pose: pose_at(960.0, 540.0),
            camera: Some(&cam),
            dt,
            ..FrameInput::idle()
        });
    }

    let summary = tracker.summary();
    assert_eq!(summary.ad_id, Some(42));
    // 59 of 60 frames measured; the first only starts the clock.
    assert_relative_eq!(summary.hit_time, 59.0 / 60.0, epsilon = 1e-4);
    assert_relative_eq!(summary.mean_screen_percent, FULL_SHARE, epsilon = 1e-3);
    assert_relative_eq!(summary.mean_occluded_percent, 0.0, epsilon = 1e-6);
    assert_relative_eq!(summary.mean_volume_percent, 0.0, epsilon = 1e-6);
    assert_eq!(summary.mean_screen_offset, Vec2::ZERO);
    assert_relative_eq!(tracker.elapsed(), 1.0, epsilon = 1e-4);
}
