// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Per-frame viewability measurement for in-scene ad placements.
//!
//! The pipeline, bottom to top:
//!
//! - [`pose`]: where the ad quad sits in the world;
//! - [`port`]: traits the host implements so the engine can see its
//!   camera, occlusion queries, and audio listener;
//! - [`clip`]: projected-quad clipping against the viewport and polygon
//!   area;
//! - [`grid`]: the occlusion sampling grid;
//! - [`audio`]: perceived loudness of the spot's audio source;
//! - [`average`]: time-weighted running means;
//! - [`tracker`]: the per-frame orchestration that folds all of the
//!   above into a [`ViewSummary`];
//! - [`media`]: the creative formats the ad server delivers.
//!
//! Everything is synchronous and allocation-free per steady-state frame.
//! Hosts own one [`QuadViewTracker`] per ad placement and drive it from
//! their frame loop.

pub mod audio;
pub mod average;
pub mod clip;
pub mod grid;
pub mod media;
pub mod port;
pub mod pose;
pub mod tracker;

pub use audio::{AttenuationCurve, AudioSourceState, CurveKey, Rolloff};
pub use media::{MediaKind, UnknownMediaKind, BASE_SIDE_LENGTH};
pub use port::{CameraPort, FrameInput, OcclusionPort, PixelRect};
pub use pose::QuadPose;
pub use tracker::{QuadViewTracker, ViewSummary};
