// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Engine-agnostic ad spot lifecycle.
//!
//! [`AdSpot`] is a sans-I/O state machine: each frame it emits
//! [`SpotCommand`]s (request an ad, load media, play, pause, upload view
//! data, open a link) and consumes [`SpotEvent`]s the host reports back
//! (creative resolved, media prepared, playback ended, focus changed,
//! clicked). The embedded [`vista_core::QuadViewTracker`] supplies the
//! viewability metrics that gate playback and fill the periodic reports.

pub mod config;
pub mod spot;

pub use config::{AdCategory, SpotConfig};
pub use spot::{AdCreative, AdSpot, LoadState, SpotCommand, SpotEvent, REPORT_INTERVAL};
