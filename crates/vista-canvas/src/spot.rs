// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! The ad spot state machine.
//!
//! An [`AdSpot`] never performs I/O. Each frame [`advance`](AdSpot::advance)
//! returns the [`SpotCommand`]s the host must execute (network requests,
//! media playback, reporting), and the host feeds the outcomes back as
//! [`SpotEvent`]s. That keeps the whole lifecycle deterministic and
//! testable without an engine or a server.

use rand::Rng;
use tracing::{debug, info};
use vista_core::{FrameInput, MediaKind, QuadViewTracker, ViewSummary};

use crate::config::{AdCategory, SpotConfig};

/// Seconds between periodic view-data uploads.
pub const REPORT_INTERVAL: f32 = 600.0;

/// Where the spot is in its media lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadState {
    /// No ad requested yet.
    Waiting,
    /// A creative request or media load is in flight.
    Loading,
    /// Video media is decoded and waiting for its start gate.
    Prepared,
    /// The last request or load failed; a new one may be forced.
    Failed,
    /// Media is on the quad.
    Showing,
}

/// A creative resolved by the ad server.
#[derive(Debug, Clone, PartialEq)]
pub struct AdCreative {
    /// Server-side identifier of the advertisement.
    pub ad_id: i64,
    /// Delivered media kind.
    pub kind: MediaKind,
    /// Server-side identifier of the request that produced this
    /// creative, when the server reports one.
    pub request_id: Option<i64>,
    /// Where the media bytes live.
    pub media_url: String,
    /// Click-through destination, when the campaign has one.
    pub link: Option<String>,
}

/// Side effects the host must execute for the spot.
#[derive(Debug, Clone, PartialEq)]
pub enum SpotCommand {
    /// Ask the ad server for a creative.
    RequestAd {
        /// Format to request.
        kind: MediaKind,
        /// Category restriction.
        category: AdCategory,
        /// Placement identifier.
        spot_id: String,
        /// Whether the placement accepts click-throughs.
        clickable: bool,
    },
    /// Fetch and decode the creative's media, then report back with
    /// [`SpotEvent::MediaPrepared`] or [`SpotEvent::MediaFailed`].
    LoadMedia {
        /// Format being loaded.
        kind: MediaKind,
        /// Source of the media bytes.
        url: String,
    },
    /// Load the bundled placeholder for `kind` instead of a creative.
    LoadPlaceholder {
        /// Format of placeholder to show.
        kind: MediaKind,
    },
    /// Start or resume video playback.
    Play,
    /// Pause video playback.
    Pause,
    /// Stop video playback.
    Stop,
    /// Upload a view-data report.
    SendViewData(ViewSummary),
    /// Open the creative's click-through link.
    OpenLink(String),
}

/// Outcomes and inputs the host feeds back into the spot.
#[derive(Debug, Clone, PartialEq)]
pub enum SpotEvent {
    /// The ad server answered with a creative.
    CreativeResolved(AdCreative),
    /// The ad server request failed or was refused.
    CreativeFailed,
    /// Media finished decoding and is ready to show. `duration` is the
    /// media runtime in seconds where the host knows it (videos).
    MediaPrepared {
        /// Runtime of the prepared media, if known.
        duration: Option<f32>,
    },
    /// Media could not be fetched or decoded.
    MediaFailed,
    /// Video playback reached its end.
    PlaybackEnded,
    /// The application gained (`true`) or lost (`false`) focus.
    FocusChanged(bool),
    /// The user clicked the spot.
    Clicked,
}

/// One ad placement: lifecycle state machine plus viewability tracker.
///
/// Drive it with [`advance`](Self::advance) once per frame and
/// [`handle`](Self::handle) whenever the host has an outcome to report.
/// Both return commands; execute them in order.
#[derive(Debug)]
pub struct AdSpot {
    config: SpotConfig,
    tracker: QuadViewTracker,
    state: LoadState,
    creative: Option<AdCreative>,
    started: bool,
    playing: bool,
    focus_paused: bool,
    play_time: f32,
    video_duration: Option<f32>,
    initial_delay: f32,
    report_timer: f32,
}

impl AdSpot {
    /// Creates a spot.
    ///
    /// `rng` seeds two pieces of jitter: the first report fires slightly
    /// early so fleets of spots do not thunder the reporting endpoint in
    /// sync, and the configured start delay is drawn from
    /// `[0, initial_random_delay]`.
    pub fn new(config: SpotConfig, rng: &mut impl Rng) -> Self {
        let report_timer = REPORT_INTERVAL - rng.gen_range(1.0..20.0);
        let initial_delay = if config.initial_random_delay > 0.0 {
            rng.gen_range(0.0..=config.initial_random_delay)
        } else {
            0.0
        };
        Self {
            config,
            tracker: QuadViewTracker::new(),
            state: LoadState::Waiting,
            creative: None,
            started: false,
            playing: false,
            focus_paused: false,
            play_time: 0.0,
            video_duration: None,
            initial_delay,
            report_timer,
        }
    }

    /// Spot configuration.
    #[must_use]
    pub fn config(&self) -> &SpotConfig {
        &self.config
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Whether media is currently on the quad.
    #[must_use]
    pub fn is_showing(&self) -> bool {
        self.state == LoadState::Showing
    }

    /// The resolved creative, if any.
    #[must_use]
    pub fn creative(&self) -> Option<&AdCreative> {
        self.creative.as_ref()
    }

    /// Seconds the current media has been showing (videos: playing).
    #[must_use]
    pub fn play_time(&self) -> f32 {
        self.play_time
    }

    /// Runtime of the current media: the configured rotation window for
    /// images, the reported duration for videos.
    #[must_use]
    pub fn media_duration(&self) -> Option<f32> {
        if self.active_kind().is_video() {
            self.video_duration
        } else {
            Some(self.config.image_duration)
        }
    }

    /// The embedded viewability tracker.
    #[must_use]
    pub fn tracker(&self) -> &QuadViewTracker {
        &self.tracker
    }

    /// Snapshot of the spot's accumulated viewability metrics.
    #[must_use]
    pub fn summary(&self) -> ViewSummary {
        self.tracker.summary()
    }

    /// Requests a new ad. Without `force` only spots that are waiting or
    /// failed react; with it a request is sent regardless, replacing
    /// whatever is showing once media arrives.
    pub fn show_ad(&mut self, force: bool) -> Vec<SpotCommand> {
        let mut out = Vec::new();
        if force || matches!(self.state, LoadState::Waiting | LoadState::Failed) {
            self.request_ad(&mut out);
        }
        out
    }

    /// Advances the spot by one frame.
    ///
    /// Updates the viewability tracker, counts the reporting cadence
    /// down, advances playback clocks, rotates images, and releases
    /// prepared videos through the delay and proximity gates.
    pub fn advance(&mut self, frame: FrameInput<'_>) -> Vec<SpotCommand> {
        let mut out = Vec::new();
        if !self.started {
            self.started = true;
            if self.config.play_on_awake {
                self.request_ad(&mut out);
            }
        }

        // Media without an audio track contributes silence no matter
        // what source state the host wired up.
        let mut measured = frame;
        if !self.active_kind().carries_audio() {
            measured.audio = None;
        }
        self.tracker.update(measured);

        let dt = frame.dt.max(0.0);
        self.report_timer -= dt;
        if self.report_timer <= 0.0 {
            self.report_timer = REPORT_INTERVAL;
            out.push(SpotCommand::SendViewData(self.tracker.summary()));
        }

        match self.state {
            LoadState::Showing => self.advance_showing(dt, &mut out),
            LoadState::Prepared => self.advance_prepared(dt, &mut out),
            LoadState::Waiting | LoadState::Loading | LoadState::Failed => {}
        }
        out
    }

    /// Applies a host-reported outcome.
    pub fn handle(&mut self, event: SpotEvent) -> Vec<SpotCommand> {
        let mut out = Vec::new();
        match event {
            SpotEvent::CreativeResolved(creative) => self.on_creative(creative, &mut out),
            SpotEvent::CreativeFailed => {
                debug!(spot = %self.config.spot_id, "creative request failed; falling back to placeholder");
                self.creative = None;
                self.tracker.bind_creative(None);
                out.push(SpotCommand::LoadPlaceholder {
                    kind: self.config.media,
                });
            }
            SpotEvent::MediaPrepared { duration } => {
                if self.state == LoadState::Loading {
                    self.on_prepared(duration, &mut out);
                } else {
                    debug!(spot = %self.config.spot_id, state = ?self.state, "stray media-prepared ignored");
                }
            }
            SpotEvent::MediaFailed => {
                // Legitimate any time: decoding can fail mid-playback.
                self.state = LoadState::Failed;
                self.playing = false;
            }
            SpotEvent::PlaybackEnded => {
                if self.state == LoadState::Showing {
                    self.playing = false;
                    out.push(SpotCommand::Stop);
                    if self.config.auto_play_next {
                        self.request_ad(&mut out);
                    }
                } else {
                    debug!(spot = %self.config.spot_id, state = ?self.state, "stray playback-end ignored");
                }
            }
            SpotEvent::FocusChanged(focused) => self.on_focus(focused, &mut out),
            SpotEvent::Clicked => self.on_clicked(&mut out),
        }
        out
    }

    fn request_ad(&mut self, out: &mut Vec<SpotCommand>) {
        self.state = LoadState::Loading;
        out.push(SpotCommand::RequestAd {
            kind: self.config.media,
            category: self.config.category,
            spot_id: self.config.spot_id.clone(),
            clickable: self.config.clickable,
        });
    }

    fn on_creative(&mut self, creative: AdCreative, out: &mut Vec<SpotCommand>) {
        info!(
            spot = %self.config.spot_id,
            ad_id = creative.ad_id,
            kind = ?creative.kind,
            "creative resolved"
        );
        self.tracker.bind_creative(Some(creative.ad_id));
        if creative.media_url.is_empty() {
            // A creative with no media is useless; show the placeholder
            // rather than stalling in Loading.
            out.push(SpotCommand::LoadPlaceholder {
                kind: creative.kind,
            });
        } else {
            out.push(SpotCommand::LoadMedia {
                kind: creative.kind,
                url: creative.media_url.clone(),
            });
        }
        self.creative = Some(creative);
        self.state = LoadState::Loading;
    }

    fn on_prepared(&mut self, duration: Option<f32>, out: &mut Vec<SpotCommand>) {
        self.play_time = 0.0;
        if self.active_kind().is_video() {
            self.video_duration = duration;
            self.state = LoadState::Prepared;
            self.try_start_video(out);
        } else {
            // Images show the moment they are decoded.
            self.state = LoadState::Showing;
        }
    }

    fn advance_showing(&mut self, dt: f32, out: &mut Vec<SpotCommand>) {
        if self.active_kind().is_video() {
            if self.playing && !self.focus_paused {
                self.play_time += dt;
            }
        } else {
            self.play_time += dt;
            if self.config.auto_play_next && self.play_time >= self.config.image_duration {
                self.request_ad(out);
            }
        }
    }

    fn advance_prepared(&mut self, dt: f32, out: &mut Vec<SpotCommand>) {
        if self.initial_delay > 0.0 {
            self.initial_delay -= dt;
            if self.initial_delay <= 0.0 {
                self.try_start_video(out);
            }
        } else {
            self.try_start_video(out);
        }
    }

    /// Starts a prepared video if the start delay has expired and the
    /// quad covers enough of the screen.
    fn try_start_video(&mut self, out: &mut Vec<SpotCommand>) {
        if self.initial_delay <= 0.0
            && self.tracker.screen_percent() > self.config.proximity_percent
        {
            self.playing = true;
            self.state = LoadState::Showing;
            out.push(SpotCommand::Play);
        }
    }

    fn on_focus(&mut self, focused: bool, out: &mut Vec<SpotCommand>) {
        if !self.active_kind().is_video() {
            self.focus_paused = !focused;
            return;
        }
        if focused {
            self.focus_paused = false;
            let gated = matches!(self.state, LoadState::Prepared | LoadState::Showing);
            if gated && self.tracker.screen_percent() > self.config.proximity_percent {
                self.playing = true;
                self.state = LoadState::Showing;
                out.push(SpotCommand::Play);
            }
        } else {
            self.focus_paused = true;
            if self.playing {
                self.playing = false;
                out.push(SpotCommand::Pause);
            }
        }
    }

    fn on_clicked(&mut self, out: &mut Vec<SpotCommand>) {
        if !self.config.clickable {
            return;
        }
        let Some(creative) = &self.creative else {
            return;
        };
        if creative.media_url.is_empty() {
            return;
        }
        if let Some(link) = &creative.link {
            info!(spot = %self.config.spot_id, "ad spot clicked");
            out.push(SpotCommand::OpenLink(link.clone()));
        }
    }

    fn active_kind(&self) -> MediaKind {
        self.creative
            .as_ref()
            .map_or(self.config.media, |c| c.kind)
    }
}
