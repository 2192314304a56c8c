// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Creative formats the ad server can deliver.

use thiserror::Error;

/// Reference side length, in pixels, of a quad at unit scale. Placement
/// scale factors are media pixel dimensions divided by this.
pub const BASE_SIDE_LENGTH: f32 = 300.0;

/// The creative formats the ad server can deliver, named after the IAB
/// display sizes they correspond to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// 300 x 250 still image.
    MediumRectangle,
    /// 300 x 600 still image.
    LargeRectangle,
    /// 160 x 600 still image.
    WideSkyscraper,
    /// 728 x 90 still image.
    Leaderboard,
    /// 540 x 300 video with an audio track.
    LandscapeVideo,
    /// 300 x 540 video with an audio track.
    PortraitVideo,
}

/// The ad server named a media kind this SDK does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown media kind id {0}")]
pub struct UnknownMediaKind(pub i64);

impl MediaKind {
    /// Every kind, in wire id order.
    pub const ALL: [Self; 6] = [
        Self::MediumRectangle,
        Self::LargeRectangle,
        Self::WideSkyscraper,
        Self::Leaderboard,
        Self::LandscapeVideo,
        Self::PortraitVideo,
    ];

    /// Numeric id used on the wire.
    #[must_use]
    pub fn wire_id(self) -> i64 {
        match self {
            Self::MediumRectangle => 1,
            Self::LargeRectangle => 2,
            Self::WideSkyscraper => 3,
            Self::Leaderboard => 4,
            Self::LandscapeVideo => 5,
            Self::PortraitVideo => 6,
        }
    }

    /// Parses a wire id.
    pub fn from_wire_id(id: i64) -> Result<Self, UnknownMediaKind> {
        match id {
            1 => Ok(Self::MediumRectangle),
            2 => Ok(Self::LargeRectangle),
            3 => Ok(Self::WideSkyscraper),
            4 => Ok(Self::Leaderboard),
            5 => Ok(Self::LandscapeVideo),
            6 => Ok(Self::PortraitVideo),
            other => Err(UnknownMediaKind(other)),
        }
    }

    /// Creative pixel dimensions, width by height.
    #[must_use]
    pub fn pixel_size(self) -> (u32, u32) {
        match self {
            Self::MediumRectangle => (300, 250),
            Self::LargeRectangle => (300, 600),
            Self::WideSkyscraper => (160, 600),
            Self::Leaderboard => (728, 90),
            Self::LandscapeVideo => (540, 300),
            Self::PortraitVideo => (300, 540),
        }
    }

    /// Placement scale factors relative to [`BASE_SIDE_LENGTH`]. Hosts
    /// multiply their spot's base world size by these so every kind keeps
    /// its aspect ratio on the quad.
    #[must_use]
    pub fn placement_scale(self) -> (f32, f32) {
        let (w, h) = self.pixel_size();
        (w as f32 / BASE_SIDE_LENGTH, h as f32 / BASE_SIDE_LENGTH)
    }

    /// Whether this kind is a video.
    #[must_use]
    pub fn is_video(self) -> bool {
        matches!(self, Self::LandscapeVideo | Self::PortraitVideo)
    }

    /// Whether this kind carries an audio track. Only videos do, so only
    /// they contribute nonzero audibility samples.
    #[must_use]
    pub fn carries_audio(self) -> bool {
        self.is_video()
    }
}
