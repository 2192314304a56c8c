// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Async client for the ad server's two endpoints.

use std::time::Duration;

use reqwest::header;
use thiserror::Error;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::debug;
use vista_core::{MediaKind, ViewSummary};

use crate::payload::{AdRequest, AdResponse, ViewDataUpload};

/// Path of the creative-request endpoint, relative to the base URL.
pub const AD_REQUEST_PATH: &str = "ad-request";
/// Path of the metrics-upload endpoint, relative to the base URL.
pub const VIEW_DATA_PATH: &str = "view-data";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// The server parses timestamps as `yyyy-MM-dd HH:mm:ss`, always UTC.
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Error type for ad server calls.
#[derive(Debug, Error)]
pub enum NetError {
    /// Transport failure or non-success HTTP status.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// Response body was not the JSON we expect.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    /// Timestamp rendering failure.
    #[error("timestamp format error: {0}")]
    Timestamp(#[from] time::error::Format),
}

/// Identity and addressing for one game's ad server account.
#[derive(Debug, Clone)]
pub struct AdServerConfig {
    /// Server root, e.g. `https://ads.example.com/api`. Endpoint paths
    /// are appended to this.
    pub base_url: String,
    /// Developer account id.
    pub developer_id: i64,
    /// Registered game id.
    pub game_id: i64,
    /// Developer access token, sent as the `Authorization` header and
    /// echoed in every payload.
    pub access_token: String,
    /// Stable device identifier.
    pub device_id: String,
    /// Host platform name reported with view data.
    pub platform: String,
    /// Advertising identifier, when the platform exposes one.
    pub advertising_id: Option<String>,
    /// Whether a VR device is driving the session.
    pub with_vr: bool,
    /// Device latitude/longitude, when known.
    pub location: Option<(f64, f64)>,
}

/// HTTP client bound to one [`AdServerConfig`].
pub struct AdServerClient {
    http: reqwest::Client,
    config: AdServerConfig,
}

impl AdServerClient {
    /// Build a client with a 10 second request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::Http`] when the TLS backend fails to
    /// initialize.
    pub fn new(config: AdServerConfig) -> Result<Self, NetError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http, config })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &AdServerConfig {
        &self.config
    }

    /// Ask the server for a creative of the given kind.
    ///
    /// A fulfilled request has `success == true` and a populated
    /// `result`; the server also reports "no campaign available" as a
    /// well-formed response with `success == false`, so callers must
    /// check the flag rather than rely on `Err`.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::Http`] on transport failure or a non-2xx
    /// status, and [`NetError::Decode`] when the body is not the
    /// expected JSON.
    pub async fn request_ad(&self, kind: MediaKind) -> Result<AdResponse, NetError> {
        let (latitude, longitude) = self.config.location.unwrap_or_default();
        let request = AdRequest {
            developer_id: self.config.developer_id,
            access_token: self.config.access_token.clone(),
            game_id: self.config.game_id,
            media_type: kind.wire_id(),
            device: self.config.device_id.clone(),
            timestamp: utc_timestamp()?,
            latitude,
            longitude,
        };
        self.post(AD_REQUEST_PATH, &request).await
    }

    /// Upload one accumulated viewability snapshot.
    ///
    /// # Errors
    ///
    /// Same error surface as [`AdServerClient::request_ad`].
    pub async fn send_view_data(&self, summary: &ViewSummary) -> Result<AdResponse, NetError> {
        let (latitude, longitude) = self.config.location.unwrap_or_default();
        let upload = ViewDataUpload {
            access_token: self.config.access_token.clone(),
            game_id: self.config.game_id,
            ad_id: summary.ad_id.unwrap_or(0),
            hit_time: summary.hit_time,
            screen_percent: summary.mean_screen_percent,
            screen_position_x: summary.mean_screen_offset.x,
            screen_position_y: summary.mean_screen_offset.y,
            blocked_percent: summary.mean_occluded_percent,
            volume_percent: summary.mean_volume_percent,
            device: self.config.device_id.clone(),
            timestamp: utc_timestamp()?,
            with_vr: i64::from(self.config.with_vr),
            platform: self.config.platform.clone(),
            advertising_id: self.config.advertising_id.clone().unwrap_or_default(),
            latitude,
            longitude,
        };
        self.post(VIEW_DATA_PATH, &upload).await
    }

    async fn post<T: serde::Serialize>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<AdResponse, NetError> {
        let url = format!("{}/{path}", self.config.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .header(header::AUTHORIZATION, self.config.access_token.as_str())
            .json(payload)
            .send()
            .await?
            .error_for_status()?;
        // Decode from text instead of `Response::json` so a malformed
        // body is still available for the log line.
        let body = response.text().await?;
        match serde_json::from_str::<AdResponse>(&body) {
            Ok(decoded) => Ok(decoded),
            Err(err) => {
                debug!(%url, %body, "ad server sent malformed json");
                Err(err.into())
            }
        }
    }
}

fn utc_timestamp() -> Result<String, NetError> {
    Ok(OffsetDateTime::now_utc().format(&TIMESTAMP_FORMAT)?)
}
