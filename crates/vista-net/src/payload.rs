// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Wire payloads, field-for-field as the ad server speaks them.
//!
//! The server's JSON schema uses Hungarian-prefixed names
//! (`ID_Advertisement`, `dec_TotalHitTime`, ...); serde renames keep the
//! Rust side idiomatic. Response decoding is forgiving: every field is
//! defaulted when absent, and booleans are accepted either bare or
//! quoted, in any case, because the server emits `"false"` as a string
//! under some code paths.

use serde::{Deserialize, Deserializer, Serialize};

/// Request body for the `/ad-request` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdRequest {
    /// Developer account id.
    #[serde(rename = "ID_GameDev")]
    pub developer_id: i64,
    /// Developer access token. Also sent as the `Authorization` header.
    #[serde(rename = "str_DevAccessToken")]
    pub access_token: String,
    /// Registered game id.
    #[serde(rename = "ID_Game")]
    pub game_id: i64,
    /// Wire id of the requested media kind.
    #[serde(rename = "ID_MediaType")]
    pub media_type: i64,
    /// Stable device identifier.
    #[serde(rename = "str_Device")]
    pub device: String,
    /// UTC timestamp, `yyyy-MM-dd HH:mm:ss`.
    #[serde(rename = "dat_Timestamp")]
    pub timestamp: String,
    /// Device latitude, zero when unknown.
    #[serde(rename = "dec_Latitude", default)]
    pub latitude: f64,
    /// Device longitude, zero when unknown.
    #[serde(rename = "dec_Longitude", default)]
    pub longitude: f64,
}

/// One creative as delivered inside an [`AdResponse`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdResult {
    /// Advertisement id; view-data uploads echo this back.
    #[serde(rename = "ID_Advertisement", default)]
    pub ad_id: i64,
    /// Wire id of the delivered media kind.
    #[serde(rename = "ID_MediaType", default)]
    pub media_type: i64,
    /// Server-side id of the request that produced this creative.
    #[serde(rename = "ID_Request", default)]
    pub request_id: i64,
    /// Server timestamp.
    #[serde(rename = "dat_Timestamp", default)]
    pub timestamp: String,
    /// Media format name, e.g. `jpg` or `mp4`.
    #[serde(rename = "str_MediaTypeName", default)]
    pub media_format: String,
    /// Where the media bytes live.
    #[serde(rename = "str_MediaURL", default)]
    pub media_url: String,
}

/// Response body of both endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdResponse {
    /// Human-readable status message.
    #[serde(default)]
    pub message: Option<String>,
    /// The delivered creative, when there is one.
    #[serde(default)]
    pub result: Option<AdResult>,
    /// Whether the server fulfilled the request.
    #[serde(default, deserialize_with = "bool_forgiving")]
    pub success: bool,
    /// Click-through destination for the delivered creative.
    #[serde(rename = "str_Link", default)]
    pub link: Option<String>,
}

/// Request body for the `/view-data` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewDataUpload {
    /// Developer access token.
    #[serde(rename = "str_DevAccessToken")]
    pub access_token: String,
    /// Registered game id.
    #[serde(rename = "ID_Game")]
    pub game_id: i64,
    /// Advertisement the metrics were accumulated for; zero when none
    /// was ever bound.
    #[serde(rename = "ID_Advertisement")]
    pub ad_id: i64,
    /// Cumulative visible, unoccluded seconds.
    #[serde(rename = "dec_TotalHitTime")]
    pub hit_time: f32,
    /// Mean visible screen share, percent.
    #[serde(rename = "dec_TotalScreenPercentage")]
    pub screen_percent: f32,
    /// Mean horizontal center offset, pixels.
    #[serde(rename = "dec_TotalScreenPositionX")]
    pub screen_position_x: f32,
    /// Vertical center offset of the last visible frame, pixels.
    #[serde(rename = "dec_TotalScreenPositionY")]
    pub screen_position_y: f32,
    /// Mean occluded share, percent.
    #[serde(rename = "dec_TotalBlockedPercentage")]
    pub blocked_percent: f32,
    /// Mean perceived volume, percent.
    #[serde(rename = "dec_TotalVolumePercentage")]
    pub volume_percent: f32,
    /// Stable device identifier.
    #[serde(rename = "str_Device")]
    pub device: String,
    /// UTC timestamp, `yyyy-MM-dd HH:mm:ss`.
    #[serde(rename = "dat_Timestamp")]
    pub timestamp: String,
    /// 1 when a VR device is present, else 0.
    #[serde(rename = "bit_withVR")]
    pub with_vr: i64,
    /// Host platform name.
    #[serde(rename = "str_Platform")]
    pub platform: String,
    /// Advertising identifier, empty when unavailable.
    #[serde(rename = "str_IDFA")]
    pub advertising_id: String,
    /// Device latitude, zero when unknown.
    #[serde(rename = "dec_Latitude", default)]
    pub latitude: f64,
    /// Device longitude, zero when unknown.
    #[serde(rename = "dec_Longitude", default)]
    pub longitude: f64,
}

/// Accepts `true`/`false` as JSON booleans or as strings in any case.
fn bool_forgiving<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct Forgiving;

    impl serde::de::Visitor<'_> for Forgiving {
        type Value = bool;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a boolean or a quoted boolean")
        }

        fn visit_bool<E: serde::de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<bool, E> {
            if v.eq_ignore_ascii_case("true") {
                Ok(true)
            } else if v.eq_ignore_ascii_case("false") {
                Ok(false)
            } else {
                Err(E::invalid_value(serde::de::Unexpected::Str(v), &self))
            }
        }
    }

    deserializer.deserialize_any(Forgiving)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ad_request_serializes_the_server_field_names() {
        let request = AdRequest {
            developer_id: 12,
            access_token: "tok".to_owned(),
            game_id: 34,
            media_type: 5,
            device: "dev-1".to_owned(),
            timestamp: "2020-01-02 03:04:05".to_owned(),
            latitude: 0.0,
            longitude: 0.0,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["ID_GameDev"], 12);
        assert_eq!(json["str_DevAccessToken"], "tok");
        assert_eq!(json["ID_Game"], 34);
        assert_eq!(json["ID_MediaType"], 5);
        assert_eq!(json["str_Device"], "dev-1");
        assert_eq!(json["dat_Timestamp"], "2020-01-02 03:04:05");
    }

    #[test]
    fn response_accepts_bare_and_quoted_booleans() {
        for raw in [
            r#"{"success": true}"#,
            r#"{"success": "true"}"#,
            r#"{"success": "True"}"#,
            r#"{"success": "TRUE"}"#,
        ] {
            let response: AdResponse = serde_json::from_str(raw).unwrap();
            assert!(response.success, "failed for {raw}");
        }
        for raw in [r#"{"success": false}"#, r#"{"success": "False"}"#] {
            let response: AdResponse = serde_json::from_str(raw).unwrap();
            assert!(!response.success, "failed for {raw}");
        }
    }

    #[test]
    fn response_rejects_non_boolean_strings() {
        assert!(serde_json::from_str::<AdResponse>(r#"{"success": "yes"}"#).is_err());
    }

    #[test]
    fn response_defaults_every_missing_field() {
        let response: AdResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response, AdResponse::default());
        assert!(!response.success);
        assert!(response.result.is_none());
    }

    #[test]
    fn full_response_round_trips() {
        let raw = r#"{
            "message": "ok",
            "result": {
                "ID_Advertisement": 881,
                "ID_MediaType": 5,
                "ID_Request": 1002,
                "dat_Timestamp": "2020-06-01 10:00:00",
                "str_MediaTypeName": "mp4",
                "str_MediaURL": "https://cdn.example/a.mp4"
            },
            "success": "true",
            "str_Link": "https://example.com/campaign"
        }"#;
        let response: AdResponse = serde_json::from_str(raw).unwrap();
        assert!(response.success);
        assert_eq!(response.link.as_deref(), Some("https://example.com/campaign"));
        let result = response.result.unwrap();
        assert_eq!(result.ad_id, 881);
        assert_eq!(result.media_type, 5);
        assert_eq!(result.media_format, "mp4");
    }

    #[test]
    fn view_data_serializes_the_server_field_names() {
        let upload = ViewDataUpload {
            access_token: "tok".to_owned(),
            game_id: 34,
            ad_id: 881,
            hit_time: 12.5,
            screen_percent: 5.7,
            screen_position_x: -14.0,
            screen_position_y: 3.0,
            blocked_percent: 25.0,
            volume_percent: 60.0,
            device: "dev-1".to_owned(),
            timestamp: "2020-01-02 03:04:05".to_owned(),
            with_vr: 0,
            platform: "linux".to_owned(),
            advertising_id: String::new(),
            latitude: 0.0,
            longitude: 0.0,
        };
        let json = serde_json::to_value(&upload).unwrap();
        assert_eq!(json["ID_Advertisement"], 881);
        assert_eq!(json["dec_TotalHitTime"], 12.5);
        assert_eq!(json["dec_TotalScreenPercentage"], 5.7f32);
        assert_eq!(json["dec_TotalScreenPositionX"], -14.0);
        assert_eq!(json["dec_TotalBlockedPercentage"], 25.0);
        assert_eq!(json["dec_TotalVolumePercentage"], 60.0);
        assert_eq!(json["bit_withVR"], 0);
        assert_eq!(json["str_IDFA"], "");
    }
}
