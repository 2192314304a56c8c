// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Client tests against a canned in-process HTTP server.
#![allow(missing_docs)]

use glam::Vec2;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use vista_core::{MediaKind, ViewSummary};
use vista_net::{AdServerClient, AdServerConfig};

/// Binds a one-shot HTTP/1.1 server that captures a single request,
/// answers it with `response_body`, and resolves to the raw request
/// bytes as text.
async fn spawn_one_shot(response_body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let mut raw = Vec::new();
        let mut buf = [0u8; 1024];
        let header_end = loop {
            let n = stream.read(&mut buf).await.expect("read head");
            assert!(n > 0, "client closed before sending a full head");
            raw.extend_from_slice(&buf[..n]);
            if let Some(pos) = find(&raw, b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let head = String::from_utf8_lossy(&raw[..header_end]).into_owned();
        let body_len = content_length(&head);
        while raw.len() < header_end + body_len {
            let n = stream.read(&mut buf).await.expect("read body");
            assert!(n > 0, "client closed mid-body");
            raw.extend_from_slice(&buf[..n]);
        }
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            response_body.len(),
            response_body
        );
        stream.write_all(response.as_bytes()).await.expect("write response");
        stream.shutdown().await.expect("shutdown");
        String::from_utf8_lossy(&raw).into_owned()
    });
    (format!("http://{addr}"), handle)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

fn request_json(raw: &str) -> serde_json::Value {
    let body = raw.split_once("\r\n\r\n").expect("request has a body").1;
    serde_json::from_str(body).expect("request body is json")
}

fn config(base_url: String) -> AdServerConfig {
    AdServerConfig {
        base_url,
        developer_id: 12,
        game_id: 34,
        access_token: "secret-token".to_owned(),
        device_id: "device-9".to_owned(),
        platform: "linux".to_owned(),
        advertising_id: None,
        with_vr: false,
        location: None,
    }
}

#[tokio::test]
async fn request_ad_decodes_a_quoted_boolean_success() {
    let (base_url, server) = spawn_one_shot(
        r#"{
            "message": "ok",
            "result": {
                "ID_Advertisement": 881,
                "ID_MediaType": 1,
                "ID_Request": 1002,
                "dat_Timestamp": "2020-06-01 10:00:00",
                "str_MediaTypeName": "jpg",
                "str_MediaURL": "https://cdn.example/a.jpg"
            },
            "success": "true",
            "str_Link": "https://example.com/campaign"
        }"#,
    )
    .await;

    let client = AdServerClient::new(config(base_url)).expect("client");
    let response = client
        .request_ad(MediaKind::MediumRectangle)
        .await
        .expect("request succeeds");

    assert!(response.success);
    assert_eq!(response.link.as_deref(), Some("https://example.com/campaign"));
    let result = response.result.expect("result present");
    assert_eq!(result.ad_id, 881);
    assert_eq!(result.media_type, 1);
    assert_eq!(result.media_url, "https://cdn.example/a.jpg");

    let raw = server.await.expect("server task");
    assert!(
        raw.starts_with("POST /ad-request HTTP/1.1\r\n"),
        "unexpected request line in {raw:?}"
    );
    assert!(
        raw.to_ascii_lowercase().contains("authorization: secret-token"),
        "missing auth header in {raw:?}"
    );

    let body = request_json(&raw);
    assert_eq!(body["ID_GameDev"], 12);
    assert_eq!(body["ID_Game"], 34);
    assert_eq!(body["ID_MediaType"], 1);
    assert_eq!(body["str_DevAccessToken"], "secret-token");
    assert_eq!(body["str_Device"], "device-9");
    assert_eq!(
        body["dat_Timestamp"].as_str().expect("timestamp").len(),
        19
    );
}

#[tokio::test]
async fn unfulfilled_requests_still_decode() {
    let (base_url, server) =
        spawn_one_shot(r#"{"message": "no campaign available", "success": "false"}"#).await;

    let client = AdServerClient::new(config(base_url)).expect("client");
    let response = client
        .request_ad(MediaKind::LandscapeVideo)
        .await
        .expect("transport succeeds");

    assert!(!response.success);
    assert!(response.result.is_none());
    assert_eq!(response.message.as_deref(), Some("no campaign available"));
    server.await.expect("server task");
}

#[tokio::test]
async fn send_view_data_posts_the_summary_fields() {
    let (base_url, server) = spawn_one_shot(r#"{"success": true}"#).await;

    let mut config = config(base_url);
    config.advertising_id = Some("idfa-77".to_owned());
    config.with_vr = true;
    config.location = Some((52.5, 13.4));
    let client = AdServerClient::new(config).expect("client");

    let summary = ViewSummary {
        ad_id: Some(881),
        hit_time: 12.5,
        mean_screen_percent: 5.75,
        mean_screen_offset: Vec2::new(-14.0, 3.0),
        mean_occluded_percent: 25.0,
        mean_volume_percent: 60.0,
    };
    let response = client.send_view_data(&summary).await.expect("upload succeeds");
    assert!(response.success);

    let raw = server.await.expect("server task");
    assert!(
        raw.starts_with("POST /view-data HTTP/1.1\r\n"),
        "unexpected request line in {raw:?}"
    );

    let body = request_json(&raw);
    assert_eq!(body["ID_Advertisement"], 881);
    assert_eq!(body["dec_TotalHitTime"], 12.5);
    assert_eq!(body["dec_TotalScreenPercentage"], 5.75);
    assert_eq!(body["dec_TotalScreenPositionX"], -14.0);
    assert_eq!(body["dec_TotalScreenPositionY"], 3.0);
    assert_eq!(body["dec_TotalBlockedPercentage"], 25.0);
    assert_eq!(body["dec_TotalVolumePercentage"], 60.0);
    assert_eq!(body["bit_withVR"], 1);
    assert_eq!(body["str_IDFA"], "idfa-77");
    assert_eq!(body["str_Platform"], "linux");
    assert_eq!(body["dec_Latitude"], 52.5);
    assert_eq!(body["dec_Longitude"], 13.4);
}

#[tokio::test]
async fn a_missing_creative_defaults_to_zero_ad_id() {
    let (base_url, server) = spawn_one_shot(r#"{"success": true}"#).await;

    let client = AdServerClient::new(config(base_url)).expect("client");
    let summary = ViewSummary {
        ad_id: None,
        hit_time: 0.0,
        mean_screen_percent: 0.0,
        mean_screen_offset: Vec2::ZERO,
        mean_occluded_percent: 0.0,
        mean_volume_percent: 0.0,
    };
    client.send_view_data(&summary).await.expect("upload succeeds");

    let raw = server.await.expect("server task");
    assert_eq!(request_json(&raw)["ID_Advertisement"], 0);
}

#[tokio::test]
async fn malformed_json_surfaces_as_a_decode_error() {
    let (base_url, server) = spawn_one_shot("<html>gateway error</html>").await;

    let client = AdServerClient::new(config(base_url)).expect("client");
    let err = client
        .request_ad(MediaKind::MediumRectangle)
        .await
        .expect_err("decode fails");
    assert!(matches!(err, vista_net::NetError::Decode(_)), "got {err:?}");
    server.await.expect("server task");
}
