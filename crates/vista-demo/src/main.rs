// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Headless demo session for the Vista ad stack.
//!
//! Simulates a scene at a fixed step: an orbiting camera watches a billboard
//! quad through a slowly turning carousel of occluder spheres while an
//! [`AdSpot`] requests creatives, gates video playback on viewability, and
//! uploads view-data reports. Unless `--server` points at a real ad server,
//! a canned loopback server answers every request with a rotating creative.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use anyhow::Result;
use clap::Parser;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use vista_canvas::{AdCreative, AdSpot, SpotCommand, SpotConfig, SpotEvent};
use vista_core::{
    AudioSourceState, FrameInput, MediaKind, PixelRect, QuadPose, Rolloff, ViewSummary,
};
use vista_harness::{OrbitRig, PinholeCamera, SphereField, StepClock};
use vista_net::{AdServerClient, AdServerConfig, AD_REQUEST_PATH, VIEW_DATA_PATH};

const VIEWPORT_WIDTH: f32 = 1920.0;
const VIEWPORT_HEIGHT: f32 = 1080.0;
const FOV_Y_DEGREES: f32 = 60.0;
const ORBIT_DISTANCE: f32 = 4.0;
/// Camera sweep in degrees per second. One revolution every two minutes.
const ORBIT_RATE: f32 = 3.0;
/// Seconds per carousel revolution.
const CAROUSEL_PERIOD: f32 = 30.0;
/// Pretend runtime of every video creative the demo "decodes".
const VIDEO_RUNTIME: f32 = 15.0;
/// Focus drops mid-playback, while the camera faces the billboard, so
/// the pause and the gated resume both show up in the log.
const FOCUS_LOST_AT: f32 = 110.0;
const FOCUS_BACK_AT: f32 = 115.0;
const CLICK_AT: f32 = 400.0;

#[derive(Parser, Debug)]
#[command(author, version, about = "Vista headless demo session")]
struct Args {
    /// Simulated session length in seconds
    #[arg(long, default_value_t = 650.0)]
    duration: f32,
    /// Simulation rate in frames per second
    #[arg(long, default_value_t = 60.0)]
    fps: f32,
    /// Seed for the spot's report jitter and start delay
    #[arg(long, default_value_t = 7)]
    seed: u64,
    /// Ad server base URL. When absent a canned loopback server is spawned
    #[arg(long)]
    server: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    anyhow::ensure!(args.fps > 0.0, "fps must be positive");
    anyhow::ensure!(args.duration > 0.0, "duration must be positive");

    let base_url = match &args.server {
        Some(url) => url.clone(),
        None => spawn_canned_server().await?,
    };
    info!(%base_url, "ad server");

    let client = AdServerClient::new(demo_config(base_url))?;
    run_session(&args, &client).await
}

fn demo_config(base_url: String) -> AdServerConfig {
    AdServerConfig {
        base_url,
        developer_id: 12,
        game_id: 34,
        access_token: "demo-access-token".to_owned(),
        device_id: "demo-device".to_owned(),
        platform: "headless".to_owned(),
        advertising_id: Some("demo-idfa".to_owned()),
        with_vr: false,
        location: Some((52.52, 13.405)),
    }
}

/// Drives the simulated scene and the spot for `args.duration` seconds.
async fn run_session(args: &Args, client: &AdServerClient) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(args.seed);
    let config = SpotConfig {
        spot_id: "demo-billboard".to_owned(),
        clickable: true,
        ..SpotConfig::default()
    };
    let kind = config.media;
    let mut spot = AdSpot::new(config, &mut rng);
    let mut media = MediaSim::default();
    let mut clock = StepClock::hz(args.fps);
    let mut rig = OrbitRig::new(Vec3::ZERO, ORBIT_DISTANCE);

    let (width, height) = kind.placement_scale();
    let quad = QuadPose::from_translation(Vec3::ZERO).with_scale(Vec3::new(width, height, 1.0));
    let viewport = PixelRect::from_size(VIEWPORT_WIDTH, VIEWPORT_HEIGHT);

    info!(
        duration = args.duration,
        fps = args.fps,
        ?kind,
        "session start"
    );

    let total_frames = (args.duration * args.fps).ceil() as u64;
    for _ in 0..total_frames {
        let before = clock.elapsed();
        let dt = clock.tick();
        let now = clock.elapsed();

        rig.orbit(ORBIT_RATE * dt, 0.0);
        let camera = PinholeCamera::look_at(rig.eye(), quad.translation(), FOV_Y_DEGREES, viewport);
        let blockers = SphereField::ring(3, 2.5, 0.8, TAU * now / CAROUSEL_PERIOD);
        let audio = audio_source(quad.translation());

        if media.playing {
            media.position += dt;
            if media.duration.is_some_and(|runtime| media.position >= runtime) {
                media.playing = false;
                media.position = 0.0;
                let commands = spot.handle(SpotEvent::PlaybackEnded);
                execute(commands, &mut spot, client, &mut media).await;
            }
        }

        for event in scripted_events(before, now) {
            let commands = spot.handle(event);
            execute(commands, &mut spot, client, &mut media).await;
        }

        let audible = media.playing
            && spot
                .creative()
                .is_some_and(|creative| creative.kind.carries_audio());
        let commands = spot.advance(FrameInput {
            pose: quad,
            camera: Some(&camera),
            occlusion: Some(&blockers),
            listener: Some(rig.eye()),
            audio: audible.then_some(&audio),
            dt,
        });
        execute(commands, &mut spot, client, &mut media).await;
    }

    let summary = spot.summary();
    upload(client, &summary).await;
    info!(
        hit_time = summary.hit_time,
        screen = summary.mean_screen_percent,
        occluded = summary.mean_occluded_percent,
        volume = summary.mean_volume_percent,
        offset_x = summary.mean_screen_offset.x,
        offset_y = summary.mean_screen_offset.y,
        "session complete"
    );
    Ok(())
}

/// Focus loss, focus regain, and a click at fixed points in the session.
fn scripted_events(before: f32, now: f32) -> Vec<SpotEvent> {
    let crossed = |at: f32| before < at && now >= at;
    let mut events = Vec::new();
    if crossed(FOCUS_LOST_AT) {
        events.push(SpotEvent::FocusChanged(false));
    }
    if crossed(FOCUS_BACK_AT) {
        events.push(SpotEvent::FocusChanged(true));
    }
    if crossed(CLICK_AT) {
        events.push(SpotEvent::Clicked);
    }
    events
}

fn audio_source(position: Vec3) -> AudioSourceState {
    AudioSourceState {
        position,
        rolloff: Rolloff::Linear,
        min_distance: 1.0,
        max_distance: 50.0,
        spatial_blend: 1.0,
        volume: 1.0,
    }
}

/// Stand-in for the host's media player.
#[derive(Debug, Default)]
struct MediaSim {
    playing: bool,
    position: f32,
    duration: Option<f32>,
}

/// Executes spot commands, feeding outcomes back in until the queue drains.
async fn execute(
    initial: Vec<SpotCommand>,
    spot: &mut AdSpot,
    client: &AdServerClient,
    media: &mut MediaSim,
) {
    let mut queue: VecDeque<SpotCommand> = initial.into();
    while let Some(command) = queue.pop_front() {
        let follow_up = match command {
            SpotCommand::RequestAd { kind, spot_id, .. } => {
                info!(%spot_id, ?kind, "requesting creative");
                let event = resolve_creative(client, kind).await;
                spot.handle(event)
            }
            SpotCommand::LoadMedia { kind, url } => {
                debug!(%url, "decoding media");
                media.duration = kind.is_video().then_some(VIDEO_RUNTIME);
                media.position = 0.0;
                spot.handle(SpotEvent::MediaPrepared {
                    duration: media.duration,
                })
            }
            SpotCommand::LoadPlaceholder { kind } => {
                info!(?kind, "showing bundled placeholder");
                media.duration = kind.is_video().then_some(VIDEO_RUNTIME);
                media.position = 0.0;
                spot.handle(SpotEvent::MediaPrepared {
                    duration: media.duration,
                })
            }
            SpotCommand::Play => {
                media.playing = true;
                Vec::new()
            }
            SpotCommand::Pause => {
                media.playing = false;
                Vec::new()
            }
            SpotCommand::Stop => {
                media.playing = false;
                media.position = 0.0;
                Vec::new()
            }
            SpotCommand::SendViewData(summary) => {
                upload(client, &summary).await;
                Vec::new()
            }
            SpotCommand::OpenLink(url) => {
                info!(%url, "opening click-through link");
                Vec::new()
            }
        };
        queue.extend(follow_up);
    }
}

/// Asks the ad server for a creative and maps the answer to a spot event.
async fn resolve_creative(client: &AdServerClient, kind: MediaKind) -> SpotEvent {
    match client.request_ad(kind).await {
        Ok(response) if response.success => match response.result {
            Some(result) => SpotEvent::CreativeResolved(AdCreative {
                ad_id: result.ad_id,
                kind: MediaKind::from_wire_id(result.media_type).unwrap_or(kind),
                request_id: Some(result.request_id),
                media_url: result.media_url,
                link: response.link,
            }),
            None => {
                warn!("ad server claimed success without a creative");
                SpotEvent::CreativeFailed
            }
        },
        Ok(response) => {
            info!(
                message = response.message.as_deref().unwrap_or("none"),
                "no campaign available"
            );
            SpotEvent::CreativeFailed
        }
        Err(err) => {
            warn!(%err, "ad request failed");
            SpotEvent::CreativeFailed
        }
    }
}

async fn upload(client: &AdServerClient, summary: &ViewSummary) {
    match client.send_view_data(summary).await {
        Ok(response) if response.success => {
            info!(hit_time = summary.hit_time, "view-data report delivered");
        }
        Ok(response) => warn!(
            message = response.message.as_deref().unwrap_or("none"),
            "ad server refused the view-data report"
        ),
        Err(err) => warn!(%err, "view-data upload failed"),
    }
}

// ── Canned ad server ────────────────────────────────────────────────

#[derive(Debug)]
struct CannedIds {
    ad: i64,
    request: i64,
}

async fn spawn_canned_server() -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(serve_canned_ads(listener));
    Ok(format!("http://{addr}"))
}

/// One-connection-at-a-time HTTP server answering the two ad endpoints.
async fn serve_canned_ads(listener: TcpListener) {
    let mut ids = CannedIds { ad: 881, request: 1 };
    loop {
        let stream = match listener.accept().await {
            Ok((stream, _)) => stream,
            Err(err) => {
                warn!(%err, "canned server accept failed");
                continue;
            }
        };
        if let Err(err) = answer(stream, &mut ids).await {
            warn!(%err, "canned server request failed");
        }
    }
}

async fn answer(mut stream: TcpStream, ids: &mut CannedIds) -> Result<()> {
    let (head, body) = read_request(&mut stream).await?;
    let request_line = head.lines().next().unwrap_or_default();
    let path = request_line.split_whitespace().nth(1).unwrap_or_default();
    let (status, payload) = if path.ends_with(AD_REQUEST_PATH) {
        ("200 OK", ad_response(&body, ids))
    } else if path.ends_with(VIEW_DATA_PATH) {
        ("200 OK", view_data_response(&body))
    } else {
        let refusal = serde_json::json!({ "success": "false", "message": "no such endpoint" });
        ("404 Not Found", refusal)
    };
    write_response(&mut stream, status, &payload).await
}

async fn read_request(stream: &mut TcpStream) -> Result<(String, Vec<u8>)> {
    let mut buf = Vec::new();
    let split = loop {
        let mut chunk = [0_u8; 1024];
        let n = stream.read(&mut chunk).await?;
        anyhow::ensure!(n > 0, "connection closed before the request head ended");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(at) = find(&buf, b"\r\n\r\n") {
            break at + 4;
        }
    };
    let mut body = buf.split_off(split);
    let head = String::from_utf8_lossy(&buf).into_owned();
    let wanted = content_length(&head);
    while body.len() < wanted {
        let mut chunk = [0_u8; 1024];
        let n = stream.read(&mut chunk).await?;
        anyhow::ensure!(n > 0, "connection closed before the request body ended");
        body.extend_from_slice(&chunk[..n]);
    }
    body.truncate(wanted);
    Ok((head, body))
}

/// Success envelope with a fresh creative. Booleans are quoted strings on
/// purpose, matching what the production ad server emits.
fn ad_response(body: &[u8], ids: &mut CannedIds) -> serde_json::Value {
    let request: serde_json::Value = serde_json::from_slice(body).unwrap_or_default();
    let media_type = request
        .get("ID_MediaType")
        .and_then(serde_json::Value::as_i64)
        .unwrap_or(5);
    let ad_id = ids.ad;
    ids.ad += 1;
    let request_id = ids.request;
    ids.request += 1;
    serde_json::json!({
        "message": "ok",
        "success": "true",
        "str_Link": "https://example.invalid/campaign",
        "result": {
            "ID_Advertisement": ad_id,
            "ID_MediaType": media_type,
            "ID_Request": request_id,
            "dat_Timestamp": "2026-01-01 00:00:00",
            "str_MediaTypeName": "demo creative",
            "str_MediaURL": format!("https://cdn.invalid/creative-{ad_id}.mp4"),
        },
    })
}

fn view_data_response(body: &[u8]) -> serde_json::Value {
    let report: serde_json::Value = serde_json::from_slice(body).unwrap_or_default();
    let metric = |key: &str| {
        report
            .get(key)
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(0.0)
    };
    info!(
        hit_time = metric("dec_TotalHitTime"),
        screen = metric("dec_TotalScreenPercentage"),
        occluded = metric("dec_TotalBlockedPercentage"),
        volume = metric("dec_TotalVolumePercentage"),
        "canned server took a view-data report"
    );
    serde_json::json!({ "message": "ok", "success": "true" })
}

async fn write_response(
    stream: &mut TcpStream,
    status: &str,
    payload: &serde_json::Value,
) -> Result<()> {
    let body = payload.to_string();
    let headers = format!(
        "HTTP/1.1 {status}\r\ncontent-type: application/json\r\n\
         content-length: {}\r\nconnection: close\r\n\r\n",
        body.len(),
    );
    stream.write_all(headers.as_bytes()).await?;
    stream.write_all(body.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
