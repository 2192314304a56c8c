// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! HTTP transport for the ad server: creative requests and view-data
//! uploads.
//!
//! [`AdServerClient`] speaks the server's JSON dialect (see
//! [`payload`]) over two POST endpoints. Everything here is plain
//! request/response; scheduling of when to call these lives with the
//! canvas layer, and the measurement math lives in `vista-core`.

pub mod client;
pub mod payload;

pub use client::{AdServerClient, AdServerConfig, NetError, AD_REQUEST_PATH, VIEW_DATA_PATH};
pub use payload::{AdRequest, AdResponse, AdResult, ViewDataUpload};
