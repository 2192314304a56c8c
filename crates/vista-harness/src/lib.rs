// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Headless scene rigs for exercising the viewability pipeline without
//! an engine: a perspective camera with engine-style screen projection,
//! an orbit rig to move it, sphere occluders for line-of-sight queries,
//! and a fixed-step clock. Demos and integration tests assemble these
//! into deterministic sessions.

pub mod blockers;
pub mod camera;
pub mod clock;
pub mod orbit;

pub use blockers::{Sphere, SphereField};
pub use camera::PinholeCamera;
pub use clock::StepClock;
pub use orbit::OrbitRig;
