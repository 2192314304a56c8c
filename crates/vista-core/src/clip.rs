// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Viewport clipping and area for projected ad quads.
//!
//! The projected quad is clipped against the viewport one half-plane at a
//! time, Sutherland-Hodgman style, in a fixed order: left, right, bottom,
//! top. Each stage walks the closed ring produced by the previous stage
//! and emits kept vertices plus boundary intersections into the other of
//! two fixed scratch buffers. The survivor polygon's area then comes from
//! a triangle fan anchored at its first vertex.
//!
//! Clipping a convex quad against four half-planes yields at most eight
//! vertices; the scratch buffers leave headroom beyond that for the
//! ring-closing duplicate each stage appends.

use glam::Vec2;

use crate::port::PixelRect;

/// Vertex capacity of each clip scratch buffer.
pub const CLIP_CAPACITY: usize = 16;

/// Reusable pair of clip scratch buffers.
///
/// One lives inside each tracker so steady-state frames allocate nothing.
/// Not shared between trackers; the output slice returned by
/// [`clip_quad_to_rect`] borrows it.
#[derive(Debug, Clone)]
pub struct ClipScratch {
    a: [Vec2; CLIP_CAPACITY],
    b: [Vec2; CLIP_CAPACITY],
}

impl ClipScratch {
    /// Creates zeroed scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            a: [Vec2::ZERO; CLIP_CAPACITY],
            b: [Vec2::ZERO; CLIP_CAPACITY],
        }
    }
}

impl Default for ClipScratch {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn of(self, v: Vec2) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }
}

/// Clips `corners` (a projected quad, in order) against `rect`.
///
/// Returns the surviving polygon as a slice into the scratch, in winding
/// order, without a closing duplicate; `None` when nothing survives.
///
/// Boundary convention: the left and bottom edges are inside (`>=`), the
/// right and top edges are outside (`<`), so abutting viewports never
/// count a pixel column or row twice.
pub fn clip_quad_to_rect<'s>(
    scratch: &'s mut ClipScratch,
    corners: [Vec2; 4],
    rect: &PixelRect,
) -> Option<&'s [Vec2]> {
    scratch.a[..4].copy_from_slice(&corners);
    scratch.a[4] = corners[0];
    let mut count = 4;

    count = clip_half_plane(&scratch.a, count, &mut scratch.b, Axis::X, rect.min.x, true);
    if count == 0 {
        return None;
    }
    scratch.b[count] = scratch.b[0];

    count = clip_half_plane(&scratch.b, count, &mut scratch.a, Axis::X, rect.max.x, false);
    if count == 0 {
        return None;
    }
    scratch.a[count] = scratch.a[0];

    count = clip_half_plane(&scratch.a, count, &mut scratch.b, Axis::Y, rect.min.y, true);
    if count == 0 {
        return None;
    }
    scratch.b[count] = scratch.b[0];

    count = clip_half_plane(&scratch.b, count, &mut scratch.a, Axis::Y, rect.max.y, false);
    if count == 0 {
        return None;
    }

    Some(&scratch.a[..count])
}

/// Clips one closed ring against a single axis-aligned half-plane.
///
/// `input[..=count]` must be a closed ring (`input[count] == input[0]`).
/// Writes the surviving open ring into `output` and returns its vertex
/// count. `keep_at_or_above` selects the `>= bound` side; otherwise the
/// strict `< bound` side is kept.
fn clip_half_plane(
    input: &[Vec2; CLIP_CAPACITY],
    count: usize,
    output: &mut [Vec2; CLIP_CAPACITY],
    axis: Axis,
    bound: f32,
    keep_at_or_above: bool,
) -> usize {
    let inside = |v: Vec2| {
        if keep_at_or_above {
            axis.of(v) >= bound
        } else {
            axis.of(v) < bound
        }
    };

    let mut out = 0;
    for i in 0..count {
        // Scratch is sized for the convex case; saturate instead of
        // indexing past it on degenerate self-crossing projections.
        if out >= CLIP_CAPACITY - 2 {
            break;
        }
        let p1 = input[i];
        let p2 = input[i + 1];
        let p1_in = inside(p1);
        let p2_in = inside(p2);
        if p1_in {
            output[out] = p1;
            out += 1;
            if !p2_in {
                output[out] = boundary_point(p1, p2, axis, bound);
                out += 1;
            }
        } else if p2_in {
            output[out] = boundary_point(p1, p2, axis, bound);
            out += 1;
        }
    }
    out
}

/// Intersection of segment `p1..p2` with the line `axis == bound`.
///
/// Only called when the segment crosses the line, so the axis delta is
/// nonzero.
fn boundary_point(p1: Vec2, p2: Vec2, axis: Axis, bound: f32) -> Vec2 {
    let t = (bound - axis.of(p1)) / (axis.of(p2) - axis.of(p1));
    p1 + (p2 - p1) * t
}

/// Signed area of `poly` via a triangle fan anchored at `poly[0]`.
///
/// Positive when the polygon winds top-left, top-right, bottom-right,
/// bottom-left in screen space, which is the front-facing orientation of
/// the ad quad's corners. A back-facing projection comes out negative and
/// a degenerate one zero; callers treat anything non-positive as not
/// visible.
#[must_use]
pub fn fan_area(poly: &[Vec2]) -> f32 {
    if poly.len() < 3 {
        return 0.0;
    }
    let anchor = poly[0];
    let mut total = 0.0;
    for i in 0..poly.len() - 2 {
        let p1 = poly[i + 2] - anchor;
        let p2 = poly[i + 1] - anchor;
        total += (p1.x * p2.y - p1.y * p2.x) / 2.0;
    }
    total
}
