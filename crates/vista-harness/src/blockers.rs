// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Sphere occluders answering line-of-sight queries.

use std::f32::consts::TAU;

use glam::Vec3;
use vista_core::OcclusionPort;

/// A solid sphere occluder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Center in world space.
    pub center: Vec3,
    /// Radius in world units.
    pub radius: f32,
}

impl Sphere {
    /// Whether the closed segment `from..=to` passes through this
    /// sphere. A degenerate segment counts as blocked when its point
    /// lies inside.
    #[must_use]
    pub fn blocks_segment(&self, from: Vec3, to: Vec3) -> bool {
        let dir = to - from;
        let offset = from - self.center;
        let a = dir.dot(dir);
        let c = offset.dot(offset) - self.radius * self.radius;
        if a <= f32::EPSILON {
            return c <= 0.0;
        }
        let b = 2.0 * offset.dot(dir);
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return false;
        }
        let sqrt_d = discriminant.sqrt();
        let t_enter = (-b - sqrt_d) / (2.0 * a);
        let t_exit = (-b + sqrt_d) / (2.0 * a);
        // Blocked when the hit interval overlaps the segment at all.
        t_enter <= 1.0 && t_exit >= 0.0
    }
}

/// A set of sphere occluders implementing [`OcclusionPort`].
#[derive(Debug, Clone, Default)]
pub struct SphereField {
    spheres: Vec<Sphere>,
}

impl SphereField {
    /// Wraps an explicit set of spheres.
    #[must_use]
    pub fn new(spheres: Vec<Sphere>) -> Self {
        Self { spheres }
    }

    /// `count` spheres of `sphere_radius` evenly spaced on a horizontal
    /// ring of `ring_radius` around the origin, starting at `phase`
    /// radians. Rebuild with an advancing phase to spin the ring.
    #[must_use]
    pub fn ring(count: usize, ring_radius: f32, sphere_radius: f32, phase: f32) -> Self {
        let spheres = (0..count)
            .map(|i| {
                let angle = phase + TAU * i as f32 / count as f32;
                Sphere {
                    center: Vec3::new(ring_radius * angle.cos(), 0.0, ring_radius * angle.sin()),
                    radius: sphere_radius,
                }
            })
            .collect();
        Self { spheres }
    }

    /// The spheres in this field.
    #[must_use]
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }
}

impl OcclusionPort for SphereField {
    fn line_blocked(&self, from: Vec3, to: Vec3) -> bool {
        self.spheres
            .iter()
            .any(|sphere| sphere.blocks_segment(from, to))
    }
}
