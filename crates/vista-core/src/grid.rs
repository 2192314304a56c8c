// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Occlusion sampling grid for an ad quad.

use glam::Vec3;

use crate::pose::QuadPose;
use crate::port::OcclusionPort;

/// Fixed grid of local-space sample points across the unit ad quad.
///
/// Points sit at cell centers, columns varying fastest, on the quad's
/// plane (`z = 0`) inside `[-0.5, 0.5]` on both axes. The occluded share
/// of the quad is estimated as the fraction of points whose line of sight
/// to the camera is blocked, so the estimate is uniform per point rather
/// than weighted by each point's visible area. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct OccluderGrid {
    points: Vec<Vec3>,
}

impl OccluderGrid {
    /// Default column count.
    pub const DEFAULT_COLUMNS: usize = 4;
    /// Default row count.
    pub const DEFAULT_ROWS: usize = 3;

    /// Builds a `columns` by `rows` grid of cell-center sample points.
    ///
    /// # Panics
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(columns: usize, rows: usize) -> Self {
        assert!(
            columns > 0 && rows > 0,
            "OccluderGrid requires at least one column and one row"
        );
        let x_step = 1.0 / columns as f32;
        let y_step = 1.0 / rows as f32;
        let mut points = Vec::with_capacity(columns * rows);
        for y in 0..rows {
            for x in 0..columns {
                points.push(Vec3::new(
                    x as f32 * x_step + x_step * 0.5 - 0.5,
                    y as f32 * y_step + y_step * 0.5 - 0.5,
                    0.0,
                ));
            }
        }
        Self { points }
    }

    /// Number of sample points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the grid has no sample points. Never true for a
    /// constructed grid; present for API completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The local-space sample points, columns fastest.
    #[must_use]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Counts sample points whose line of sight from `eye` is blocked.
    ///
    /// Each point is carried into world space through `pose` before the
    /// query. The quad itself must be excluded from `occlusion`'s
    /// geometry set or every sample reports blocked.
    #[must_use]
    pub fn count_blocked(
        &self,
        pose: &QuadPose,
        eye: Vec3,
        occlusion: &dyn OcclusionPort,
    ) -> usize {
        self.points
            .iter()
            .filter(|p| occlusion.line_blocked(eye, pose.transform_point(**p)))
            .count()
    }
}

impl Default for OccluderGrid {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COLUMNS, Self::DEFAULT_ROWS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_grid_is_twelve_cell_centers() {
        let grid = OccluderGrid::default();
        assert_eq!(grid.len(), 12);
        // First point: leftmost column, bottom row.
        let first = grid.points()[0];
        assert_relative_eq!(first.x, -0.375);
        assert_relative_eq!(first.y, -1.0 / 3.0, epsilon = 1e-6);
        assert_relative_eq!(first.z, 0.0);
        // Columns vary fastest.
        let second = grid.points()[1];
        assert_relative_eq!(second.x, -0.125);
        assert_relative_eq!(second.y, first.y, epsilon = 1e-6);
    }

    #[test]
    fn points_stay_inside_the_unit_quad() {
        let grid = OccluderGrid::new(7, 5);
        assert_eq!(grid.len(), 35);
        for p in grid.points() {
            assert!(p.x > -0.5 && p.x < 0.5);
            assert!(p.y > -0.5 && p.y < 0.5);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn single_cell_grid_samples_the_quad_center() {
        let grid = OccluderGrid::new(1, 1);
        assert_eq!(grid.points(), &[Vec3::ZERO]);
    }
}
