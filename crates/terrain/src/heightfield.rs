use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::TerrainError;

/// Closed-form rolling-hills profile:
/// `h(x, z) = a1 sin(x f1) + a2 cos(z f2) + a3 sin((x + z) f3)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightProfile {
    pub a1: f32,
    pub f1: f32,
    pub a2: f32,
    pub f2: f32,
    pub a3: f32,
    pub f3: f32,
}

impl Default for HeightProfile {
    fn default() -> Self {
        Self {
            a1: 40.0,
            f1: 0.003,
            a2: 35.0,
            f2: 0.004,
            a3: 20.0,
            f3: 0.002,
        }
    }
}

impl HeightProfile {
    /// Elevation at planar point (x, z).
    #[inline]
    pub fn height(&self, x: f32, z: f32) -> f32 {
        self.a1 * (x * self.f1).sin()
            + self.a2 * (z * self.f2).cos()
            + self.a3 * ((x + z) * self.f3).sin()
    }

    /// Upper bound on `|height|` anywhere in the plane.
    pub fn amplitude_bound(&self) -> f32 {
        self.a1.abs() + self.a2.abs() + self.a3.abs()
    }
}

/// Regular grid of elevation samples over `[-half_extent, half_extent]^2`.
///
/// Samples are row-major: `rows + 1` rows along z, `cols + 1` columns along x.
#[derive(Debug, Clone)]
pub struct Heightfield {
    half_extent: f32,
    rows: u32,
    cols: u32,
    heights: Vec<f32>,
    min_y: f32,
    max_y: f32,
}

impl Heightfield {
    /// Sample `profile` on a `rows x cols` segment grid.
    pub fn generate(
        profile: HeightProfile,
        half_extent: f32,
        rows: u32,
        cols: u32,
    ) -> Result<Self, TerrainError> {
        if rows == 0 || cols == 0 {
            return Err(TerrainError::ZeroResolution { rows, cols });
        }
        if !half_extent.is_finite() || half_extent <= 0.0 {
            return Err(TerrainError::InvalidExtent(half_extent));
        }

        let stride = cols as usize + 1;
        let mut heights = Vec::with_capacity(stride * (rows as usize + 1));
        let (mut min_y, mut max_y) = (f32::INFINITY, f32::NEG_INFINITY);
        for row in 0..=rows {
            let z = axis_coord(row, rows, half_extent);
            for col in 0..=cols {
                let x = axis_coord(col, cols, half_extent);
                let h = profile.height(x, z);
                min_y = min_y.min(h);
                max_y = max_y.max(h);
                heights.push(h);
            }
        }

        Ok(Self {
            half_extent,
            rows,
            cols,
            heights,
            min_y,
            max_y,
        })
    }

    pub fn half_extent(&self) -> f32 {
        self.half_extent
    }

    /// Segment counts as `(rows, cols)`.
    pub fn resolution(&self) -> (u32, u32) {
        (self.rows, self.cols)
    }

    pub fn vertex_count(&self) -> usize {
        self.heights.len()
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn min_height(&self) -> f32 {
        self.min_y
    }

    pub fn max_height(&self) -> f32 {
        self.max_y
    }

    /// Stored sample at grid `(row, col)`, if in range.
    pub fn height_at(&self, row: u32, col: u32) -> Option<f32> {
        if row > self.rows || col > self.cols {
            return None;
        }
        Some(self.heights[self.idx(row, col)])
    }

    /// World-space position of grid vertex `(row, col)`.
    pub fn vertex_position(&self, row: u32, col: u32) -> Vec3 {
        Vec3::new(
            axis_coord(col, self.cols, self.half_extent),
            self.heights[self.idx(row, col)],
            axis_coord(row, self.rows, self.half_extent),
        )
    }

    /// Bilinear height at planar (x, z), clamped to the domain edge.
    pub fn sample(&self, x: f32, z: f32) -> f32 {
        let span = 2.0 * self.half_extent;
        let fx = ((x + self.half_extent) / span * self.cols as f32).clamp(0.0, self.cols as f32);
        let fz = ((z + self.half_extent) / span * self.rows as f32).clamp(0.0, self.rows as f32);
        let c0 = (fx.floor() as u32).min(self.cols - 1);
        let r0 = (fz.floor() as u32).min(self.rows - 1);
        let tx = fx - c0 as f32;
        let tz = fz - r0 as f32;

        let h00 = self.heights[self.idx(r0, c0)];
        let h01 = self.heights[self.idx(r0, c0 + 1)];
        let h10 = self.heights[self.idx(r0 + 1, c0)];
        let h11 = self.heights[self.idx(r0 + 1, c0 + 1)];
        let a = h00 * (1.0 - tx) + h01 * tx;
        let b = h10 * (1.0 - tx) + h11 * tx;
        a * (1.0 - tz) + b * tz
    }

    #[inline]
    fn idx(&self, row: u32, col: u32) -> usize {
        row as usize * (self.cols as usize + 1) + col as usize
    }
}

#[inline]
fn axis_coord(i: u32, segments: u32, half_extent: f32) -> f32 {
    -half_extent + 2.0 * half_extent * (i as f32 / segments as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn origin_sample_is_cosine_term() {
        // sin terms vanish at the origin; cos(0) leaves the second amplitude.
        let p = HeightProfile::default();
        assert_eq!(p.height(0.0, 0.0), 35.0);
    }

    #[test]
    fn profile_is_bounded() {
        let p = HeightProfile::default();
        assert_eq!(p.amplitude_bound(), 95.0);
        let mut x = -5000.0;
        while x <= 5000.0 {
            let mut z = -5000.0;
            while z <= 5000.0 {
                assert!(p.height(x, z).abs() <= 95.0 + 1e-3);
                z += 37.0;
            }
            x += 41.0;
        }
    }

    #[test]
    fn profile_matches_closed_form() {
        let p = HeightProfile::default();
        let (x, z) = (250.0_f32, -410.0_f32);
        let expected =
            40.0 * (x * 0.003).sin() + 35.0 * (z * 0.004).cos() + 20.0 * ((x + z) * 0.002).sin();
        assert!(approx(p.height(x, z), expected, 1e-4));
    }

    #[test]
    fn grid_dimensions() {
        let hf = Heightfield::generate(HeightProfile::default(), 100.0, 4, 6).unwrap();
        assert_eq!(hf.resolution(), (4, 6));
        assert_eq!(hf.vertex_count(), 5 * 7);
        assert!(hf.height_at(4, 6).is_some());
        assert!(hf.height_at(5, 0).is_none());
    }

    #[test]
    fn corners_span_the_domain() {
        let hf = Heightfield::generate(HeightProfile::default(), 100.0, 4, 4).unwrap();
        let first = hf.vertex_position(0, 0);
        let last = hf.vertex_position(4, 4);
        assert_eq!((first.x, first.z), (-100.0, -100.0));
        assert_eq!((last.x, last.z), (100.0, 100.0));
    }

    #[test]
    fn samples_match_profile_at_vertices() {
        let p = HeightProfile::default();
        let hf = Heightfield::generate(p, 1500.0, 10, 10).unwrap();
        for row in 0..=10 {
            for col in 0..=10 {
                let v = hf.vertex_position(row, col);
                assert!(approx(v.y, p.height(v.x, v.z), 1e-4));
                assert!(approx(hf.sample(v.x, v.z), v.y, 1e-3));
            }
        }
    }

    #[test]
    fn min_max_track_samples() {
        let hf = Heightfield::generate(HeightProfile::default(), 1500.0, 32, 32).unwrap();
        for &h in hf.heights() {
            assert!(h >= hf.min_height() && h <= hf.max_height());
        }
        assert!(hf.min_height() >= -95.0 && hf.max_height() <= 95.0);
    }

    #[test]
    fn sample_clamps_outside_domain() {
        let hf = Heightfield::generate(HeightProfile::default(), 100.0, 4, 4).unwrap();
        let edge = hf.vertex_position(4, 4).y;
        assert!(approx(hf.sample(1.0e6, 1.0e6), edge, 1e-4));
    }

    #[test]
    fn rejects_bad_extent() {
        let err = Heightfield::generate(HeightProfile::default(), -1.0, 4, 4).unwrap_err();
        assert!(matches!(err, TerrainError::InvalidExtent(_)));
        let err = Heightfield::generate(HeightProfile::default(), f32::NAN, 4, 4).unwrap_err();
        assert!(matches!(err, TerrainError::InvalidExtent(_)));
    }
}
