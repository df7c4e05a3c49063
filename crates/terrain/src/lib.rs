//! Terrain: a closed-form heightfield sampled once into static meshes.
//!
//! # Invariants
//! - Terrain and road meshes are built exactly once and never mutated.
//! - The height function is smooth and bounded by the sum of its amplitudes.
//! - The road ribbon sits at a fixed height above the ground plane.

mod heightfield;
mod mesh;

pub use heightfield::{HeightProfile, Heightfield};
pub use mesh::{Mesh, Vertex};

use serde::{Deserialize, Serialize};

/// Errors from terrain construction.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    #[error("terrain resolution must be at least 1x1 segments, got {rows}x{cols}")]
    ZeroResolution { rows: u32, cols: u32 },
    #[error("terrain half extent must be finite and positive, got {0}")]
    InvalidExtent(f32),
    #[error("road must have finite positive width and length, got {width}x{length}")]
    InvalidRoad { width: f32, length: f32 },
}

/// Terrain construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Half the side length of the square terrain domain.
    pub half_extent: f32,
    /// Segments along z.
    pub rows: u32,
    /// Segments along x.
    pub cols: u32,
    pub road_width: f32,
    pub road_length: f32,
    /// Height of the road ribbon above y = 0.
    pub road_height: f32,
    /// How many times the ground texture repeats across the domain.
    pub uv_repeat: f32,
    pub profile: HeightProfile,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            half_extent: 1500.0,
            rows: 240,
            cols: 240,
            road_width: 22.0,
            road_length: 3000.0,
            road_height: 0.8,
            uv_repeat: 60.0,
            profile: HeightProfile::default(),
        }
    }
}

/// Immutable terrain geometry: the sampled heightfield plus its render meshes.
#[derive(Debug, Clone)]
pub struct Terrain {
    heightfield: Heightfield,
    surface: Mesh,
    road: Mesh,
}

impl Terrain {
    /// Sample the heightfield and build the surface and road meshes.
    pub fn build(config: &TerrainConfig) -> Result<Self, TerrainError> {
        let _span = tracing::debug_span!("terrain_build").entered();

        if !(config.road_width.is_finite()
            && config.road_length.is_finite()
            && config.road_width > 0.0
            && config.road_length > 0.0)
        {
            return Err(TerrainError::InvalidRoad {
                width: config.road_width,
                length: config.road_length,
            });
        }

        let heightfield = Heightfield::generate(
            config.profile,
            config.half_extent,
            config.rows,
            config.cols,
        )?;
        let surface = Mesh::from_heightfield(&heightfield, config.uv_repeat);
        let road = Mesh::road(config.road_width, config.road_length, config.road_height);

        tracing::debug!(
            vertices = surface.vertex_count(),
            triangles = surface.triangle_count(),
            min_height = heightfield.min_height(),
            max_height = heightfield.max_height(),
            "terrain built"
        );

        Ok(Self {
            heightfield,
            surface,
            road,
        })
    }

    pub fn heightfield(&self) -> &Heightfield {
        &self.heightfield
    }

    pub fn surface(&self) -> &Mesh {
        &self.surface
    }

    pub fn road(&self) -> &Mesh {
        &self.road
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> TerrainConfig {
        TerrainConfig {
            rows: 8,
            cols: 8,
            ..TerrainConfig::default()
        }
    }

    #[test]
    fn default_config_matches_scene_constants() {
        let c = TerrainConfig::default();
        assert_eq!(c.half_extent, 1500.0);
        assert_eq!((c.rows, c.cols), (240, 240));
        assert_eq!(c.road_width, 22.0);
        assert_eq!(c.road_length, 3000.0);
        assert_eq!(c.road_height, 0.8);
    }

    #[test]
    fn build_produces_surface_and_road() {
        let t = Terrain::build(&small_config()).unwrap();
        assert_eq!(t.surface().vertex_count(), 81);
        assert_eq!(t.surface().triangle_count(), 128);
        assert_eq!(t.road().vertex_count(), 4);
        assert_eq!(t.heightfield().vertex_count(), 81);
    }

    #[test]
    fn road_lies_at_configured_height() {
        let t = Terrain::build(&small_config()).unwrap();
        for v in t.road().vertices() {
            assert_eq!(v.position[1], 0.8);
        }
    }

    #[test]
    fn rejects_degenerate_road() {
        let config = TerrainConfig {
            road_width: 0.0,
            ..small_config()
        };
        assert!(matches!(
            Terrain::build(&config),
            Err(TerrainError::InvalidRoad { .. })
        ));
    }

    #[test]
    fn rejects_zero_resolution() {
        let config = TerrainConfig {
            rows: 0,
            ..small_config()
        };
        assert!(matches!(
            Terrain::build(&config),
            Err(TerrainError::ZeroResolution { rows: 0, .. })
        ));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: TerrainConfig = serde_json::from_str(r#"{ "rows": 16 }"#).unwrap();
        assert_eq!(config.rows, 16);
        assert_eq!(config.cols, 240);
        assert_eq!(config.profile, HeightProfile::default());
    }
}
