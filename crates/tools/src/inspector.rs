use hillrun_kernel::Simulation;
use hillrun_terrain::Terrain;

/// Inspector for developer tooling.
///
/// Provides read-only summaries of simulation and terrain state for
/// debugging, CLI output and development UI.
pub struct SimInspector;

impl SimInspector {
    /// Produce a summary of the simulation state.
    pub fn summary(sim: &Simulation) -> SimSummary {
        let v = sim.vehicle();
        let c = sim.camera();
        SimSummary {
            tick: sim.tick(),
            elapsed: sim.elapsed(),
            position: v.position.to_array(),
            heading_degrees: v.heading.to_degrees(),
            speed: v.speed,
            camera_distance: c.position.distance(v.position),
            recorded_ticks: sim.records().len(),
            state_hash: sim.state_hash(),
        }
    }

    /// Produce a summary of the static terrain.
    pub fn terrain(terrain: &Terrain) -> TerrainSummary {
        let hf = terrain.heightfield();
        let (rows, cols) = hf.resolution();
        TerrainSummary {
            rows,
            cols,
            half_extent: hf.half_extent(),
            min_height: hf.min_height(),
            max_height: hf.max_height(),
            surface_vertices: terrain.surface().vertex_count(),
            surface_triangles: terrain.surface().triangle_count(),
            surface_bytes: terrain.surface().vertex_bytes().len()
                + terrain.surface().index_bytes().len(),
            road_triangles: terrain.road().triangle_count(),
        }
    }
}

/// Summary of simulation state for the inspector.
#[derive(Debug, Clone)]
pub struct SimSummary {
    pub tick: u64,
    pub elapsed: f64,
    pub position: [f32; 3],
    pub heading_degrees: f32,
    pub speed: f32,
    /// Distance from the camera eye to the vehicle root.
    pub camera_distance: f32,
    pub recorded_ticks: usize,
    pub state_hash: u64,
}

impl std::fmt::Display for SimSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sim: tick={} t={:.2}s pos=({:.2}, {:.2}, {:.2}) heading={:.1}deg speed={:.2} cam_dist={:.2} records={} hash={:#018x}",
            self.tick,
            self.elapsed,
            self.position[0],
            self.position[1],
            self.position[2],
            self.heading_degrees,
            self.speed,
            self.camera_distance,
            self.recorded_ticks,
            self.state_hash,
        )
    }
}

/// Summary of terrain geometry.
#[derive(Debug, Clone)]
pub struct TerrainSummary {
    pub rows: u32,
    pub cols: u32,
    pub half_extent: f32,
    pub min_height: f32,
    pub max_height: f32,
    pub surface_vertices: usize,
    pub surface_triangles: usize,
    /// Vertex plus index buffer size.
    pub surface_bytes: usize,
    pub road_triangles: usize,
}

impl std::fmt::Display for TerrainSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Terrain: {}x{} segments over +/-{:.0} heights=[{:.2}, {:.2}] vertices={} triangles={} bytes={} road_triangles={}",
            self.rows,
            self.cols,
            self.half_extent,
            self.min_height,
            self.max_height,
            self.surface_vertices,
            self.surface_triangles,
            self.surface_bytes,
            self.road_triangles,
        )
    }
}
