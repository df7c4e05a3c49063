use std::fmt::Write;

use glam::{Mat4, Vec3};
use hillrun_common::CameraState;
use hillrun_kernel::Simulation;

use crate::scene::{NodeKind, Scene};

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Viewport width over height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        let camera = CameraState::default();
        Self {
            eye: camera.position,
            target: camera.look_at,
            fov_degrees: 60.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 5000.0,
        }
    }
}

impl RenderView {
    /// Take eye and target from the simulation's follow camera.
    pub fn follow(&mut self, camera: &CameraState) {
        self.eye = camera.position;
        self.target = camera.look_at;
    }

    /// Display size changed: recompute the projection aspect ratio.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
        tracing::debug!(width, height, aspect = self.aspect, "view resized");
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the static scene, the simulation state and a view, then
/// produces output. It never mutates the simulation.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, scene: &Scene, sim: &Simulation, view: &RenderView) -> Self::Output;
}

/// Text renderer for headless runs, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, sim: &Simulation, view: &RenderView) -> String {
        let mut out = String::new();
        let v = sim.vehicle();
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "=== Frame (tick={}, t={:.2}s) ===",
            sim.tick(),
            sim.elapsed()
        );
        let _ = writeln!(
            out,
            "Vehicle: pos=({:.2}, {:.2}, {:.2}) heading={:.3} speed={:.2}",
            v.position.x, v.position.y, v.position.z, v.heading, v.speed
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0} aspect={:.2}",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees,
            view.aspect
        );

        for item in scene.draw_list(sim) {
            let p = item.transform.transform_point3(Vec3::ZERO);
            let label = match item.kind {
                NodeKind::Terrain => "terrain".to_string(),
                NodeKind::Road => "road".to_string(),
                NodeKind::Body => "body".to_string(),
                NodeKind::Cabin => "cabin".to_string(),
                NodeKind::Wheel(i) => format!("wheel{i}"),
            };
            let _ = writeln!(
                out,
                "  [{label:<7}] tris={:<6} origin=({:.2}, {:.2}, {:.2})",
                item.mesh.triangle_count(),
                p.x,
                p.y,
                p.z
            );
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hillrun_input::{Control, InputState};
    use hillrun_terrain::TerrainConfig;

    fn small_scene() -> Scene {
        Scene::build(&TerrainConfig {
            rows: 2,
            cols: 2,
            ..TerrainConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn debug_renderer_initial_frame() {
        let scene = small_scene();
        let sim = Simulation::default();
        let output = DebugTextRenderer::new().render(&scene, &sim, &RenderView::default());

        assert!(output.contains("tick=0"));
        assert!(output.contains("speed=0.00"));
        assert!(output.contains("[terrain"));
        assert!(output.contains("[wheel3"));
    }

    #[test]
    fn debug_renderer_reports_motion() {
        let scene = small_scene();
        let mut sim = Simulation::default();
        for _ in 0..60 {
            sim.step(InputState::with(&[Control::Forward]), 1.0 / 60.0);
        }
        let mut view = RenderView::default();
        view.follow(sim.camera());
        let output = DebugTextRenderer::new().render(&scene, &sim, &view);
        assert!(output.contains("tick=60"));
        assert!(output.contains("speed=50.00"));
    }

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert_eq!(view.fov_degrees, 60.0);
        assert_eq!(view.near, 0.1);
        assert_eq!(view.far, 5000.0);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut view = RenderView::default();
        view.resize(800, 400);
        assert_eq!(view.aspect, 2.0);
        // Minimised windows report zero height.
        view.resize(800, 0);
        assert_eq!(view.aspect, 800.0);
    }

    #[test]
    fn follow_copies_camera() {
        let mut view = RenderView::default();
        let cam = CameraState {
            position: Vec3::new(1.0, 2.0, 3.0),
            look_at: Vec3::new(4.0, 5.0, 6.0),
        };
        view.follow(&cam);
        assert_eq!(view.eye, cam.position);
        assert_eq!(view.target, cam.look_at);
    }

    #[test]
    fn look_at_target_projects_to_screen_centre() {
        let mut view = RenderView::default();
        view.follow(&CameraState {
            position: Vec3::new(0.0, 10.0, 20.0),
            look_at: Vec3::new(0.0, 2.0, 0.0),
        });
        let clip = view.view_projection() * view.target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
