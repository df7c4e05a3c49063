use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};
use hillrun_common::VehiclePose;
use hillrun_kernel::{Simulation, WheelSet};
use hillrun_terrain::{Mesh, Terrain, TerrainConfig, TerrainError};

/// What a draw item depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Terrain,
    Road,
    Body,
    Cabin,
    Wheel(usize),
}

/// One mesh placed in world space for this frame.
#[derive(Debug, Clone, Copy)]
pub struct DrawItem<'a> {
    pub kind: NodeKind,
    pub mesh: &'a Mesh,
    pub transform: Mat4,
}

/// Vehicle hierarchy: chassis and cabin fixed to the root, four wheels that
/// roll about their axles.
#[derive(Debug, Clone)]
pub struct VehicleRig {
    body: Mesh,
    cabin: Mesh,
    cabin_offset: Vec3,
    wheel: Mesh,
    wheel_mounts: [Vec3; WheelSet::COUNT],
}

impl Default for VehicleRig {
    fn default() -> Self {
        Self {
            body: Mesh::cuboid(Vec3::new(2.3, 0.6, 4.9)),
            cabin: Mesh::cuboid(Vec3::new(1.4, 0.7, 2.1)),
            cabin_offset: Vec3::new(0.0, 0.65, 0.0),
            wheel: Mesh::cylinder(0.42, 0.35, 28),
            wheel_mounts: [
                Vec3::new(1.15, -0.3, 1.7),
                Vec3::new(-1.15, -0.3, 1.7),
                Vec3::new(1.15, -0.3, -1.7),
                Vec3::new(-1.15, -0.3, -1.7),
            ],
        }
    }
}

impl VehicleRig {
    /// World transform of the vehicle root.
    pub fn root_transform(pose: &VehiclePose) -> Mat4 {
        Mat4::from_rotation_translation(pose.rotation(), pose.position)
    }

    /// Wheel transform relative to the vehicle root. The cylinder's axis is
    /// laid along x by a quarter turn about z, then rolled by `spin` about x.
    pub fn wheel_transform(&self, wheel: usize, spin: f32) -> Option<Mat4> {
        let mount = *self.wheel_mounts.get(wheel)?;
        Some(
            Mat4::from_translation(mount)
                * Mat4::from_rotation_x(spin)
                * Mat4::from_rotation_z(FRAC_PI_2),
        )
    }

    pub fn wheel_mounts(&self) -> &[Vec3; WheelSet::COUNT] {
        &self.wheel_mounts
    }

    pub fn body(&self) -> &Mesh {
        &self.body
    }

    pub fn cabin(&self) -> &Mesh {
        &self.cabin
    }

    pub fn wheel(&self) -> &Mesh {
        &self.wheel
    }
}

/// Static scene geometry, built once at startup.
#[derive(Debug, Clone)]
pub struct Scene {
    terrain: Terrain,
    vehicle: VehicleRig,
}

impl Scene {
    pub fn build(config: &TerrainConfig) -> Result<Self, TerrainError> {
        let terrain = Terrain::build(config)?;
        tracing::info!(
            terrain_vertices = terrain.surface().vertex_count(),
            "scene built"
        );
        Ok(Self {
            terrain,
            vehicle: VehicleRig::default(),
        })
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn vehicle(&self) -> &VehicleRig {
        &self.vehicle
    }

    /// Every mesh with its world transform for the current simulation state.
    pub fn draw_list(&self, sim: &Simulation) -> Vec<DrawItem<'_>> {
        let root = VehicleRig::root_transform(sim.vehicle());
        let mut items = Vec::with_capacity(4 + WheelSet::COUNT);
        items.push(DrawItem {
            kind: NodeKind::Terrain,
            mesh: self.terrain.surface(),
            transform: Mat4::IDENTITY,
        });
        items.push(DrawItem {
            kind: NodeKind::Road,
            mesh: self.terrain.road(),
            transform: Mat4::IDENTITY,
        });
        items.push(DrawItem {
            kind: NodeKind::Body,
            mesh: &self.vehicle.body,
            transform: root,
        });
        items.push(DrawItem {
            kind: NodeKind::Cabin,
            mesh: &self.vehicle.cabin,
            transform: root * Mat4::from_translation(self.vehicle.cabin_offset),
        });
        for (i, spin) in sim.wheels().angles().into_iter().enumerate() {
            if let Some(local) = self.vehicle.wheel_transform(i, spin) {
                items.push(DrawItem {
                    kind: NodeKind::Wheel(i),
                    mesh: &self.vehicle.wheel,
                    transform: root * local,
                });
            }
        }
        items
    }
}
