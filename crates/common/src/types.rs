use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Height of the vehicle root above the ground plane.
pub const RIDE_HEIGHT: f32 = 1.4;

/// Vehicle pose: where the car is, which way it points, how fast it goes.
///
/// Heading 0 faces down the -Z axis; positive heading turns left (about +Y).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehiclePose {
    pub position: Vec3,
    /// Yaw in radians. Never wrapped; only its sine and cosine are consumed.
    pub heading: f32,
    pub speed: f32,
}

impl Default for VehiclePose {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, RIDE_HEIGHT, 0.0),
            heading: 0.0,
            speed: 0.0,
        }
    }
}

impl VehiclePose {
    /// A stationary pose at ride height over the given ground point.
    pub fn at(x: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, RIDE_HEIGHT, z),
            ..Self::default()
        }
    }

    /// Unit vector the vehicle travels along at positive speed.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(-self.heading.sin(), 0.0, -self.heading.cos())
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.heading)
    }
}

/// Follow camera state: eye position (smoothed) and look-at point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 8.0, 20.0),
            look_at: Vec3::ZERO,
        }
    }
}
