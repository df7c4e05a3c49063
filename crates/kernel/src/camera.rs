use glam::Vec3;
use hillrun_common::{CameraState, VehiclePose};
use serde::{Deserialize, Serialize};

/// Chase-camera rig: trails behind and above the vehicle, eased by a
/// per-frame exponential filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraRig {
    /// Horizontal distance behind the vehicle.
    pub distance: f32,
    /// Height above the vehicle root.
    pub height: f32,
    /// Fraction of the remaining gap closed each frame, in `(0, 1]`.
    pub smoothing: f32,
    /// The camera aims this far above the vehicle root.
    pub look_height: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            distance: 18.0,
            height: 8.0,
            smoothing: 0.06,
            look_height: 2.0,
        }
    }
}

impl CameraRig {
    /// Where the camera would sit with no smoothing.
    pub fn target(&self, pose: &VehiclePose) -> Vec3 {
        pose.position
            + Vec3::new(
                pose.heading.sin() * self.distance,
                self.height,
                pose.heading.cos() * self.distance,
            )
    }

    /// Point the camera aims at. Not smoothed.
    pub fn look_at(&self, pose: &VehiclePose) -> Vec3 {
        pose.position + Vec3::Y * self.look_height
    }

    /// One frame of tracking: blend the eye toward the target, re-aim at the car.
    pub fn advance(&self, camera: &CameraState, pose: &VehiclePose) -> CameraState {
        let target = self.target(pose);
        let t = self.smoothing.clamp(0.0, 1.0);
        CameraState {
            position: camera.position + (target - camera.position) * t,
            look_at: self.look_at(pose),
        }
    }
}
