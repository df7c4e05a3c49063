//! Shared data model for the hillrun workspace.
//!
//! # Invariants
//! - Vehicle speed is a scalar in `[0, max_speed]`; heading is unbounded radians.
//! - The vehicle rides at a constant height; only x and z change while driving.

mod types;

pub use types::{CameraState, RIDE_HEIGHT, VehiclePose};
