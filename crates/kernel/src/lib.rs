//! Simulation kernel: vehicle kinematics, follow camera, deterministic stepping.
//!
//! # Invariants
//! - A step is a pure function of the previous state, one input snapshot and `dt`.
//! - Speed stays in `[0, max_speed]` after every step.
//! - The camera moves by a convex blend toward its target; it never teleports.
//! - Every step is recorded so that replaying the log reproduces the state.

pub mod camera;
pub mod sim;
pub mod vehicle;

pub use camera::CameraRig;
pub use sim::{ReplayError, SimConfig, Simulation, TickRecord};
pub use vehicle::{VehicleModel, WheelSet};
