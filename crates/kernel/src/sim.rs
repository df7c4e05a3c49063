use hillrun_common::{CameraState, VehiclePose};
use hillrun_input::InputState;
use serde::{Deserialize, Serialize};

use crate::{CameraRig, VehicleModel, WheelSet};

/// Tunables for one simulation instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub vehicle: VehicleModel,
    pub camera: CameraRig,
    /// Pose at tick 0.
    pub start: VehiclePose,
}

/// Everything one step consumed. The log of these is enough to replay a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    /// Tick number this step produced (first step is 1).
    pub tick: u64,
    pub input: InputState,
    pub dt: f32,
}

/// Errors from replaying a tick log.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("tick log is not contiguous: expected tick {expected}, found {found}")]
    Gap { expected: u64, found: u64 },
}

/// The authoritative simulation state.
///
/// Owned by the frame loop; renderers and tools only read it. Every mutation
/// goes through [`Simulation::step`], which also appends a [`TickRecord`] so
/// that a run can be reproduced bit-for-bit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    config: SimConfig,
    vehicle: VehiclePose,
    camera: CameraState,
    wheels: WheelSet,
    tick: u64,
    /// Simulated seconds, summed from step deltas.
    elapsed: f64,
    #[serde(skip)]
    log: Vec<TickRecord>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            vehicle: config.start,
            camera: CameraState::default(),
            wheels: WheelSet::default(),
            tick: 0,
            elapsed: 0.0,
            log: Vec::new(),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn vehicle(&self) -> &VehiclePose {
        &self.vehicle
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn wheels(&self) -> &WheelSet {
        &self.wheels
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Read-only access to the tick log.
    pub fn records(&self) -> &[TickRecord] {
        &self.log
    }

    /// Drain and return the tick log.
    pub fn drain_records(&mut self) -> Vec<TickRecord> {
        std::mem::take(&mut self.log)
    }

    /// Advance one tick: vehicle, wheels, then camera.
    pub fn step(&mut self, input: InputState, dt: f32) {
        self.vehicle = self.config.vehicle.advance(&self.vehicle, input, dt);
        self.wheels
            .roll(self.vehicle.speed, dt, self.config.vehicle.wheel_spin_rate);
        self.camera = self.config.camera.advance(&self.camera, &self.vehicle);

        self.tick += 1;
        self.elapsed += f64::from(dt);
        self.log.push(TickRecord {
            tick: self.tick,
            input,
            dt,
        });

        tracing::trace!(
            tick = self.tick,
            speed = self.vehicle.speed,
            heading = self.vehicle.heading,
            %input,
            "simulation stepped"
        );
    }

    /// Re-run `records` on top of the current state. Ticks must continue
    /// exactly from the current tick.
    pub fn apply(&mut self, records: &[TickRecord]) -> Result<(), ReplayError> {
        for record in records {
            let expected = self.tick + 1;
            if record.tick != expected {
                return Err(ReplayError::Gap {
                    expected,
                    found: record.tick,
                });
            }
            self.step(record.input, record.dt);
        }
        Ok(())
    }

    /// Reconstruct a run from its configuration and tick log.
    pub fn replay(config: SimConfig, records: &[TickRecord]) -> Result<Self, ReplayError> {
        let mut sim = Self::new(config);
        sim.apply(records)?;
        Ok(sim)
    }

    /// Deterministic FNV-1a digest of the dynamic state, for cheap comparison.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mut mix = |bytes: &[u8]| {
            for &b in bytes {
                h ^= b as u64;
                h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&self.tick.to_le_bytes());
        mix(&self.elapsed.to_le_bytes());
        let v = &self.vehicle;
        for f in [v.position.x, v.position.y, v.position.z, v.heading, v.speed] {
            mix(&f.to_le_bytes());
        }
        for p in [self.camera.position, self.camera.look_at] {
            for f in p.to_array() {
                mix(&f.to_le_bytes());
            }
        }
        for f in self.wheels.angles() {
            mix(&f.to_le_bytes());
        }
        h
    }
}
