use std::path::{Path, PathBuf};

use hillrun_kernel::SimConfig;
use hillrun_terrain::TerrainConfig;
use serde::{Deserialize, Serialize};

/// Errors from loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("frame.max_dt must be finite and positive, got {0}")]
    InvalidMaxDt(f32),
    #[error("sim.vehicle.max_speed must be finite and non-negative, got {0}")]
    InvalidMaxSpeed(f32),
    #[error("sim.vehicle.steer_falloff_speed must be finite and positive, got {0}")]
    InvalidSteerFalloff(f32),
    #[error("sim.vehicle.{field} must be finite, got {value}")]
    NonFiniteVehicleParam { field: &'static str, value: f32 },
    #[error("sim.camera.smoothing must be finite, got {0}")]
    InvalidSmoothing(f32),
}

/// Frame loop policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Longest step the simulation will take in one frame, in seconds.
    /// Longer frames (a stalled or backgrounded host) are clamped to this.
    pub max_dt: f32,
    /// Number of recent frame times kept for statistics.
    pub timer_window: usize,
    /// Keep the simulation's tick log for replay. Long-running interactive
    /// hosts turn this off so the log does not grow without bound.
    pub retain_records: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_dt: 0.1,
            timer_window: 120,
            retain_records: true,
        }
    }
}

impl LoopConfig {
    /// Map a raw frame delta to one that is safe to integrate:
    /// NaN, zero and negative become 0, anything above `max_dt` becomes `max_dt`.
    pub fn clamp_dt(&self, raw: f32) -> f32 {
        if raw.is_nan() || raw <= 0.0 {
            0.0
        } else {
            raw.min(self.effective_max_dt())
        }
    }

    /// `max_dt`, or the default cap when it is not finite and positive.
    pub fn effective_max_dt(&self) -> f32 {
        if self.max_dt.is_finite() && self.max_dt > 0.0 {
            self.max_dt
        } else {
            Self::default().max_dt
        }
    }
}

/// Complete application configuration, loadable from a JSON file. Any
/// section or field may be omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub terrain: TerrainConfig,
    pub sim: SimConfig,
    pub frame: LoopConfig,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let max_dt = self.frame.max_dt;
        if !max_dt.is_finite() || max_dt <= 0.0 {
            return Err(ConfigError::InvalidMaxDt(max_dt));
        }

        let vehicle = &self.sim.vehicle;
        if !vehicle.max_speed.is_finite() || vehicle.max_speed < 0.0 {
            return Err(ConfigError::InvalidMaxSpeed(vehicle.max_speed));
        }
        if !vehicle.steer_falloff_speed.is_finite() || vehicle.steer_falloff_speed <= 0.0 {
            return Err(ConfigError::InvalidSteerFalloff(vehicle.steer_falloff_speed));
        }
        for (field, value) in [
            ("forward_accel", vehicle.forward_accel),
            ("brake_decel", vehicle.brake_decel),
            ("drag_decel", vehicle.drag_decel),
            ("min_steer_speed", vehicle.min_steer_speed),
            ("wheel_spin_rate", vehicle.wheel_spin_rate),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteVehicleParam { field, value });
            }
        }

        let smoothing = self.sim.camera.smoothing;
        if !smoothing.is_finite() {
            return Err(ConfigError::InvalidSmoothing(smoothing));
        }
        Ok(())
    }
}
