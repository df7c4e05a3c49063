//! Runtime: the per-frame loop that drives the simulation and hands state to a renderer.
//!
//! # Invariants
//! - One tick per frame, in fixed order: input snapshot, simulation step,
//!   telemetry, render.
//! - Delta time is never negative, NaN, or larger than the configured maximum.
//! - Time comes from an injectable [`Clock`]; nothing reads the wall clock directly.
//! - A stopped loop performs no further ticks.

mod clock;
mod config;
mod frame_loop;
mod script;
mod telemetry;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, ConfigError, LoopConfig};
pub use frame_loop::{FrameLoop, FrameReport, StopHandle};
pub use script::{InputScript, ScriptError, ScriptSegment};
pub use telemetry::{FrameTimer, LogSink, SpeedReadout, TelemetrySink};

pub fn crate_info() -> &'static str {
    concat!("hillrun-runtime v", env!("CARGO_PKG_VERSION"))
}
