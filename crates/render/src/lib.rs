//! Rendering adapter: static scene, per-frame draw list, renderer interface.
//!
//! # Invariants
//! - Renderers read simulation state; they never mutate it.
//! - Scene geometry is built once; only transforms change per frame.
//! - The view's aspect ratio follows the display size; nothing else does.

mod renderer;
mod scene;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};
pub use scene::{DrawItem, NodeKind, Scene, VehicleRig};

pub fn crate_info() -> &'static str {
    concat!("hillrun-render v", env!("CARGO_PKG_VERSION"))
}
