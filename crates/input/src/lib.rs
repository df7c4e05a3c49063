//! Input: key identifiers mapped to four logical driving controls.
//!
//! # Invariants
//! - The simulation consumes an [`InputState`] snapshot, never raw key events.
//! - Unrecognised keys are ignored without error.
//! - Writers (event callbacks) and the reader (frame loop) only share an
//!   atomic bitmask; the reader takes one snapshot per tick.

mod channel;
mod control;
mod state;

pub use channel::InputChannel;
pub use control::Control;
pub use state::InputState;
