use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::{Control, InputState};

/// Shared input mapping written by host key callbacks and read once per tick.
///
/// Cloning yields another handle to the same state, so the event source and
/// the frame loop can each hold one, even across threads.
#[derive(Debug, Clone, Default)]
pub struct InputChannel {
    bits: Arc<AtomicU8>,
}

impl InputChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key-down/key-up. Unrecognised keys are ignored.
    pub fn set(&self, key: &str, pressed: bool) -> bool {
        match Control::from_key(key) {
            Some(control) => {
                self.set_control(control, pressed);
                true
            }
            None => {
                tracing::trace!(key, "ignoring unmapped key");
                false
            }
        }
    }

    pub fn set_control(&self, control: Control, pressed: bool) {
        if pressed {
            self.bits.fetch_or(control.bit(), Ordering::Release);
        } else {
            self.bits.fetch_and(!control.bit(), Ordering::Release);
        }
        tracing::trace!(?control, pressed, "control changed");
    }

    /// Replace the whole mapping at once (scripted drivers).
    pub fn store(&self, state: InputState) {
        self.bits.store(state.bits(), Ordering::Release);
    }

    /// Release every control, e.g. when the host window loses focus.
    pub fn clear(&self) {
        self.store(InputState::new());
    }

    /// Immutable copy of the current mapping for one tick.
    pub fn snapshot(&self) -> InputState {
        InputState::from_bits(self.bits.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let writer = InputChannel::new();
        let reader = writer.clone();
        writer.set("w", true);
        assert!(reader.snapshot().get(Control::Forward));
        writer.set("w", false);
        assert!(!reader.snapshot().get(Control::Forward));
    }

    #[test]
    fn snapshot_is_detached() {
        let ch = InputChannel::new();
        ch.set("a", true);
        let snap = ch.snapshot();
        ch.set("a", false);
        assert!(snap.get(Control::Left));
        assert!(!ch.snapshot().get(Control::Left));
    }

    #[test]
    fn unmapped_keys_leave_state_alone() {
        let ch = InputChannel::new();
        ch.set("d", true);
        assert!(!ch.set("Escape", true));
        assert_eq!(ch.snapshot(), InputState::with(&[Control::Right]));
    }

    #[test]
    fn store_and_clear() {
        let ch = InputChannel::new();
        ch.store(InputState::with(&[Control::Forward, Control::Left]));
        assert!(ch.snapshot().get(Control::Left));
        ch.clear();
        assert!(ch.snapshot().is_idle());
    }

    #[test]
    fn writes_from_another_thread_are_visible() {
        let ch = InputChannel::new();
        let writer = ch.clone();
        std::thread::spawn(move || {
            writer.set("s", true);
        })
        .join()
        .unwrap();
        assert!(ch.snapshot().get(Control::Back));
    }
}
