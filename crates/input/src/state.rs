use serde::{Deserialize, Serialize};

use crate::Control;

/// Pressed/released state of the four controls, packed into a byte.
///
/// `Copy` so that a tick works on an immutable snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputState(u8);

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot with exactly the given controls held.
    pub fn with(controls: &[Control]) -> Self {
        let mut state = Self::new();
        for &c in controls {
            state.set_control(c, true);
        }
        state
    }

    /// Apply a key event. Returns `false` (and changes nothing) for keys that
    /// do not map to a control.
    pub fn set(&mut self, key: &str, pressed: bool) -> bool {
        match Control::from_key(key) {
            Some(c) => {
                self.set_control(c, pressed);
                true
            }
            None => false,
        }
    }

    pub fn set_control(&mut self, control: Control, pressed: bool) {
        if pressed {
            self.0 |= control.bit();
        } else {
            self.0 &= !control.bit();
        }
    }

    pub fn get(&self, control: Control) -> bool {
        self.0 & control.bit() != 0
    }

    /// Pressed state of a textual key; unknown keys read as released.
    pub fn get_key(&self, key: &str) -> bool {
        Control::from_key(key).is_some_and(|c| self.get(c))
    }

    pub fn is_idle(&self) -> bool {
        self.0 == 0
    }

    /// Steering direction: `+1` left, `-1` right, `0` none. Left wins when
    /// both are held.
    pub fn steer(&self) -> f32 {
        if self.get(Control::Left) {
            1.0
        } else if self.get(Control::Right) {
            -1.0
        } else {
            0.0
        }
    }

    pub(crate) fn from_bits(bits: u8) -> Self {
        Self(bits & 0b1111)
    }

    pub(crate) fn bits(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for InputState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_idle() {
            return f.write_str("-");
        }
        for c in Control::ALL {
            if self.get(c) {
                write!(f, "{}", c.key())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_released() {
        let s = InputState::new();
        for c in Control::ALL {
            assert!(!s.get(c));
        }
        assert!(s.is_idle());
    }

    #[test]
    fn set_and_release_by_key() {
        let mut s = InputState::new();
        assert!(s.set("W", true));
        assert!(s.get(Control::Forward));
        assert!(s.get_key("w"));
        assert!(s.set("w", false));
        assert!(!s.get(Control::Forward));
    }

    #[test]
    fn unknown_key_is_noop() {
        let mut s = InputState::with(&[Control::Left]);
        let before = s;
        assert!(!s.set("Shift", true));
        assert!(!s.set("x", true));
        assert_eq!(s, before);
        assert!(!s.get_key("x"));
    }

    #[test]
    fn steer_prefers_left() {
        assert_eq!(InputState::with(&[Control::Left]).steer(), 1.0);
        assert_eq!(InputState::with(&[Control::Right]).steer(), -1.0);
        assert_eq!(InputState::with(&[Control::Left, Control::Right]).steer(), 1.0);
        assert_eq!(InputState::new().steer(), 0.0);
    }

    #[test]
    fn display_lists_held_keys() {
        assert_eq!(InputState::new().to_string(), "-");
        assert_eq!(
            InputState::with(&[Control::Forward, Control::Left]).to_string(),
            "wa"
        );
    }

    #[test]
    fn serializes_as_bitmask() {
        let s = InputState::with(&[Control::Forward, Control::Right]);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "9");
        let back: InputState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
