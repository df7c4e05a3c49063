use serde::{Deserialize, Serialize};

/// A logical driving control. Hosts map raw keys to these; the vehicle
/// model only ever sees controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    Forward,
    Back,
    Left,
    Right,
}

impl Control {
    pub const ALL: [Control; 4] = [Self::Forward, Self::Back, Self::Left, Self::Right];

    /// Map a textual key identifier to a control.
    ///
    /// Only single-character keys are considered, case-insensitively:
    /// `w` forward, `s` back, `a` left, `d` right.
    pub fn from_key(key: &str) -> Option<Self> {
        let mut chars = key.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        match c.to_ascii_lowercase() {
            'w' => Some(Self::Forward),
            's' => Some(Self::Back),
            'a' => Some(Self::Left),
            'd' => Some(Self::Right),
            _ => None,
        }
    }

    /// Canonical lowercase key for this control.
    pub fn key(self) -> char {
        match self {
            Self::Forward => 'w',
            Self::Back => 's',
            Self::Left => 'a',
            Self::Right => 'd',
        }
    }

    pub(crate) fn bit(self) -> u8 {
        match self {
            Self::Forward => 1 << 0,
            Self::Back => 1 << 1,
            Self::Left => 1 << 2,
            Self::Right => 1 << 3,
        }
    }
}
