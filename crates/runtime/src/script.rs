use std::num::ParseIntError;
use std::str::FromStr;

use hillrun_input::{Control, InputState};

/// Errors from parsing an input script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("input script is empty")]
    Empty,
    #[error("segment {segment:?} is missing a '*<ticks>' count")]
    MissingCount { segment: String },
    #[error("segment {segment:?} has an invalid tick count: {source}")]
    BadCount {
        segment: String,
        #[source]
        source: ParseIntError,
    },
    #[error("segment {segment:?} holds for zero ticks")]
    ZeroTicks { segment: String },
    #[error("segment {segment:?} uses unknown key {key:?}")]
    UnknownKey { segment: String, key: char },
    #[error("segment {segment:?} pushes the script past {} ticks", u64::MAX)]
    TooLong { segment: String },
}

/// Hold `input` for `ticks` consecutive frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptSegment {
    pub input: InputState,
    pub ticks: u64,
}

/// A key schedule for headless drives, written as comma-separated
/// `<keys>*<ticks>` segments: `"w*120,wa*60,*30,s*45"`. An empty key list
/// (or `-`) means nothing held. The total length always fits in a `u64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputScript {
    segments: Vec<ScriptSegment>,
}

impl InputScript {
    pub fn segments(&self) -> &[ScriptSegment] {
        &self.segments
    }

    pub fn total_ticks(&self) -> u64 {
        self.segments.iter().map(|s| s.ticks).sum()
    }

    /// Input held on zero-based frame `frame`, or `None` past the end.
    pub fn input_at(&self, frame: u64) -> Option<InputState> {
        let mut start = 0;
        for seg in &self.segments {
            if frame < start + seg.ticks {
                return Some(seg.input);
            }
            start += seg.ticks;
        }
        None
    }

    /// One input per frame, in order.
    pub fn frames(&self) -> impl Iterator<Item = InputState> + '_ {
        self.segments
            .iter()
            .flat_map(|s| std::iter::repeat_n(s.input, s.ticks as usize))
    }
}

impl FromStr for InputScript {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = Vec::new();
        let mut total: u64 = 0;
        for raw in s.split(',') {
            let segment = raw.trim();
            if segment.is_empty() {
                continue;
            }
            let (keys, count) = segment
                .split_once('*')
                .ok_or_else(|| ScriptError::MissingCount {
                    segment: segment.to_string(),
                })?;
            let ticks: u64 = count.trim().parse().map_err(|source| ScriptError::BadCount {
                segment: segment.to_string(),
                source,
            })?;
            if ticks == 0 {
                return Err(ScriptError::ZeroTicks {
                    segment: segment.to_string(),
                });
            }
            total = total.checked_add(ticks).ok_or_else(|| ScriptError::TooLong {
                segment: segment.to_string(),
            })?;

            let mut input = InputState::new();
            for key in keys.trim().chars().filter(|&c| c != '-') {
                let control = Control::from_key(key.encode_utf8(&mut [0; 4])).ok_or_else(|| {
                    ScriptError::UnknownKey {
                        segment: segment.to_string(),
                        key,
                    }
                })?;
                input.set_control(control, true);
            }
            segments.push(ScriptSegment { input, ticks });
        }

        if segments.is_empty() {
            return Err(ScriptError::Empty);
        }
        Ok(Self { segments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_segments() {
        let script: InputScript = "w*120, wa*60, *30, S*45".parse().unwrap();
        assert_eq!(script.segments().len(), 4);
        assert_eq!(script.total_ticks(), 255);
        assert_eq!(
            script.segments()[1].input,
            InputState::with(&[Control::Forward, Control::Left])
        );
        assert!(script.segments()[2].input.is_idle());
        assert_eq!(
            script.segments()[3].input,
            InputState::with(&[Control::Back])
        );
    }

    #[test]
    fn dash_means_idle() {
        let script: InputScript = "-*10".parse().unwrap();
        assert!(script.segments()[0].input.is_idle());
    }

    #[test]
    fn input_at_walks_segments() {
        let script: InputScript = "w*2,d*3".parse().unwrap();
        let fwd = InputState::with(&[Control::Forward]);
        let right = InputState::with(&[Control::Right]);
        assert_eq!(script.input_at(0), Some(fwd));
        assert_eq!(script.input_at(1), Some(fwd));
        assert_eq!(script.input_at(2), Some(right));
        assert_eq!(script.input_at(4), Some(right));
        assert_eq!(script.input_at(5), None);
    }

    #[test]
    fn frames_expand_in_order() {
        let script: InputScript = "w*2,*1".parse().unwrap();
        let frames: Vec<InputState> = script.frames().collect();
        assert_eq!(frames.len(), 3);
        assert!(frames[0].get(Control::Forward));
        assert!(frames[2].is_idle());
    }

    #[test]
    fn rejects_scripts_longer_than_u64() {
        let err = "w*18446744073709551615,w*1".parse::<InputScript>().unwrap_err();
        assert!(matches!(err, ScriptError::TooLong { ref segment } if segment == "w*1"));
    }

    #[test]
    fn longest_script_still_indexes() {
        let script: InputScript = "w*18446744073709551614,s*1".parse().unwrap();
        assert_eq!(script.total_ticks(), u64::MAX);
        assert_eq!(script.input_at(u64::MAX - 1), Some(InputState::with(&[Control::Back])));
        assert_eq!(script.input_at(u64::MAX), None);
    }

    #[test]
    fn rejects_malformed_scripts() {
        assert!(matches!("".parse::<InputScript>(), Err(ScriptError::Empty)));
        assert!(matches!(" , ".parse::<InputScript>(), Err(ScriptError::Empty)));
        assert!(matches!(
            "w".parse::<InputScript>(),
            Err(ScriptError::MissingCount { .. })
        ));
        assert!(matches!(
            "w*x".parse::<InputScript>(),
            Err(ScriptError::BadCount { .. })
        ));
        assert!(matches!(
            "w*0".parse::<InputScript>(),
            Err(ScriptError::ZeroTicks { .. })
        ));
        assert!(matches!(
            "wq*5".parse::<InputScript>(),
            Err(ScriptError::UnknownKey { key: 'q', .. })
        ));
    }
}
