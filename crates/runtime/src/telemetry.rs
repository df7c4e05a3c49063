use std::collections::VecDeque;

/// Speed as shown to the driver: rounded to a whole number, at least two digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpeedReadout(u32);

impl SpeedReadout {
    pub fn from_speed(speed: f32) -> Self {
        // `as` saturates: NaN and negatives read as 0.
        Self(speed.round() as u32)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SpeedReadout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// Observer of per-frame telemetry. Purely a consumer; nothing flows back
/// into the simulation.
pub trait TelemetrySink {
    fn publish(&mut self, readout: SpeedReadout);
}

impl<F: FnMut(SpeedReadout)> TelemetrySink for F {
    fn publish(&mut self, readout: SpeedReadout) {
        self(readout)
    }
}

/// Sink that emits each readout as a `tracing` event, only when it changes.
#[derive(Debug, Default)]
pub struct LogSink {
    last: Option<SpeedReadout>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TelemetrySink for LogSink {
    fn publish(&mut self, readout: SpeedReadout) {
        if self.last != Some(readout) {
            tracing::debug!(speed = %readout, "speed");
            self.last = Some(readout);
        }
    }
}

/// Statistics over the frame deltas the loop actually integrated.
///
/// Keeps the most recent `capacity` non-zero deltas (a stalled clock or the
/// unprimed first frame carries no timing information) plus lifetime counts
/// of frames and of frames whose delta was clamped.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    recent: VecDeque<f32>,
    capacity: usize,
    frames: u64,
    clamped: u64,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            recent: VecDeque::with_capacity(capacity),
            capacity,
            frames: 0,
            clamped: 0,
        }
    }

    /// Record one frame's integrated delta in seconds.
    pub fn record(&mut self, dt: f32, clamped: bool) {
        self.frames += 1;
        if clamped {
            self.clamped += 1;
        }
        if dt > 0.0 {
            if self.recent.len() == self.capacity {
                self.recent.pop_front();
            }
            self.recent.push_back(dt);
        }
    }

    /// Mean of the recent deltas, in seconds.
    pub fn average(&self) -> f32 {
        if self.recent.is_empty() {
            return 0.0;
        }
        self.recent.iter().sum::<f32>() / self.recent.len() as f32
    }

    pub fn max(&self) -> f32 {
        self.recent.iter().copied().fold(0.0, f32::max)
    }

    pub fn min(&self) -> f32 {
        self.recent.iter().copied().reduce(f32::min).unwrap_or(0.0)
    }

    /// Frames per second implied by the average delta; 0 with no data.
    pub fn fps(&self) -> f32 {
        let avg = self.average();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }

    /// Number of deltas in the statistics window.
    pub fn count(&self) -> usize {
        self.recent.len()
    }

    /// Frames recorded since construction, including zero-length ones.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames whose raw delta exceeded the loop's cap.
    pub fn clamped_frames(&self) -> u64 {
        self.clamped
    }
}
