use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use hillrun_input::InputChannel;
use hillrun_kernel::Simulation;
use hillrun_render::{RenderView, Renderer, Scene};

use crate::{Clock, FrameTimer, LoopConfig, SpeedReadout, TelemetrySink};

/// Shared flag that ends a [`FrameLoop`]. Cheap to clone and hand to a host.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// What one frame did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub tick: u64,
    /// Delta time actually integrated, after clamping.
    pub dt: f32,
    pub speed: f32,
    pub readout: SpeedReadout,
}

/// Owns the simulation and advances it once per frame.
///
/// Per frame: measure `dt` from the clock, snapshot input, step the
/// simulation (vehicle then camera), publish telemetry, then optionally
/// render.
pub struct FrameLoop<C: Clock> {
    sim: Simulation,
    clock: C,
    input: InputChannel,
    config: LoopConfig,
    last: Option<Duration>,
    timer: FrameTimer,
    stop: StopHandle,
    telemetry: Option<Box<dyn TelemetrySink>>,
}

impl<C: Clock> FrameLoop<C> {
    pub fn new(sim: Simulation, clock: C, input: InputChannel, config: LoopConfig) -> Self {
        Self {
            sim,
            clock,
            input,
            timer: FrameTimer::new(config.timer_window),
            config,
            last: None,
            stop: StopHandle::default(),
            telemetry: None,
        }
    }

    /// Route speed readouts to `sink`. Without one, telemetry is dropped.
    pub fn set_telemetry(&mut self, sink: impl TelemetrySink + 'static) {
        self.telemetry = Some(Box::new(sink));
    }

    pub fn clear_telemetry(&mut self) {
        self.telemetry = None;
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn into_simulation(self) -> Simulation {
        self.sim
    }

    /// Handle for the event source to write key state into.
    pub fn input(&self) -> &InputChannel {
        &self.input
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.stop.is_stopped()
    }

    /// Start timing from now. Without this the first frame has `dt == 0`.
    pub fn prime(&mut self) {
        self.last = Some(self.clock.now());
    }

    /// Run one simulation tick. Returns `None` once stopped.
    pub fn tick(&mut self) -> Option<FrameReport> {
        if self.stop.is_stopped() {
            return None;
        }

        let (dt, clamped) = self.next_dt();
        let input = self.input.snapshot();
        let _span = tracing::trace_span!("frame", tick = self.sim.tick() + 1).entered();

        self.sim.step(input, dt);
        if !self.config.retain_records {
            self.sim.drain_records();
        }
        self.timer.record(dt, clamped);

        let speed = self.sim.vehicle().speed;
        let readout = SpeedReadout::from_speed(speed);
        if let Some(sink) = self.telemetry.as_mut() {
            sink.publish(readout);
        }

        Some(FrameReport {
            tick: self.sim.tick(),
            dt,
            speed,
            readout,
        })
    }

    /// Tick and point the view at the follow camera, without rendering.
    pub fn advance_view(&mut self, view: &mut RenderView) -> Option<FrameReport> {
        let report = self.tick()?;
        view.follow(self.sim.camera());
        Some(report)
    }

    /// Tick, point the view at the follow camera, and render.
    pub fn frame<R: Renderer>(
        &mut self,
        scene: &Scene,
        renderer: &R,
        view: &mut RenderView,
    ) -> Option<(FrameReport, R::Output)> {
        let report = self.advance_view(view)?;
        let output = renderer.render(scene, &self.sim, view);
        Some((report, output))
    }

    /// Render frames until the stop handle fires. `present` receives each
    /// frame's report and renderer output. Returns the number of frames run.
    pub fn run<R: Renderer>(
        &mut self,
        scene: &Scene,
        renderer: &R,
        view: &mut RenderView,
        mut present: impl FnMut(&FrameReport, R::Output),
    ) -> u64 {
        tracing::info!(tick = self.sim.tick(), "frame loop started");
        let mut frames = 0;
        while let Some((report, output)) = self.frame(scene, renderer, view) {
            present(&report, output);
            frames += 1;
        }
        tracing::info!(frames, tick = self.sim.tick(), "frame loop stopped");
        frames
    }

    /// Sanitised delta for this frame, and whether the cap was applied.
    fn next_dt(&mut self) -> (f32, bool) {
        let now = self.clock.now();
        let raw = match self.last.replace(now) {
            Some(last) => now.saturating_sub(last).as_secs_f32(),
            None => 0.0,
        };
        let dt = self.config.clamp_dt(raw);
        let clamped = dt < raw;
        if clamped {
            tracing::warn!(
                raw_dt = raw,
                max_dt = self.config.effective_max_dt(),
                "frame delta clamped"
            );
        }
        (dt, clamped)
    }
}
