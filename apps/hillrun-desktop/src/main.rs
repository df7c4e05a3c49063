use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use hillrun_input::InputChannel;
use hillrun_kernel::Simulation;
use hillrun_render::{DebugTextRenderer, RenderView, Scene};
use hillrun_runtime::{AppConfig, FrameLoop, LoopConfig, SpeedReadout, SystemClock};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::Key;
use winit::window::{Window, WindowId};

const TITLE: &str = "hillrun";

#[derive(Parser)]
#[command(name = "hillrun-desktop", about = "Drive a vehicle across rolling hills")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

struct DesktopApp {
    frame_loop: FrameLoop<SystemClock>,
    scene: Scene,
    renderer: DebugTextRenderer,
    view: RenderView,
    window: Option<Arc<Window>>,
}

impl DesktopApp {
    fn new(config: &AppConfig) -> Result<Self> {
        let scene = Scene::build(&config.terrain)?;
        let frame = LoopConfig {
            retain_records: false,
            ..config.frame
        };
        let frame_loop = FrameLoop::new(
            Simulation::new(config.sim),
            SystemClock::new(),
            InputChannel::new(),
            frame,
        );
        Ok(Self {
            frame_loop,
            scene,
            renderer: DebugTextRenderer::new(),
            view: RenderView::default(),
            window: None,
        })
    }
}

impl ApplicationHandler for DesktopApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                tracing::error!("failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.view.resize(size.width, size.height);

        let title_window = window.clone();
        let mut shown: Option<SpeedReadout> = None;
        self.frame_loop.set_telemetry(move |readout: SpeedReadout| {
            if shown != Some(readout) {
                title_window.set_title(&format!("{TITLE} - speed {readout}"));
                shown = Some(readout);
            }
        });
        self.frame_loop.prime();
        self.window = Some(window);

        tracing::info!(width = size.width, height = size.height, "window created");
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.frame_loop.stop_handle().stop();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.view.resize(new_size.width, new_size.height);
            }
            WindowEvent::Focused(false) => {
                // Key releases are not delivered to an unfocused window.
                self.frame_loop.input().clear();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Character(text),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.frame_loop
                    .input()
                    .set(text.as_str(), key_state == ElementState::Pressed);
            }
            WindowEvent::RedrawRequested => {
                // The text frame only feeds a trace event; skip building it otherwise.
                let report = if tracing::enabled!(Level::TRACE) {
                    self.frame_loop
                        .frame(&self.scene, &self.renderer, &mut self.view)
                        .map(|(report, frame)| {
                            tracing::trace!(tick = report.tick, dt = report.dt, "{frame}");
                            report
                        })
                } else {
                    self.frame_loop.advance_view(&mut self.view)
                };
                if report.is_none() {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        let sim = self.frame_loop.simulation();
        let timer = self.frame_loop.timer();
        tracing::info!(
            tick = sim.tick(),
            fps = timer.fps(),
            max_frame_ms = timer.max() * 1000.0,
            clamped_frames = timer.clamped_frames(),
            "hillrun-desktop exiting"
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("hillrun-desktop starting");

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = DesktopApp::new(&config)?;
    event_loop.run_app(&mut app)?;

    Ok(())
}
