use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hillrun_input::InputChannel;
use hillrun_kernel::Simulation;
use hillrun_render::{DebugTextRenderer, RenderView, Renderer, Scene};
use hillrun_runtime::{AppConfig, FrameLoop, FrameReport, InputScript, LogSink, ManualClock};
use hillrun_terrain::{Terrain, TerrainConfig};
use hillrun_tools::SimInspector;
use tracing_subscriber::EnvFilter;

const DEFAULT_SCRIPT: &str = "w*120,wa*60,*30,s*45";

#[derive(Parser)]
#[command(name = "hillrun-cli", about = "Headless driver for the hillrun simulation")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct DriveArgs {
    /// Key schedule as `<keys>*<ticks>` segments
    #[arg(short, long, default_value = DEFAULT_SCRIPT)]
    script: String,
    /// Ticks to run; defaults to the script length
    #[arg(short, long)]
    ticks: Option<u64>,
    /// Seconds per frame
    #[arg(long, default_value = "0.016667")]
    dt: f32,
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Drive the vehicle along a scripted key schedule
    Drive {
        #[command(flatten)]
        args: DriveArgs,
        /// Print the speed readout every N ticks (0 disables)
        #[arg(short, long, default_value = "30")]
        every: u64,
        /// Dump the final simulation state as JSON instead of a text frame
        #[arg(long)]
        json: bool,
    },
    /// Drive, then replay the tick log and compare state hashes
    Replay {
        #[command(flatten)]
        args: DriveArgs,
    },
    /// Generate the terrain and print its statistics
    Terrain {
        #[arg(long)]
        rows: Option<u32>,
        #[arg(long)]
        cols: Option<u32>,
        #[arg(long)]
        half_extent: Option<f32>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("hillrun-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: tick={}", Simulation::default().tick());
            println!("render: {}", hillrun_render::crate_info());
            println!("runtime: {}", hillrun_runtime::crate_info());
            println!("tools: {}", hillrun_tools::crate_info());
        }
        Commands::Drive { args, every, json } => {
            let config = load_config(args.config.as_ref())?;
            let scene = Scene::build(&config.terrain).context("building scene")?;
            let renderer = DebugTextRenderer::new();
            let mut view = RenderView::default();
            let sim = drive(&config, &args, |report| {
                if every > 0 && report.tick % every == 0 {
                    println!("tick {:>5}  speed {}", report.tick, report.readout);
                }
            })?;

            if json {
                println!("{}", serde_json::to_string_pretty(&sim)?);
            } else {
                view.follow(sim.camera());
                print!("{}", renderer.render(&scene, &sim, &view));
                println!("{}", SimInspector::summary(&sim));
            }
        }
        Commands::Replay { args } => {
            let config = load_config(args.config.as_ref())?;
            let check = verify_replay(&config, &args)?;

            println!("Run:    {}", SimInspector::summary(&check.run));
            println!("Replay: {}", SimInspector::summary(&check.replayed));
            println!(
                "Match: {}",
                if check.matches() { "OK" } else { "MISMATCH" }
            );
        }
        Commands::Terrain {
            rows,
            cols,
            half_extent,
        } => {
            let defaults = TerrainConfig::default();
            let config = TerrainConfig {
                rows: rows.unwrap_or(defaults.rows),
                cols: cols.unwrap_or(defaults.cols),
                half_extent: half_extent.unwrap_or(defaults.half_extent),
                ..defaults
            };
            let terrain = Terrain::build(&config)?;
            println!("{}", SimInspector::terrain(&terrain));
        }
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => Ok(AppConfig::load(path)?),
        None => Ok(AppConfig::default()),
    }
}

/// Run a fixed-step headless drive and hand back the final simulation.
fn drive(
    config: &AppConfig,
    args: &DriveArgs,
    mut on_frame: impl FnMut(&FrameReport),
) -> anyhow::Result<Simulation> {
    let script: InputScript = args
        .script
        .parse()
        .with_context(|| format!("parsing script {:?}", args.script))?;
    let ticks = args.ticks.unwrap_or_else(|| script.total_ticks());
    let clock = ManualClock::stepping(frame_step(args.dt)?);
    let mut frame_loop = FrameLoop::new(
        Simulation::new(config.sim),
        clock,
        InputChannel::new(),
        config.frame,
    );
    frame_loop.set_telemetry(LogSink::new());
    frame_loop.prime();

    tracing::info!(ticks, script = %args.script, "drive started");
    for frame in 0..ticks {
        let input = script.input_at(frame).unwrap_or_default();
        frame_loop.input().store(input);
        let Some(report) = frame_loop.tick() else {
            break;
        };
        on_frame(&report);
    }
    let timer = frame_loop.timer();
    tracing::info!(
        frames = timer.frames(),
        fps = timer.fps(),
        clamped = timer.clamped_frames(),
        "drive finished"
    );

    Ok(frame_loop.into_simulation())
}

/// Clock step for `--dt` seconds.
fn frame_step(dt: f32) -> anyhow::Result<Duration> {
    if !(dt.is_finite() && dt > 0.0) {
        anyhow::bail!("--dt must be positive, got {dt}");
    }
    Duration::try_from_secs_f32(dt).with_context(|| format!("--dt {dt} is out of range"))
}

/// A drive and its reconstruction from the tick log.
struct ReplayCheck {
    run: Simulation,
    replayed: Simulation,
}

impl ReplayCheck {
    fn matches(&self) -> bool {
        self.run.state_hash() == self.replayed.state_hash()
    }
}

/// Drive with the tick log retained whatever the config says, then rebuild
/// the run from that log.
fn verify_replay(config: &AppConfig, args: &DriveArgs) -> anyhow::Result<ReplayCheck> {
    let mut config = *config;
    if !config.frame.retain_records {
        tracing::info!("replay keeps the tick log regardless of frame.retain_records");
        config.frame.retain_records = true;
    }
    let run = drive(&config, args, |_| {})?;
    let replayed = Simulation::replay(config.sim, run.records())?;
    Ok(ReplayCheck { run, replayed })
}
