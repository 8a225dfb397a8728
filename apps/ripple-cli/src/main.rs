use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec2;
use ripple_common::{GridDims, Viewport};
use ripple_engine::{Engine, EngineConfig, Environment, ManualHost, Tick};
use ripple_input::InputEvent;
use ripple_render::{AsciiRenderer, FieldRenderer};

#[derive(Parser)]
#[command(name = "ripple-cli", about = "Headless driver for the ripple engine")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Engine config file (.yaml, .yml or .json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the grid a viewport maps to
    Info {
        #[arg(long, default_value = "1280")]
        width: u32,
        #[arg(long, default_value = "720")]
        height: u32,
    },
    /// Run the engine on a virtual clock with scripted input
    Run {
        /// Virtual seconds to run
        #[arg(short, long, default_value = "8")]
        seconds: f32,
        /// Host frame callbacks per second
        #[arg(long, default_value = "60")]
        fps: u32,
        #[arg(long, default_value = "1280")]
        width: u32,
        #[arg(long, default_value = "720")]
        height: u32,
        /// Behave like a touch-capable device
        #[arg(long)]
        touch: bool,
    },
    /// Print an ASCII preview of the field after a pointer sweep
    Preview {
        /// Simulated frames before printing
        #[arg(short, long, default_value = "20")]
        frames: u32,
        #[arg(long, default_value = "640")]
        width: u32,
        #[arg(long, default_value = "320")]
        height: u32,
        /// Sample every n-th cell
        #[arg(long, default_value = "1")]
        step: usize,
    },
    /// Print the effective configuration as YAML
    Config,
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

/// Pointer position of a left-to-right sweep across the middle band.
fn sweep(viewport: Viewport, progress: f32) -> Vec2 {
    let w = viewport.width as f32;
    let h = viewport.height as f32;
    Vec2::new(
        w * (0.1 + 0.8 * progress),
        h * (0.5 + 0.15 * (progress * 6.0).sin()),
    )
}

fn run(
    config: EngineConfig,
    seconds: f32,
    fps: u32,
    viewport: Viewport,
    touch: bool,
) -> anyhow::Result<()> {
    let env = Environment {
        touch_capable: touch,
        ..Environment::default()
    };
    let mut engine = Engine::new(config, env, ManualHost::new());
    engine.mount(viewport, ms(0))?;

    let frame_ms = 1000 / u64::from(fps.max(1));
    let total_ms = (seconds.max(0.0) * 1000.0) as u64;
    let sweep_ms = 2000;
    let mut scroll = 0.0f32;
    let mut released = false;

    let mut t = 0;
    while t <= total_ms {
        if t < sweep_ms {
            let pos = sweep(viewport, t as f32 / sweep_ms as f32);
            let event = if touch {
                InputEvent::TouchMove(pos)
            } else {
                InputEvent::PointerMove(pos)
            };
            engine.handle(event, ms(t));
        } else if !released {
            released = true;
            let event = if touch {
                InputEvent::TouchEnd
            } else {
                InputEvent::PointerLeave
            };
            engine.handle(event, ms(t));
        }
        if (2500..3000).contains(&t) {
            scroll += 12.0;
            engine.handle(InputEvent::Scroll(scroll), ms(t));
        }

        if engine.host_mut().fire().is_some() {
            if let Some(Tick::Stop) = engine.on_frame(ms(t)) {
                tracing::info!(t_ms = t, "frame loop stopped");
            }
        }
        t += frame_ms;
    }

    let field = engine.field().context("engine has no field")?;
    let dims = field.dims();
    println!(
        "Run: {seconds}s at {fps} callbacks/s, grid {}x{}",
        dims.width, dims.height
    );
    println!("Phase: {:?}", engine.phase());
    println!("Stats: {}", engine.stats());
    println!(
        "Field: energy={:.4} peak={:.4}",
        field.energy(),
        field.max_amplitude()
    );
    let timer = engine.timer();
    println!(
        "Step time: avg={:?} min={:?} max={:?} over {} steps",
        timer.average(),
        timer.min(),
        timer.max(),
        timer.count()
    );
    Ok(())
}

fn preview(
    config: EngineConfig,
    frames: u32,
    viewport: Viewport,
    step: usize,
) -> anyhow::Result<()> {
    let interval = config.frame_interval_ms;
    let mut engine = Engine::new(config, Environment::default(), ManualHost::new());
    engine.mount(viewport, ms(0))?;

    for i in 0..u64::from(frames) {
        let t = i * interval;
        let progress = i as f32 / frames.max(1) as f32;
        engine.handle(InputEvent::PointerMove(sweep(viewport, progress)), ms(t));
        if engine.host_mut().fire().is_some() {
            engine.on_frame(ms(t));
        }
    }

    let field = engine.field().context("engine has no field")?;
    let mut renderer = AsciiRenderer::new(step, 0.5);
    let time = (u64::from(frames) * interval) as f32 / 1000.0;
    print!("{}", renderer.render(field, time));
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Info { width, height } => {
            println!("ripple-cli v{}", env!("CARGO_PKG_VERSION"));
            let viewport = Viewport::new(width, height);
            let pointer = GridDims::from_viewport(viewport, config.cell_size);
            let touch = GridDims::from_viewport(viewport, config.touch_cell_size);
            println!("viewport: {width}x{height}");
            println!(
                "grid: {}x{} (pointer, {}px cells), {}x{} (touch, {}px cells)",
                pointer.width,
                pointer.height,
                config.cell_size,
                touch.width,
                touch.height,
                config.touch_cell_size
            );
            println!(
                "damping={} frame_interval={:?} idle_timeout={:?}",
                config.damping,
                config.frame_interval(),
                config.idle_timeout()
            );
        }
        Commands::Run {
            seconds,
            fps,
            width,
            height,
            touch,
        } => run(config, seconds, fps, Viewport::new(width, height), touch)?,
        Commands::Preview {
            frames,
            width,
            height,
            step,
        } => preview(config, frames, Viewport::new(width, height), step)?,
        Commands::Config => print!("{}", config.to_yaml()?),
    }

    Ok(())
}
