use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use ripple_common::Viewport;
use ripple_engine::{Engine, EngineConfig, Environment, FrameHost, FrameId, Tick};
use ripple_input::InputEvent;
use ripple_render_wgpu::OverlayBlitter;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{MouseScrollDelta, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Pixels scrolled per wheel notch.
const LINE_HEIGHT: f32 = 40.0;

/// Colour behind the overlay, standing in for the page content.
const BACKDROP: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.05,
    b: 0.08,
    a: 1.0,
};

#[derive(Parser)]
#[command(name = "ripple-desktop", about = "Ripple overlay in a desktop window")]
struct Cli {
    #[arg(short, long)]
    verbose: bool,

    /// Engine config file (.yaml, .yml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Behave like a touch-capable device (coarser grid, no caustics)
    #[arg(long)]
    touch: bool,

    /// Honour a reduced-motion preference: the overlay never starts
    #[arg(long)]
    reduced_motion: bool,
}

/// Frame host backed by winit redraw requests.
///
/// winit coalesces redraw requests, so one pending id is all that is needed.
struct WindowHost {
    window: Arc<Window>,
    next_id: u64,
    pending: Option<FrameId>,
}

impl WindowHost {
    fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            next_id: 0,
            pending: None,
        }
    }

    fn fire(&mut self) -> Option<FrameId> {
        self.pending.take()
    }
}

impl FrameHost for WindowHost {
    fn request_frame(&mut self) -> FrameId {
        self.next_id += 1;
        let id = FrameId(self.next_id);
        self.pending = Some(id);
        self.window.request_redraw();
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        if self.pending == Some(id) {
            self.pending = None;
        }
    }
}

struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    blitter: OverlayBlitter,
}

impl Gpu {
    fn new(window: Arc<Window>) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("find adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("ripple_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let blitter = OverlayBlitter::new(&device, surface_format);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            blitter,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
    }

    fn present(&mut self) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.blitter
            .draw(&self.device, &self.queue, &view, BACKDROP);
        output.present();
    }
}

struct RippleApp {
    config: EngineConfig,
    env: Environment,
    epoch: Instant,
    scroll_offset: f32,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    engine: Option<Engine<WindowHost>>,
}

impl RippleApp {
    fn new(config: EngineConfig, env: Environment) -> Self {
        Self {
            config,
            env,
            epoch: Instant::now(),
            scroll_offset: 0.0,
            window: None,
            gpu: None,
            engine: None,
        }
    }

    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn send(&mut self, event: InputEvent) {
        let now = self.now();
        if let Some(engine) = &mut self.engine {
            engine.handle(event, now);
        }
    }

    fn scroll_by(&mut self, delta: MouseScrollDelta) {
        let dy = match delta {
            MouseScrollDelta::LineDelta(_, lines) => lines * LINE_HEIGHT,
            MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => y as f32,
        };
        // Wheel down reports a negative delta and moves the page down.
        self.scroll_offset = (self.scroll_offset - dy).max(0.0);
        self.send(InputEvent::Scroll(self.scroll_offset));
    }

    fn redraw(&mut self) {
        let now = self.now();
        let (Some(engine), Some(gpu)) = (&mut self.engine, &mut self.gpu) else {
            return;
        };
        let tick = match engine.host_mut().fire() {
            Some(_) => engine.on_frame(now),
            None => None,
        };
        match engine.frame() {
            Some(frame) if tick == Some(Tick::Stepped) => {
                gpu.blitter.upload(&gpu.device, &gpu.queue, frame)
            }
            None => gpu.blitter.clear(),
            Some(_) => {}
        }
        gpu.present();
    }
}

impl ApplicationHandler for RippleApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Ripple")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        self.gpu = match Gpu::new(window.clone()) {
            Ok(gpu) => Some(gpu),
            Err(e) => {
                tracing::warn!("no render surface, running without overlay: {e:#}");
                None
            }
        };

        let env = Environment {
            surface_available: self.gpu.is_some(),
            ..self.env
        };
        let mut engine = Engine::new(self.config.clone(), env, WindowHost::new(window.clone()));
        let size = window.inner_size();
        if let Err(reason) = engine.mount(Viewport::new(size.width, size.height), self.now()) {
            tracing::info!("overlay disabled: {reason}");
        }

        self.engine = Some(engine);
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(engine) = &mut self.engine {
                    engine.destroy();
                    tracing::info!("{}", engine.stats());
                }
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size);
                }
                self.send(InputEvent::Resize(Viewport::new(size.width, size.height)));
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.send(InputEvent::PointerMove(Vec2::new(
                    position.x as f32,
                    position.y as f32,
                )));
            }
            WindowEvent::CursorLeft { .. } => self.send(InputEvent::PointerLeave),
            WindowEvent::Touch(touch) => {
                let event = match touch.phase {
                    TouchPhase::Started | TouchPhase::Moved => InputEvent::TouchMove(Vec2::new(
                        touch.location.x as f32,
                        touch.location.y as f32,
                    )),
                    TouchPhase::Ended | TouchPhase::Cancelled => InputEvent::TouchEnd,
                };
                self.send(event);
            }
            WindowEvent::MouseWheel { delta, .. } => self.scroll_by(delta),
            WindowEvent::Occluded(occluded) => self.send(InputEvent::Visibility(!occluded)),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let env = Environment {
        reduced_motion: cli.reduced_motion,
        touch_capable: cli.touch,
        surface_available: true,
    };

    tracing::info!("ripple-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = RippleApp::new(config, env);
    event_loop.run_app(&mut app)?;

    Ok(())
}
