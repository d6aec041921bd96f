use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use hero_bands::config::RESIZE_DEBOUNCE_MS;
use hero_bands::debounce::Debouncer;
use hero_bands::simulation::Band;
use hero_bands::surface::{Raster, Surface};
use hero_bands::{BandSlot, Config, Engine, Environment, Theme};

use crate::gpu::{BlitPipeline, FrameTexture, GpuContext};

/// Startup options gathered from the command line
pub struct Options {
    pub theme: Theme,
    pub reduced_motion: bool,
    pub slots: Vec<BandSlot>,
    pub seed: Option<u64>,
}

/// Logical and backing sizes derived from the window
#[derive(Clone, Copy, Debug)]
struct Layout {
    /// Logical window size
    width: f32,
    height: f32,
    /// Logical height of each band
    band_height: f32,
    /// Composed frame size in backing pixels
    frame_width: u32,
    frame_height: u32,
}

/// GPU objects that live as long as the window
struct Presenter {
    gpu: GpuContext,
    blit: BlitPipeline,
    texture: FrameTexture,
    bind_group: wgpu::BindGroup,
}

/// Application state
pub struct App {
    options: Options,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    engine: Option<Engine<Raster, StdRng>>,
    frame: Raster,
    /// Largest texture edge the device accepts
    max_texture: u32,
    resize: Debouncer,
    last_frame: Instant,
    fps_counter: FpsCounter,
}

impl App {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            window: None,
            presenter: None,
            engine: None,
            frame: Raster::new(1, 1),
            max_texture: wgpu::Limits::downlevel_defaults().max_texture_dimension_2d,
            resize: Debouncer::new(Duration::from_millis(RESIZE_DEBOUNCE_MS)),
            last_frame: Instant::now(),
            fps_counter: FpsCounter::new(),
        }
    }

    fn layout(&self, window: &Window, config: &Config) -> Layout {
        let size = window.inner_size();
        layout(
            (size.width, size.height),
            window.scale_factor() as f32,
            self.options.slots.len(),
            config,
            self.max_texture,
        )
    }

    /// Re-measure the window, re-run band setup and resize the frame.
    fn rebuild(&mut self) {
        let (Some(window), Some(engine)) = (self.window.as_ref(), self.engine.as_ref()) else {
            return;
        };
        let layout = self.layout(window, engine.config());
        log::debug!(
            "Rebuilding bands for {}x{} logical window",
            layout.width,
            layout.height
        );

        if let Some(engine) = self.engine.as_mut() {
            for slot in &self.options.slots {
                engine.resize_band(*slot, layout.width, layout.band_height);
            }
        }

        self.frame.resize(layout.frame_width, layout.frame_height);

        if let Some(presenter) = self.presenter.as_mut() {
            if !presenter.texture.matches(layout.frame_width, layout.frame_height) {
                let device = &presenter.gpu.device;
                presenter.texture =
                    FrameTexture::new(device, layout.frame_width, layout.frame_height);
                presenter.bind_group = presenter.blit.create_bind_group(device, &presenter.texture);
            }
        }
    }

    fn compose(&mut self) {
        match self.engine.as_ref() {
            Some(engine) => compose(&mut self.frame, engine.bands()),
            None => self.frame.clear(),
        }
    }

    fn render(&mut self) {
        let now = Instant::now();
        if self.resize.is_pending() && self.resize.poll(now) {
            self.rebuild();
        }

        let delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        if let Some(engine) = self.engine.as_mut() {
            engine.tick(delta);
        }

        self.compose();

        let Some(presenter) = self.presenter.as_ref() else {
            return;
        };
        let gpu = &presenter.gpu;
        presenter.texture.upload(&gpu.queue, &self.frame);

        // Get surface texture
        let output = match gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Reconfigure surface
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });
        presenter.blit.draw(&mut encoder, &view, &presenter.bind_group);

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if let Some(fps) = self.fps_counter.tick() {
            if let Some(window) = &self.window {
                let active = self.engine.as_ref().map_or(0, |e| e.active_count());
                window.set_title(&format!(
                    "Hero Bands - {:.0} FPS - {} active",
                    fps, active
                ));
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        log::info!("Initializing hero bands...");

        let window_attrs = Window::default_attributes()
            .with_title("Hero Bands")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        log::info!("Creating GPU context...");
        let gpu = match pollster::block_on(GpuContext::new(window.clone())) {
            Ok(gpu) => gpu,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        self.max_texture = gpu.max_texture_dimension();

        // Environment signals are read once here and never re-evaluated.
        let scale_factor = window.scale_factor() as f32;
        let env = Environment {
            device_pixel_ratio: scale_factor,
            reduced_motion: self.options.reduced_motion,
            viewport_width: window.inner_size().width as f32 / scale_factor,
        };
        let config = Config::resolve(&self.options.theme, &env);

        let rng = match self.options.seed {
            Some(seed) => {
                log::info!("Using seed {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };

        let layout = self.layout(&window, &config);
        let mut engine = Engine::new(config, rng);
        for slot in &self.options.slots {
            engine.add_band(*slot, Raster::new(0, 0), layout.width, layout.band_height);
        }
        if self.options.slots.is_empty() {
            log::info!("No bands requested, nothing to animate");
        }

        self.frame = Raster::new(layout.frame_width, layout.frame_height);

        let blit = BlitPipeline::new(&gpu.device, gpu.format());
        let texture = FrameTexture::new(&gpu.device, layout.frame_width, layout.frame_height);
        let bind_group = blit.create_bind_group(&gpu.device, &texture);

        log::info!("Initialization complete!");
        log::info!("Controls:");
        log::info!("  Escape: Quit");

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
        self.presenter = Some(Presenter {
            gpu,
            blit,
            texture,
            bind_group,
        });
        self.last_frame = Instant::now();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed()
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                {
                    log::info!("Escape pressed, exiting...");
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(new_size) => {
                if let Some(presenter) = &mut self.presenter {
                    log::debug!("Window resized to {}x{}", new_size.width, new_size.height);
                    presenter.gpu.resize(new_size);
                }
                self.resize.trigger(Instant::now());
            }
            WindowEvent::RedrawRequested => {
                self.render();
                // Request another frame immediately
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Size the bands and the composed frame for a window of `physical` pixels.
///
/// Each band gets `min(band_height, height / slots)` logical pixels. The frame
/// is the logical size times the clamped backing scale, capped at
/// `max_texture` per edge.
fn layout(
    physical: (u32, u32),
    scale_factor: f32,
    slots: usize,
    config: &Config,
    max_texture: u32,
) -> Layout {
    let scale_factor = if scale_factor.is_finite() && scale_factor > 0.0 {
        scale_factor
    } else {
        1.0
    };
    let width = physical.0 as f32 / scale_factor;
    let height = physical.1 as f32 / scale_factor;

    let slots = slots.max(1) as f32;
    let band_height = config.band_height.min(height / slots).max(0.0);

    let max_texture = max_texture.max(1);
    Layout {
        width,
        height,
        band_height,
        frame_width: ((width * config.scale).round() as u32).clamp(1, max_texture),
        frame_height: ((height * config.scale).round() as u32).clamp(1, max_texture),
    }
}

/// Stack the band rasters into the frame: top flush with the top edge,
/// bottom flush with the bottom edge.
fn compose(frame: &mut Raster, bands: &[Band<Raster>]) {
    frame.clear();
    let (_, frame_height) = frame.size();
    for band in bands {
        let (_, band_height) = band.surface().size();
        let y = match band.slot {
            BandSlot::Top => 0,
            BandSlot::Bottom => frame_height as i64 - band_height as i64,
        };
        frame.blit(band.surface(), 0, y);
    }
}

/// Simple FPS counter
struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
        }
    }

    /// Tick the counter, returns Some(fps) every second
    fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f64() >= 1.0 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}
