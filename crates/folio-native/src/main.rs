use std::path::{Path, PathBuf};
use std::sync::Arc;

use folio_core::render::{GpuContext, RenderSurface, SceneRenderer};
use folio_core::{
    decode_glb, pointer_ndc, FolioError, MeshData, OverlayChange, PartsBench, PointerSample,
    SceneHost, Showcase, SHOWCASE_PROMPT,
};
use glam::Vec2;
use instant::Instant;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::{Window, WindowBuilder},
};

const BENCH_TITLE: &str = "Materials used";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Bench,
    Showcase,
}

fn read_glb(dir: &Path, path: &str) -> Result<MeshData, FolioError> {
    let file = dir.join(path.trim_start_matches('/'));
    let bytes = std::fs::read(&file).map_err(|e| FolioError::Load {
        path: file.display().to_string(),
        reason: e.to_string(),
    })?;
    decode_glb(path, &bytes)
}

/// Blocking stand-in for the web fetch: settle every pending node now.
fn load_scene(dir: &Path, scene: &mut SceneHost) {
    for (node, path) in scene.pending_loads() {
        if let Err(e) = scene.finish_load(node, read_glb(dir, &path)) {
            log::error!("[asset] {}", e);
        }
    }
}

struct App {
    window: Arc<Window>,
    gpu: GpuContext,
    surface: RenderSurface,
    asset_dir: PathBuf,
    mode: Mode,
    parts: PartsBench,
    showcase: Showcase,
    bench_renderer: SceneRenderer,
    showcase_renderer: SceneRenderer,
    detail_renderer: Option<SceneRenderer>,
    cursor: Option<Vec2>,
    last_fps: Instant,
    frames: u32,
}

impl App {
    async fn new(window: Arc<Window>, asset_dir: PathBuf) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window.clone())?;
        let gpu = GpuContext::new(instance, Some(&surface)).await?;
        let surface = RenderSurface::new(&gpu, surface, size.width, size.height);
        let bench_renderer = SceneRenderer::new(&gpu.device, surface.format());
        let showcase_renderer = SceneRenderer::new(&gpu.device, surface.format());

        let mut parts = PartsBench::new();
        load_scene(&asset_dir, parts.bench_mut());
        let mut showcase = Showcase::new()?;
        load_scene(&asset_dir, showcase.scene_mut());
        log::info!(
            "[asset] bench {}, showcase {}",
            parts.bench().progress().label(),
            showcase.scene().progress().label()
        );

        Ok(Self {
            window,
            gpu,
            surface,
            asset_dir,
            mode: Mode::Bench,
            parts,
            showcase,
            bench_renderer,
            showcase_renderer,
            detail_renderer: None,
            cursor: None,
            last_fps: Instant::now(),
            frames: 0,
        })
    }

    /// The scene currently receiving input and drawn to the window.
    fn active_scene(&mut self) -> &mut SceneHost {
        match self.mode {
            Mode::Showcase => self.showcase.scene_mut(),
            Mode::Bench => {
                if self.parts.overlay().is_some() {
                    self.parts.overlay_mut().unwrap().scene_mut()
                } else {
                    self.parts.bench_mut()
                }
            }
        }
    }

    fn sample(&self, position: Vec2) -> PointerSample {
        let size = self.window.inner_size();
        let scale = self.window.scale_factor() as f32;
        PointerSample {
            client: position / scale,
            ndc: pointer_ndc(position, Vec2::new(size.width as f32, size.height as f32)),
        }
    }

    fn cursor_moved(&mut self, position: Vec2) {
        self.cursor = Some(position);
        let ndc = self.sample(position).ndc;
        self.active_scene().pointer_moved(ndc);
    }

    fn mouse_input(&mut self, state: ElementState) {
        let on_surface = self.cursor.is_some();
        let p = self.sample(self.cursor.unwrap_or(Vec2::splat(-1.0)));
        let scene = self.active_scene();
        match state {
            ElementState::Pressed => {
                scene.pointer_down(p, on_surface);
            }
            ElementState::Released => {
                scene.pointer_up(p, on_surface);
            }
        }
    }

    fn cursor_left(&mut self) {
        self.cursor = None;
        if self.mode == Mode::Showcase {
            self.showcase.set_hovered(false);
        }
    }

    fn cursor_entered(&mut self) {
        if self.mode == Mode::Showcase {
            self.showcase.set_hovered(true);
        }
    }

    fn key(&mut self, key: &Key) {
        match key {
            Key::Named(NamedKey::Escape) => {
                if self.parts.overlay().is_some() {
                    let change = self.parts.close_overlay();
                    self.apply_overlay_change(change);
                }
            }
            Key::Named(NamedKey::Tab) => {
                if self.parts.overlay().is_none() {
                    self.mode = match self.mode {
                        Mode::Bench => Mode::Showcase,
                        Mode::Showcase => Mode::Bench,
                    };
                    self.showcase.set_hovered(self.mode == Mode::Showcase && self.cursor.is_some());
                    self.refresh_title();
                    log::info!("[keys] mode={:?}", self.mode);
                }
            }
            _ => {}
        }
    }

    fn apply_overlay_change(&mut self, change: OverlayChange) {
        match change {
            OverlayChange::Unchanged => return,
            OverlayChange::Opened(_) => {
                if let Some(o) = self.parts.overlay_mut() {
                    load_scene(&self.asset_dir, o.scene_mut());
                }
                self.detail_renderer =
                    Some(SceneRenderer::new(&self.gpu.device, self.surface.format()));
            }
            OverlayChange::Closed => self.detail_renderer = None,
        }
        self.refresh_title();
    }

    fn refresh_title(&self) {
        let title = match (self.mode, self.parts.overlay()) {
            (Mode::Showcase, _) => SHOWCASE_PROMPT.to_string(),
            (Mode::Bench, Some(o)) => {
                let v = o.view();
                format!("{}: {}", v.name, v.description)
            }
            (Mode::Bench, None) => BENCH_TITLE.to_string(),
        };
        self.window.set_title(&title);
    }

    fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.surface
            .resize_if_needed(&self.gpu.device, size.width, size.height);
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        match self.parts.sync_overlay() {
            Ok(change) => self.apply_overlay_change(change),
            Err(e) => log::error!("[overlay] {}", e),
        }
        self.parts.update();
        self.showcase.update();

        let (w, h) = self.surface.size();
        self.active_scene().set_viewport(w, h);

        self.frames += 1;
        if self.last_fps.elapsed().as_secs() >= 10 {
            log::debug!(
                "[frame] {:.1} fps",
                self.frames as f32 / self.last_fps.elapsed().as_secs_f32()
            );
            self.frames = 0;
            self.last_fps = Instant::now();
        }

        match self.mode {
            Mode::Showcase => {
                self.showcase_renderer
                    .render(&self.gpu, &self.surface, self.showcase.scene())
            }
            Mode::Bench => match (self.parts.overlay(), self.detail_renderer.as_mut()) {
                (Some(o), Some(r)) => r.render(&self.gpu, &self.surface, o.scene()),
                _ => self
                    .bench_renderer
                    .render(&self.gpu, &self.surface, self.parts.bench()),
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let asset_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets"));
    log::info!("[asset] reading from {}", asset_dir.display());

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(BENCH_TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(1200.0, 400.0))
            .build(&event_loop)?,
    );

    let mut app = pollster::block_on(App::new(window, asset_dir))?;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => app.resize(size),
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::CursorMoved { position, .. } => {
                app.cursor_moved(Vec2::new(position.x as f32, position.y as f32))
            }
            WindowEvent::CursorEntered { .. } => app.cursor_entered(),
            WindowEvent::CursorLeft { .. } => app.cursor_left(),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => app.mouse_input(state),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => app.key(&logical_key),
            _ => {}
        },
        Event::AboutToWait => match app.render() {
            Ok(_) => app.window.request_redraw(),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                app.surface.reconfigure(&app.gpu.device)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
            Err(e) => log::warn!("[render] {:?}", e),
        },
        _ => {}
    })?;
    Ok(())
}
