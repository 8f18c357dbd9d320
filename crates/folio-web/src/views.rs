//! Per-canvas viewers: the parts bench (with its detail overlay) and the
//! hero showcase. Each owns its scene plus, when WebGPU is up, a surface.

use crate::dom;
use crate::overlay;
use folio_core::render::{GpuContext, RenderSurface, SceneRenderer};
use folio_core::{pointer_ndc, OverlayChange, PartsBench, PointerSample, SceneHost, Showcase};
use glam::Vec2;
use std::rc::{Rc, Weak};
use web_sys as web;

pub const BENCH_CANVAS_ID: &str = "bench-canvas";
pub const BENCH_LOADER_ID: &str = "bench-loader";
pub const DETAIL_CANVAS_ID: &str = "detail-canvas";
pub const SHOWCASE_CANVAS_ID: &str = "showcase-canvas";
pub const SHOWCASE_PROMPT_ID: &str = "showcase-prompt";

/// Surface + renderer for one canvas.
pub struct Gfx {
    surface: RenderSurface,
    renderer: SceneRenderer,
}

impl Gfx {
    pub fn for_canvas(ctx: &GpuContext, canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let surface = ctx
            .instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        Ok(Self::with_surface(ctx, surface, canvas))
    }

    pub fn with_surface(
        ctx: &GpuContext,
        surface: wgpu::Surface<'static>,
        canvas: &web::HtmlCanvasElement,
    ) -> Self {
        let surface = RenderSurface::new(ctx, surface, canvas.width(), canvas.height());
        let renderer = SceneRenderer::new(&ctx.device, surface.format());
        Self { surface, renderer }
    }

    pub fn draw(&mut self, ctx: &GpuContext, canvas: &web::HtmlCanvasElement, scene: &SceneHost) {
        self.surface
            .resize_if_needed(&ctx.device, canvas.width(), canvas.height());
        match self.renderer.render(ctx, &self.surface, scene) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.reconfigure(&ctx.device)
            }
            Err(e) => log::error!("[render] {} error: {:?}", scene.label(), e),
        }
    }
}

pub fn try_gfx(ctx: Option<&GpuContext>, canvas: &web::HtmlCanvasElement) -> Option<Gfx> {
    let ctx = ctx?;
    match Gfx::for_canvas(ctx, canvas) {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("[render] surface init error: {:?}", e);
            None
        }
    }
}

/// Client + NDC sample for `canvas`, and whether the event landed on it.
#[inline]
pub fn pointer_sample(
    ev: &web::PointerEvent,
    canvas: &web::HtmlCanvasElement,
) -> (PointerSample, bool) {
    let (local, size) = dom::pointer_local_px(ev, canvas);
    let sample = PointerSample {
        client: Vec2::new(ev.client_x() as f32, ev.client_y() as f32),
        ndc: pointer_ndc(local, size),
    };
    (sample, dom::event_targets(ev, canvas))
}

/// The mounted close-up. Dropping it drops the token, which tells any fetch
/// still in flight for this mount to discard its result.
struct DetailMount {
    canvas: Option<web::HtmlCanvasElement>,
    gfx: Option<Gfx>,
    _token: Rc<()>,
}

pub struct BenchView {
    pub parts: PartsBench,
    canvas: web::HtmlCanvasElement,
    gfx: Option<Gfx>,
    detail: Option<DetailMount>,
}

impl BenchView {
    pub fn new(canvas: web::HtmlCanvasElement, gfx: Option<Gfx>) -> Self {
        Self {
            parts: PartsBench::new(),
            canvas,
            gfx,
            detail: None,
        }
    }

    pub fn pointer_down(&mut self, ev: &web::PointerEvent) {
        if self.parts.bench_accepts_input() {
            let (sample, on_surface) = pointer_sample(ev, &self.canvas);
            self.parts.bench_mut().pointer_down(sample, on_surface);
        } else if let Some(canvas) = self.detail.as_ref().and_then(|d| d.canvas.as_ref()) {
            let (sample, on_surface) = pointer_sample(ev, canvas);
            if let Some(o) = self.parts.overlay_mut() {
                o.scene_mut().pointer_down(sample, on_surface);
            }
        }
    }

    pub fn pointer_move(&mut self, ev: &web::PointerEvent) {
        let (sample, _) = pointer_sample(ev, &self.canvas);
        self.parts.bench_mut().pointer_moved(sample.ndc);
        if let Some(canvas) = self.detail.as_ref().and_then(|d| d.canvas.as_ref()) {
            let (sample, _) = pointer_sample(ev, canvas);
            if let Some(o) = self.parts.overlay_mut() {
                o.scene_mut().pointer_moved(sample.ndc);
            }
        }
    }

    pub fn pointer_up(&mut self, ev: &web::PointerEvent) {
        if self.parts.bench_accepts_input() {
            let (sample, on_surface) = pointer_sample(ev, &self.canvas);
            self.parts.bench_mut().pointer_up(sample, on_surface);
        } else if let Some(canvas) = self.detail.as_ref().and_then(|d| d.canvas.as_ref()) {
            let (sample, on_surface) = pointer_sample(ev, canvas);
            if let Some(o) = self.parts.overlay_mut() {
                o.scene_mut().pointer_up(sample, on_surface);
            }
        }
    }

    /// The browser took the pointer away: end drags without classifying.
    pub fn pointer_cancel(&mut self, ev: &web::PointerEvent) {
        let (sample, _) = pointer_sample(ev, &self.canvas);
        self.parts.bench_mut().pointer_up(sample, false);
        if let Some(o) = self.parts.overlay_mut() {
            o.scene_mut().pointer_up(sample, false);
        }
    }

    /// Close button / Escape.
    pub fn close_overlay(&mut self, document: &web::Document) {
        if self.parts.overlay().is_none() {
            return;
        }
        let change = self.parts.close_overlay();
        self.apply(change, document, None);
    }

    /// Reconcile overlay DOM and GPU state with the selection. Returns the
    /// mount token when a new close-up was mounted and needs its asset.
    pub fn sync_overlay(
        &mut self,
        document: &web::Document,
        ctx: Option<&GpuContext>,
    ) -> Option<Weak<()>> {
        match self.parts.sync_overlay() {
            Ok(change) => self.apply(change, document, ctx),
            Err(e) => {
                log::error!("[overlay] {}", e);
                self.apply(OverlayChange::Closed, document, ctx)
            }
        }
    }

    fn apply(
        &mut self,
        change: OverlayChange,
        document: &web::Document,
        ctx: Option<&GpuContext>,
    ) -> Option<Weak<()>> {
        match change {
            OverlayChange::Unchanged => None,
            OverlayChange::Closed => {
                overlay::hide(document);
                self.detail = None;
                None
            }
            OverlayChange::Opened(view) => {
                overlay::show(document, &view);
                let canvas = dom::canvas_by_id(document, DETAIL_CANVAS_ID);
                if let Some(c) = canvas.as_ref() {
                    dom::sync_canvas_backing_size(c);
                }
                let gfx = canvas.as_ref().and_then(|c| try_gfx(ctx, c));
                let token = Rc::new(());
                let weak = Rc::downgrade(&token);
                self.detail = Some(DetailMount {
                    canvas,
                    gfx,
                    _token: token,
                });
                Some(weak)
            }
        }
    }

    pub fn frame(&mut self, document: &web::Document, ctx: Option<&GpuContext>) {
        self.parts.update();

        let progress = self.parts.bench().progress();
        dom::set_text(document, BENCH_LOADER_ID, &progress.label());
        dom::set_visible(document, BENCH_LOADER_ID, !progress.is_complete());

        self.parts
            .bench_mut()
            .set_viewport(self.canvas.width(), self.canvas.height());
        if let (Some(ctx), Some(gfx)) = (ctx, self.gfx.as_mut()) {
            gfx.draw(ctx, &self.canvas, self.parts.bench());
        }

        let Some(mount) = self.detail.as_mut() else {
            return;
        };
        let Some(o) = self.parts.overlay_mut() else {
            return;
        };
        overlay::set_loading(document, o.loading_text());
        let Some(canvas) = mount.canvas.as_ref() else {
            return;
        };
        o.scene_mut().set_viewport(canvas.width(), canvas.height());
        if let (Some(ctx), Some(gfx)) = (ctx, mount.gfx.as_mut()) {
            gfx.draw(ctx, canvas, o.scene());
        }
    }
}

pub struct ShowcaseView {
    pub showcase: Showcase,
    canvas: web::HtmlCanvasElement,
    gfx: Option<Gfx>,
}

impl ShowcaseView {
    pub fn new(showcase: Showcase, canvas: web::HtmlCanvasElement, gfx: Option<Gfx>) -> Self {
        Self {
            showcase,
            canvas,
            gfx,
        }
    }

    pub fn pointer_down(&mut self, ev: &web::PointerEvent) {
        let (sample, on_surface) = pointer_sample(ev, &self.canvas);
        self.showcase.scene_mut().pointer_down(sample, on_surface);
    }

    pub fn pointer_move(&mut self, ev: &web::PointerEvent) {
        let (sample, _) = pointer_sample(ev, &self.canvas);
        self.showcase.scene_mut().pointer_moved(sample.ndc);
    }

    pub fn pointer_up(&mut self, ev: &web::PointerEvent) {
        let (sample, on_surface) = pointer_sample(ev, &self.canvas);
        self.showcase.scene_mut().pointer_up(sample, on_surface);
    }

    pub fn pointer_cancel(&mut self, ev: &web::PointerEvent) {
        let (sample, _) = pointer_sample(ev, &self.canvas);
        self.showcase.scene_mut().pointer_up(sample, false);
    }

    pub fn frame(&mut self, document: &web::Document, ctx: Option<&GpuContext>) {
        self.showcase.update();
        dom::set_visible(document, SHOWCASE_PROMPT_ID, self.showcase.prompt_visible());
        self.showcase
            .scene_mut()
            .set_viewport(self.canvas.width(), self.canvas.height());
        if let (Some(ctx), Some(gfx)) = (ctx, self.gfx.as_mut()) {
            gfx.draw(ctx, &self.canvas, self.showcase.scene());
        }
    }
}

// Scene selectors handed to `assets::spawn_scene_loads`.

pub fn bench_scene(v: &mut BenchView) -> Option<&mut SceneHost> {
    Some(v.parts.bench_mut())
}

pub fn detail_scene(v: &mut BenchView) -> Option<&mut SceneHost> {
    v.parts.overlay_mut().map(|o| o.scene_mut())
}

pub fn showcase_scene(v: &mut ShowcaseView) -> Option<&mut SceneHost> {
    Some(v.showcase.scene_mut())
}
