use crate::assets;
use crate::views::{self, BenchView, ShowcaseView};
use folio_core::render::GpuContext;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub document: web::Document,
    pub gpu: Option<Rc<GpuContext>>,
    pub bench: Option<Rc<RefCell<BenchView>>>,
    pub showcase: Option<Rc<RefCell<ShowcaseView>>>,
    pub asset_base: String,
    pub last_instant: Instant,
    pub frames: u64,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let ctx = self.gpu.as_deref();

        if let Some(bench) = &self.bench {
            let mounted = bench.borrow_mut().sync_overlay(&self.document, ctx);
            if let Some(token) = mounted {
                assets::spawn_scene_loads(bench, views::detail_scene, Some(token), &self.asset_base);
            }
            bench.borrow_mut().frame(&self.document, ctx);
        }
        if let Some(showcase) = &self.showcase {
            showcase.borrow_mut().frame(&self.document, ctx);
        }

        self.frames += 1;
        let elapsed = self.last_instant.elapsed();
        if elapsed.as_secs() >= 10 {
            log::debug!(
                "[frame] {:.1} fps",
                self.frames as f32 / elapsed.as_secs_f32()
            );
            self.frames = 0;
            self.last_instant = Instant::now();
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
) -> anyhow::Result<(Rc<GpuContext>, wgpu::Surface<'static>)> {
    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
    let ctx = GpuContext::new(instance, Some(&surface)).await?;
    Ok((Rc::new(ctx), surface))
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
