#![cfg(target_arch = "wasm32")]
use folio_core::render::GpuContext;
use folio_core::{Showcase, SHOWCASE_PROMPT};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod assets;
mod dom;
mod events;
mod frame;
mod overlay;
mod views;

use views::{BenchView, Gfx, ShowcaseView};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("folio-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

/// Bring up WebGPU against the first canvas on the page. Without it the
/// viewers still load and react to input; they just draw nothing.
async fn init_gpu(
    first: Option<&web::HtmlCanvasElement>,
) -> (Option<Rc<GpuContext>>, Option<Gfx>) {
    let Some(canvas) = first else {
        return (None, None);
    };
    match frame::init_gpu(canvas).await {
        Ok((ctx, surface)) => {
            let gfx = Gfx::with_surface(&ctx, surface, canvas);
            (Some(ctx), Some(gfx))
        }
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            (None, None)
        }
    }
}

async fn init() -> anyhow::Result<()> {
    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let bench_canvas = dom::canvas_by_id(&document, views::BENCH_CANVAS_ID);
    let showcase_canvas = dom::canvas_by_id(&document, views::SHOWCASE_CANVAS_ID);
    if bench_canvas.is_none() && showcase_canvas.is_none() {
        return Err(anyhow::anyhow!(
            "missing #{} and #{}",
            views::BENCH_CANVAS_ID,
            views::SHOWCASE_CANVAS_ID
        ));
    }
    for c in bench_canvas.iter().chain(showcase_canvas.iter()) {
        dom::wire_canvas_resize(c);
    }

    let (gpu, first_gfx) = init_gpu(bench_canvas.as_ref().or(showcase_canvas.as_ref())).await;
    let mut first_gfx = first_gfx;
    let asset_base = dom::asset_base(&document);

    let bench = bench_canvas.map(|canvas| {
        let gfx = first_gfx
            .take()
            .or_else(|| views::try_gfx(gpu.as_deref(), &canvas));
        Rc::new(RefCell::new(BenchView::new(canvas, gfx)))
    });
    if let Some(b) = &bench {
        assets::spawn_scene_loads(b, views::bench_scene, None, &asset_base);
        events::wire_global_keydown(b.clone(), document.clone());
        events::wire_close_controls(b, &document);
    }

    let showcase = match (showcase_canvas, Showcase::new()) {
        (Some(canvas), Ok(showcase)) => {
            let gfx = first_gfx
                .take()
                .or_else(|| views::try_gfx(gpu.as_deref(), &canvas));
            dom::set_text(&document, views::SHOWCASE_PROMPT_ID, SHOWCASE_PROMPT);
            let view = Rc::new(RefCell::new(ShowcaseView::new(showcase, canvas.clone(), gfx)));
            assets::spawn_scene_loads(&view, views::showcase_scene, None, &asset_base);
            Some((view, canvas))
        }
        (Some(_), Err(e)) => {
            log::error!("[showcase] {}", e);
            None
        }
        (None, _) => None,
    };

    events::wire_input_handlers(events::InputWiring {
        bench: bench.clone(),
        showcase: showcase.clone(),
    });

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        document,
        gpu,
        bench,
        showcase: showcase.map(|(view, _)| view),
        asset_base,
        last_instant: Instant::now(),
        frames: 0,
    }));
    frame::start_loop(frame_ctx);
    log::info!("folio-web ready");
    Ok(())
}
