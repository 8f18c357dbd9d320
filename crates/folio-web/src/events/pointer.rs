use crate::views::{BenchView, ShowcaseView};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct InputWiring {
    pub bench: Option<Rc<RefCell<BenchView>>>,
    pub showcase: Option<(Rc<RefCell<ShowcaseView>>, web::HtmlCanvasElement)>,
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_window("pointerdown", &w, |b, ev| b.pointer_down(ev), |s, ev| s.pointer_down(ev));
    wire_window("pointermove", &w, |b, ev| b.pointer_move(ev), |s, ev| s.pointer_move(ev));
    wire_window("pointerup", &w, |b, ev| b.pointer_up(ev), |s, ev| s.pointer_up(ev));
    // a cancelled pointer still has to end every drag on the page
    wire_window(
        "pointercancel",
        &w,
        |b, ev| b.pointer_cancel(ev),
        |s, ev| s.pointer_cancel(ev),
    );
    if let Some((showcase, canvas)) = &w.showcase {
        wire_hover(showcase, canvas);
    }
}

// Listeners live on the window so a release anywhere on the page ends a drag.
fn wire_window(
    event: &str,
    w: &InputWiring,
    on_bench: fn(&mut BenchView, &web::PointerEvent),
    on_showcase: fn(&mut ShowcaseView, &web::PointerEvent),
) {
    let w = w.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        if let Some(bench) = &w.bench {
            on_bench(&mut bench.borrow_mut(), &ev);
        }
        if let Some((showcase, _)) = &w.showcase {
            on_showcase(&mut showcase.borrow_mut(), &ev);
        }
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_hover(showcase: &Rc<RefCell<ShowcaseView>>, canvas: &web::HtmlCanvasElement) {
    for (event, hovered) in [("pointerenter", true), ("pointerleave", false)] {
        let showcase = showcase.clone();
        let closure = Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
            showcase.borrow_mut().showcase.set_hovered(hovered);
            log::debug!("[pointer] showcase hovered={}", hovered);
        }) as Box<dyn FnMut(_)>);
        _ = canvas.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
