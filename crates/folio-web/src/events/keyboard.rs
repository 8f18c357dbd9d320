use crate::dom;
use crate::views::BenchView;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Keys that dismiss the detail overlay.
#[inline]
pub fn is_close_key(key: &str) -> bool {
    matches!(key, "Escape" | "Esc")
}

pub fn handle_global_keydown(
    ev: &web::KeyboardEvent,
    bench: &Rc<RefCell<BenchView>>,
    document: &web::Document,
) {
    if is_close_key(&ev.key()) {
        log::info!("[keys] close overlay");
        bench.borrow_mut().close_overlay(document);
        ev.prevent_default();
    }
}

pub fn wire_global_keydown(bench: Rc<RefCell<BenchView>>, document: web::Document) {
    if let Some(window) = web::window() {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                handle_global_keydown(&ev, &bench, &document);
            }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

pub fn wire_close_controls(bench: &Rc<RefCell<BenchView>>, document: &web::Document) {
    let bench = bench.clone();
    let doc = document.clone();
    dom::add_click_listener(document, "detail-close", move || {
        bench.borrow_mut().close_overlay(&doc);
    });
}

