use crate::dom;
use folio_core::OverlayView;
use web_sys as web;

pub const OVERLAY_ID: &str = "detail-overlay";

#[inline]
pub fn show(document: &web::Document, view: &OverlayView) {
    dom::set_text(document, "detail-name", view.name);
    dom::set_text(document, "detail-description", view.description);
    dom::set_visible(document, OVERLAY_ID, true);
}

#[inline]
pub fn hide(document: &web::Document) {
    dom::set_visible(document, OVERLAY_ID, false);
}

/// Loader text over the close-up; hidden once the model has settled.
pub fn set_loading(document: &web::Document, text: Option<&str>) {
    match text {
        Some(t) => {
            dom::set_text(document, "detail-loader", t);
            dom::set_visible(document, "detail-loader", true);
        }
        None => dom::set_visible(document, "detail-loader", false),
    }
}
