//! The "materials used" section: four parts on a bench plus the detail
//! overlay that opens when one of them is clicked.

use crate::asset::bench_layout;
use crate::constants::{BENCH_CAMERA_EYE, BENCH_CAMERA_FOV_DEG, BENCH_IDLE_SPIN};
use crate::error::Result;
use crate::interaction::InteractionController;
use crate::overlay::{overlay_view, DetailOverlay, OverlayView};
use crate::scene::{ModelNode, SceneConfig, SceneHost};
use crate::selection::SelectionState;
use std::cell::RefCell;
use std::rc::Rc;

/// Result of reconciling the overlay with the current selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverlayChange {
    Unchanged,
    Opened(OverlayView),
    Closed,
}

pub struct PartsBench {
    bench: SceneHost,
    selection: Rc<RefCell<SelectionState>>,
    overlay: Option<DetailOverlay>,
}

impl PartsBench {
    pub fn new() -> Self {
        let selection = Rc::new(RefCell::new(SelectionState::default()));
        let mut bench = SceneHost::new(SceneConfig::new(
            "bench",
            BENCH_CAMERA_EYE,
            BENCH_CAMERA_FOV_DEG,
        ));
        for asset in bench_layout() {
            let id = asset.id.clone();
            let sel = selection.clone();
            bench.add_node(
                ModelNode::new(asset, InteractionController::new(BENCH_IDLE_SPIN))
                    .on_select(move || sel.borrow_mut().select(id.clone())),
            );
        }
        Self {
            bench,
            selection,
            overlay: None,
        }
    }

    pub fn bench(&self) -> &SceneHost {
        &self.bench
    }

    pub fn bench_mut(&mut self) -> &mut SceneHost {
        &mut self.bench
    }

    pub fn selection(&self) -> SelectionState {
        self.selection.borrow().clone()
    }

    pub fn overlay(&self) -> Option<&DetailOverlay> {
        self.overlay.as_ref()
    }

    pub fn overlay_mut(&mut self) -> Option<&mut DetailOverlay> {
        self.overlay.as_mut()
    }

    /// The overlay is modal: while it is open the bench receives no input.
    pub fn bench_accepts_input(&self) -> bool {
        self.overlay.is_none()
    }

    /// Select a part directly (same effect as clicking it on the bench).
    pub fn select(&mut self, id: &str) {
        self.selection.borrow_mut().select(id);
    }

    /// Mount or unmount the overlay so it matches the selection. A failed
    /// lookup clears the selection and reports the error.
    pub fn sync_overlay(&mut self) -> Result<OverlayChange> {
        let selection = self.selection.borrow().clone();
        let view = match overlay_view(&selection) {
            Ok(v) => v,
            Err(e) => {
                self.selection.borrow_mut().clear();
                self.overlay = None;
                return Err(e);
            }
        };
        let open_id = self.overlay.as_ref().map(|o| o.part().id);
        match (view, open_id) {
            (None, None) => Ok(OverlayChange::Unchanged),
            (None, Some(_)) => {
                self.overlay = None;
                log::info!("[overlay] closed");
                Ok(OverlayChange::Closed)
            }
            (Some(v), Some(open)) if open == v.id => Ok(OverlayChange::Unchanged),
            (Some(v), _) => {
                self.overlay = Some(DetailOverlay::open(v.id)?);
                log::info!("[overlay] opened {}", v.id);
                Ok(OverlayChange::Opened(v))
            }
        }
    }

    /// Clear the selection and unmount the overlay with its scene.
    pub fn close_overlay(&mut self) -> OverlayChange {
        self.selection.borrow_mut().clear();
        match self.sync_overlay() {
            Ok(change) => change,
            Err(_) => OverlayChange::Closed,
        }
    }

    /// Advance the bench and, if mounted, the overlay's scene by one frame.
    pub fn update(&mut self) {
        self.bench.update();
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.scene_mut().update();
        }
    }
}

impl Default for PartsBench {
    fn default() -> Self {
        Self::new()
    }
}
