//! Detail overlay: the modal close-up of one selected part.

use crate::asset::AssetReference;
use crate::constants::{BENCH_IDLE_SPIN, DETAIL_CAMERA_EYE, DETAIL_CAMERA_FOV_DEG};
use crate::error::Result;
use crate::interaction::InteractionController;
use crate::parts::{self, PartDescriptor};
use crate::scene::{ModelNode, SceneConfig, SceneHost};
use crate::selection::SelectionState;

pub const OVERLAY_LOADING_TEXT: &str = "Loading...";

/// Plain data the front-end needs to draw the overlay's text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayView {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

impl From<&'static PartDescriptor> for OverlayView {
    fn from(part: &'static PartDescriptor) -> Self {
        Self {
            id: part.id,
            name: part.name,
            description: part.description,
        }
    }
}

/// What the overlay should show for a given selection; `None` when nothing is selected.
pub fn overlay_view(selection: &SelectionState) -> Result<Option<OverlayView>> {
    selection
        .selected()
        .map(|id| parts::part(id).map(OverlayView::from))
        .transpose()
}

/// A mounted overlay. Owns its own scene host, which is dropped with it.
pub struct DetailOverlay {
    part: &'static PartDescriptor,
    scene: SceneHost,
}

impl DetailOverlay {
    pub fn open(id: &str) -> Result<Self> {
        let part = parts::part(id)?;
        let mut scene = SceneHost::new(SceneConfig::new(
            "detail",
            DETAIL_CAMERA_EYE,
            DETAIL_CAMERA_FOV_DEG,
        ));
        scene.add_node(ModelNode::new(
            AssetReference::detail(part),
            InteractionController::new(BENCH_IDLE_SPIN),
        ));
        Ok(Self { part, scene })
    }

    pub fn part(&self) -> &'static PartDescriptor {
        self.part
    }

    pub fn view(&self) -> OverlayView {
        OverlayView::from(self.part)
    }

    pub fn scene(&self) -> &SceneHost {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneHost {
        &mut self.scene
    }

    /// Fallback text shown over the close-up until its asset settles.
    pub fn loading_text(&self) -> Option<&'static str> {
        (!self.scene.progress().is_complete()).then_some(OVERLAY_LOADING_TEXT)
    }
}
