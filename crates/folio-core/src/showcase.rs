//! Hero showcase: one microcontroller model on a backdrop, dimmed until the
//! pointer hovers the surface. Any press on the page starts a drag.

use crate::asset::AssetReference;
use crate::constants::*;
use crate::error::Result;
use crate::interaction::{DragScope, InteractionController};
use crate::mesh::MeshData;
use crate::parts;
use crate::scene::{ModelNode, NodeId, SceneConfig, SceneHost};
use glam::Vec3;

pub const SHOWCASE_PART_ID: &str = "stm32";
pub const SHOWCASE_PROMPT: &str = "Interact with me! Hover and drag to rotate";

pub struct Showcase {
    scene: SceneHost,
    model: NodeId,
    hovered: bool,
}

impl Showcase {
    pub fn new() -> Result<Self> {
        let part = parts::part(SHOWCASE_PART_ID)?;
        let mut scene = SceneHost::new(SceneConfig::new(
            "showcase",
            SHOWCASE_CAMERA_EYE,
            SHOWCASE_CAMERA_FOV_DEG,
        ));
        let [r, g, b] = linear_from_srgb(BACKGROUND_RGB);
        scene.add_node(ModelNode::from_mesh(
            AssetReference::new("backdrop", "builtin:plane", 1.0).at(Vec3::new(
                0.0,
                0.0,
                SHOWCASE_BACKDROP_Z,
            )),
            MeshData::plane(SHOWCASE_BACKDROP_SIZE, [r, g, b, 1.0]),
            InteractionController::new(0.0).non_interactive(),
        )?);
        let model = scene.add_node(ModelNode::new(
            AssetReference::new(part.id, part.asset_path, SHOWCASE_MODEL_SCALE),
            InteractionController::new(SHOWCASE_IDLE_SPIN).with_scope(DragScope::Page),
        ));
        let mut showcase = Self {
            scene,
            model,
            hovered: false,
        };
        showcase.set_hovered(false);
        Ok(showcase)
    }

    pub fn scene(&self) -> &SceneHost {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneHost {
        &mut self.scene
    }

    pub fn model_id(&self) -> NodeId {
        self.model
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
        let opacity = if hovered { 1.0 } else { SHOWCASE_DIMMED_OPACITY };
        if let Some(node) = self.scene.node_mut(self.model) {
            node.set_opacity(opacity);
        }
    }

    /// The floating hint is shown until the pointer enters the surface.
    pub fn prompt_visible(&self) -> bool {
        !self.hovered
    }

    pub fn update(&mut self) {
        self.scene.update();
    }
}
