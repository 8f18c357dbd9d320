//! Retained scene graph: a host owning camera, lights and model nodes, updated
//! by an explicit per-frame call.

use crate::asset::AssetReference;
use crate::camera::{ray_sphere, ray_triangle, Camera};
use crate::constants::*;
use crate::error::{FolioError, Result};
use crate::interaction::{DragScope, Gesture, InteractionController, Rotation};
use crate::mesh::{MeshData, NormalizedModel};
use glam::{EulerRot, Mat4, Vec2, Vec3};
use instant::Instant;

/// Callback fired with no arguments when a node is clicked; the composition
/// decides what "this node" means.
pub type SelectCallback = Box<dyn FnMut()>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// One pointer observation, in both coordinate spaces the host needs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
    /// Page/client position in CSS pixels; used for the click threshold.
    pub client: Vec2,
    /// Position relative to the host surface in NDC; used for rotation and picking.
    pub ndc: Vec2,
}

#[derive(Clone, Debug)]
pub struct LightRig {
    pub ambient: f32,
    pub key_position: Vec3,
    pub key_intensity: f32,
    pub environment_intensity: f32,
    pub environment_tint: [f32; 3],
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            ambient: AMBIENT_INTENSITY,
            key_position: KEY_LIGHT_POSITION,
            key_intensity: KEY_LIGHT_INTENSITY,
            environment_intensity: ENVIRONMENT_INTENSITY,
            environment_tint: ENVIRONMENT_TINT,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub label: &'static str,
    pub camera: Camera,
    pub lights: LightRig,
    pub clear_color: [f32; 3],
}

impl SceneConfig {
    pub fn new(label: &'static str, eye: Vec3, fovy_degrees: f32) -> Self {
        Self {
            label,
            camera: Camera::looking_at_origin(eye, fovy_degrees),
            lights: LightRig::default(),
            clear_color: BACKGROUND_RGB,
        }
    }
}

#[derive(Debug)]
pub enum LoadState {
    Loading { started: Instant },
    Ready(NormalizedModel),
    Failed(String),
}

/// Aggregate load progress of a host's nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadProgress {
    pub settled: usize,
    pub total: usize,
}

impl LoadProgress {
    pub fn percent(&self) -> f32 {
        if self.total == 0 {
            100.0
        } else {
            self.settled as f32 * 100.0 / self.total as f32
        }
    }

    pub fn is_complete(&self) -> bool {
        self.settled >= self.total
    }

    pub fn label(&self) -> String {
        format!("{:.0}% loaded", self.percent())
    }
}

pub struct ModelNode {
    asset: AssetReference,
    state: LoadState,
    controller: InteractionController,
    on_select: Option<SelectCallback>,
    opacity: f32,
    world: Mat4,
}

impl ModelNode {
    pub fn new(asset: AssetReference, controller: InteractionController) -> Self {
        let world = Mat4::from_translation(asset.position);
        Self {
            asset,
            state: LoadState::Loading {
                started: Instant::now(),
            },
            controller,
            on_select: None,
            opacity: 1.0,
            world,
        }
    }

    /// A node whose geometry is already in memory (e.g. a backdrop plane).
    pub fn from_mesh(
        asset: AssetReference,
        mesh: MeshData,
        controller: InteractionController,
    ) -> Result<Self> {
        let model = NormalizedModel::new(mesh, asset.offset, asset.display_scale)
            .ok_or_else(|| FolioError::EmptyAsset(asset.path.clone()))?;
        let mut node = Self::new(asset, controller);
        node.state = LoadState::Ready(model);
        node.refresh_world();
        Ok(node)
    }

    pub fn on_select(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_select = Some(Box::new(callback));
        self
    }

    pub fn asset(&self) -> &AssetReference {
        &self.asset
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn model(&self) -> Option<&NormalizedModel> {
        match &self.state {
            LoadState::Ready(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading { .. })
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn rotation(&self) -> Rotation {
        self.controller.rotation()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Group transform: position and rotation, without the asset's base transform.
    pub fn group_transform(&self) -> Mat4 {
        let r = self.controller.rotation();
        Mat4::from_translation(self.asset.position)
            * Mat4::from_euler(EulerRot::XYZ, r.pitch, r.yaw, 0.0)
    }

    /// Full model matrix (group transform times normalization), as last updated.
    pub fn world_transform(&self) -> Mat4 {
        self.world
    }

    fn refresh_world(&mut self) {
        let base = self.model().map(|m| m.base).unwrap_or(Mat4::IDENTITY);
        self.world = self.group_transform() * base;
    }

    /// Install the decoded mesh. A decode failure marks the node failed and is
    /// handed back to the caller; it is not retried.
    pub fn finish_load(&mut self, result: Result<MeshData>) -> Result<()> {
        let started = match self.state {
            LoadState::Loading { started } => started,
            _ => {
                log::warn!("[asset] {} settled twice; ignoring", self.asset.path);
                return Ok(());
            }
        };
        let outcome = result.and_then(|mesh| {
            NormalizedModel::new(mesh, self.asset.offset, self.asset.display_scale)
                .ok_or_else(|| FolioError::EmptyAsset(self.asset.path.clone()))
        });
        match outcome {
            Ok(model) => {
                log::info!(
                    "[asset] {} ready in {} ms ({} triangles)",
                    self.asset.path,
                    started.elapsed().as_millis(),
                    model.mesh.triangle_count()
                );
                self.state = LoadState::Ready(model);
                self.refresh_world();
                Ok(())
            }
            Err(e) => {
                self.state = LoadState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    fn pickable(&self) -> bool {
        self.controller.is_interactive()
            && self.controller.scope() == DragScope::Object
            && self.model().is_some()
    }

    /// Distance along the ray to the nearest triangle of the node's mesh, if
    /// hit. The bounding sphere only rejects rays early.
    pub fn hit_distance(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<f32> {
        if !self.pickable() {
            return None;
        }
        let model = self.model()?;
        let group = self.group_transform();
        let (local_center, radius) = model.local_bounding_sphere();
        ray_sphere(ray_origin, ray_dir, group.transform_point3(local_center), radius)?;

        // Test in mesh space; the direction stays unnormalized so `t` is
        // still a world-space distance.
        let inv = (group * model.base).inverse();
        let lo = inv.transform_point3(ray_origin);
        let ld = inv.transform_vector3(ray_dir);
        let positions = &model.mesh.vertices;
        model
            .mesh
            .indices
            .chunks_exact(3)
            .filter_map(|tri| {
                let a = Vec3::from(positions.get(tri[0] as usize)?.position);
                let b = Vec3::from(positions.get(tri[1] as usize)?.position);
                let c = Vec3::from(positions.get(tri[2] as usize)?.position);
                ray_triangle(lo, ld, a, b, c)
            })
            .min_by(|x, y| x.total_cmp(y))
    }

    fn select(&mut self) {
        if let Some(cb) = self.on_select.as_mut() {
            cb();
        }
    }
}

/// A rendering surface's scene: camera, lights and the nodes drawn into it.
pub struct SceneHost {
    label: &'static str,
    camera: Camera,
    lights: LightRig,
    clear_color: [f32; 3],
    nodes: Vec<ModelNode>,
    pointer_ndc: Vec2,
}

impl SceneHost {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            label: config.label,
            camera: config.camera,
            lights: config.lights,
            clear_color: config.clear_color,
            nodes: Vec::new(),
            pointer_ndc: Vec2::ZERO,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn add_node(&mut self, node: ModelNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &ModelNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn node(&self, id: NodeId) -> Option<&ModelNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut ModelNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn clear_color(&self) -> [f32; 3] {
        self.clear_color
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }

    /// Nodes still waiting for their asset, with the path to fetch.
    pub fn pending_loads(&self) -> Vec<(NodeId, String)> {
        self.nodes()
            .filter(|(_, n)| n.is_loading())
            .map(|(id, n)| (id, n.asset.path.clone()))
            .collect()
    }

    pub fn finish_load(&mut self, id: NodeId, result: Result<MeshData>) -> Result<()> {
        match self.nodes.get_mut(id.0) {
            Some(node) => node.finish_load(result),
            None => Ok(()),
        }
    }

    pub fn progress(&self) -> LoadProgress {
        LoadProgress {
            settled: self.nodes.iter().filter(|n| !n.is_loading()).count(),
            total: self.nodes.len(),
        }
    }

    pub fn pointer_moved(&mut self, ndc: Vec2) {
        self.pointer_ndc = ndc;
    }

    /// Nearest pickable node under a pointer inside the surface.
    pub fn pick(&self, ndc: Vec2) -> Option<NodeId> {
        if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 {
            return None;
        }
        let (ro, rd) = self.camera.ray_through_ndc(ndc);
        self.nodes()
            .filter_map(|(id, n)| n.hit_distance(ro, rd).map(|t| (id, t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Press anywhere on the page. `on_surface` is false when the press landed
    /// outside this host's surface; page-scoped nodes react either way.
    pub fn pointer_down(&mut self, p: PointerSample, on_surface: bool) -> Option<NodeId> {
        self.pointer_ndc = p.ndc;
        for node in self.nodes.iter_mut() {
            if node.controller.scope() == DragScope::Page {
                node.controller.pointer_down(p.client);
            }
        }
        let hit = if on_surface { self.pick(p.ndc) } else { None };
        if let Some(id) = hit {
            let node = &mut self.nodes[id.0];
            if node.controller.pointer_down(p.client) {
                log::debug!("[pointer] {} begin drag on {}", self.label, node.asset.id);
            }
        }
        hit
    }

    /// Release anywhere on the page. The node under the pointer (if any)
    /// classifies the gesture first; then every drag on the page ends.
    /// Returns the node whose selection callback fired.
    pub fn pointer_up(&mut self, p: PointerSample, on_surface: bool) -> Option<NodeId> {
        self.pointer_ndc = p.ndc;
        let mut clicked = None;
        if let Some(id) = on_surface.then(|| self.pick(p.ndc)).flatten() {
            let node = &mut self.nodes[id.0];
            match node.controller.pointer_up(p.client) {
                Gesture::Click => {
                    log::info!("[pointer] {} click on {}", self.label, node.asset.id);
                    node.select();
                    clicked = Some(id);
                }
                Gesture::Drag => {
                    log::debug!("[pointer] {} drag ended on {}", self.label, node.asset.id);
                }
                Gesture::Ignored => {}
            }
        }
        for node in self.nodes.iter_mut() {
            node.controller.release();
        }
        clicked
    }

    /// Advance every node by one rendered frame.
    pub fn update(&mut self) {
        let ndc = self.pointer_ndc;
        for node in self.nodes.iter_mut() {
            node.controller.update(ndc);
            node.refresh_world();
        }
    }

    pub fn is_any_dragging(&self) -> bool {
        self.nodes.iter().any(|n| n.controller.is_dragging())
    }
}
