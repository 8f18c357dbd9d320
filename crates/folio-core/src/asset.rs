use crate::constants::{BENCH_MODEL_SCALE, BENCH_SLOT_X, DETAIL_MODEL_SCALE};
use crate::parts::{PartDescriptor, PARTS};
use glam::Vec3;

/// A loadable 3D asset and its placement within a scene.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetReference {
    pub id: String,
    pub path: String,
    pub display_scale: f32,
    /// World-space position of the rotating group.
    pub position: Vec3,
    /// Offset applied after the asset has been centered on the origin.
    pub offset: Vec3,
}

impl AssetReference {
    pub fn new(id: impl Into<String>, path: impl Into<String>, display_scale: f32) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            display_scale,
            position: Vec3::ZERO,
            offset: Vec3::ZERO,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Close-up reference used by the detail overlay.
    pub fn detail(part: &PartDescriptor) -> Self {
        Self::new(part.id, part.asset_path, DETAIL_MODEL_SCALE)
    }
}

/// The four bench slots, one per catalog entry, left to right.
pub fn bench_layout() -> Vec<AssetReference> {
    PARTS
        .iter()
        .zip(BENCH_SLOT_X)
        .map(|(part, x)| {
            AssetReference::new(part.id, part.asset_path, BENCH_MODEL_SCALE)
                .at(Vec3::new(x, 0.0, 0.0))
        })
        .collect()
}

/// Resolve a page-relative asset path against a base (URL prefix or directory).
pub fn resolve_path(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if base.is_empty() {
        format!("/{}", path)
    } else {
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bench_layout_orders_parts_left_to_right() {
        let slots = bench_layout();
        let ids: Vec<&str> = slots.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["stm32", "lcd", "joystick", "breadboard"]);
        assert!(slots.windows(2).all(|w| w[0].position.x < w[1].position.x));
        assert!(slots.iter().all(|s| s.display_scale == BENCH_MODEL_SCALE));
    }

    #[test]
    fn resolve_path_joins_without_double_slashes() {
        assert_eq!(resolve_path("assets/", "/lcd.glb"), "assets/lcd.glb");
        assert_eq!(resolve_path("", "/lcd.glb"), "/lcd.glb");
        assert_eq!(resolve_path("https://cdn.example", "lcd.glb"), "https://cdn.example/lcd.glb");
    }
}
