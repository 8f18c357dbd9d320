//! Platform-free core of the folio parts viewer: part catalog, asset
//! decoding and normalization, pointer interaction, scene hosts and the
//! detail overlay. The `gpu` feature adds the shared wgpu renderer.

pub mod asset;
pub mod bench;
pub mod camera;
pub mod constants;
pub mod error;
pub mod glb;
pub mod interaction;
pub mod mesh;
pub mod overlay;
pub mod parts;
pub mod scene;
pub mod selection;
pub mod showcase;

#[cfg(feature = "gpu")]
pub mod render;

pub use asset::*;
pub use bench::*;
pub use camera::*;
pub use constants::*;
pub use error::{FolioError, Result};
pub use glb::decode_glb;
pub use interaction::*;
pub use mesh::*;
pub use overlay::*;
pub use parts::*;
pub use scene::*;
pub use selection::*;
pub use showcase::*;
