//! Fetching `.glb` files and handing the decoded meshes back to their scene.

use folio_core::{decode_glb, resolve_path, FolioError, MeshData, SceneHost};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

fn load_error(path: &str, e: impl std::fmt::Debug) -> FolioError {
    FolioError::Load {
        path: path.to_string(),
        reason: format!("{:?}", e),
    }
}

pub async fn fetch_glb(path: &str) -> Result<MeshData, FolioError> {
    let window = web::window().ok_or_else(|| load_error(path, "no window"))?;
    let resp = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(|e| load_error(path, e))?;
    let resp: web::Response = resp.dyn_into().map_err(|e| load_error(path, e))?;
    if !resp.ok() {
        return Err(FolioError::Load {
            path: path.to_string(),
            reason: format!("HTTP {}", resp.status()),
        });
    }
    let buf = JsFuture::from(resp.array_buffer().map_err(|e| load_error(path, e))?)
        .await
        .map_err(|e| load_error(path, e))?;
    let bytes = js_sys::Uint8Array::new(&buf).to_vec();
    decode_glb(path, &bytes)
}

/// Start a fetch for every node of the selected scene that is still loading.
///
/// Results are delivered through weak handles: if the owner is gone, or the
/// `mount` token has been dropped because the scene was unmounted, the mesh
/// is discarded.
pub fn spawn_scene_loads<T: 'static>(
    owner: &Rc<RefCell<T>>,
    scene_of: fn(&mut T) -> Option<&mut SceneHost>,
    mount: Option<Weak<()>>,
    base: &str,
) {
    let pending = match scene_of(&mut owner.borrow_mut()) {
        Some(scene) => scene.pending_loads(),
        None => return,
    };
    for (node, path) in pending {
        let url = resolve_path(base, &path);
        let owner = Rc::downgrade(owner);
        let mount = mount.clone();
        spawn_local(async move {
            log::debug!("[asset] fetching {}", url);
            let result = fetch_glb(&url).await;
            let Some(owner) = owner.upgrade() else {
                return;
            };
            if let Some(m) = mount.as_ref() {
                if m.upgrade().is_none() {
                    log::debug!("[asset] {} arrived after unmount; dropped", url);
                    return;
                }
            }
            let mut owner = owner.borrow_mut();
            if let Some(scene) = scene_of(&mut owner) {
                if let Err(e) = scene.finish_load(node, result) {
                    log::error!("[asset] {}", e);
                }
            }
        });
    }
}
