mod common;

use std::cell::Cell;
use std::f32::consts::PI;
use std::rc::Rc;

use common::{cube, cuboid, load_all_with_cubes, ndc_of};
use folio_core::{
    pointer_ndc, AssetReference, FolioError, InteractionController, ModelNode, NodeId,
    OverlayChange, PartsBench, PointerSample, SceneConfig, SceneHost, BENCH_CAMERA_EYE,
    BENCH_CAMERA_FOV_DEG, OVERLAY_LOADING_TEXT,
};
use glam::{Vec2, Vec3};

fn loaded_bench() -> PartsBench {
    let mut bench = PartsBench::new();
    // wide strip, like the page's bench canvas
    bench.bench_mut().set_viewport(1500, 400);
    load_all_with_cubes(bench.bench_mut());
    bench
}

fn node_of(bench: &PartsBench, id: &str) -> NodeId {
    bench
        .bench()
        .nodes()
        .find(|(_, n)| n.asset().id == id)
        .map(|(nid, _)| nid)
        .unwrap()
}

fn sample_on(bench: &PartsBench, id: &str, client: (f32, f32)) -> PointerSample {
    let node = bench.bench().node(node_of(bench, id)).unwrap();
    PointerSample {
        client: Vec2::new(client.0, client.1),
        ndc: ndc_of(bench.bench(), node.asset().position),
    }
}

#[test]
fn bench_has_four_parts_in_catalog_order() {
    let bench = PartsBench::new();
    let ids: Vec<_> = bench
        .bench()
        .nodes()
        .map(|(_, n)| n.asset().id.clone())
        .collect();
    assert_eq!(ids, ["stm32", "lcd", "joystick", "breadboard"]);
    assert!(bench.bench().nodes().all(|(_, n)| n.is_loading()));
}

#[test]
fn short_press_on_part_selects_it() {
    let mut bench = loaded_bench();
    let down = sample_on(&bench, "stm32", (100.0, 100.0));
    let up = sample_on(&bench, "stm32", (102.0, 101.0));

    assert_eq!(bench.bench_mut().pointer_down(down, true), Some(node_of(&bench, "stm32")));
    let clicked = bench.bench_mut().pointer_up(up, true);

    assert_eq!(clicked, Some(node_of(&bench, "stm32")));
    assert_eq!(bench.selection().selected(), Some("stm32"));
}

#[test]
fn long_drag_does_not_select() {
    let mut bench = loaded_bench();
    let down = sample_on(&bench, "stm32", (100.0, 100.0));
    let up = sample_on(&bench, "stm32", (200.0, 100.0));

    bench.bench_mut().pointer_down(down, true);
    assert!(bench.bench().is_any_dragging());
    assert_eq!(bench.bench_mut().pointer_up(up, true), None);
    assert!(bench.selection().is_empty());
    assert!(!bench.bench().is_any_dragging());
}

#[test]
fn release_without_press_does_nothing() {
    let mut bench = loaded_bench();
    let up = sample_on(&bench, "lcd", (50.0, 50.0));
    assert_eq!(bench.bench_mut().pointer_up(up, true), None);
    assert!(bench.selection().is_empty());
}

#[test]
fn release_off_surface_ends_drag_without_selecting() {
    let mut bench = loaded_bench();
    let down = sample_on(&bench, "joystick", (10.0, 10.0));
    bench.bench_mut().pointer_down(down, true);

    let outside = PointerSample {
        client: Vec2::new(11.0, 10.0),
        ndc: Vec2::new(3.0, 3.0),
    };
    assert_eq!(bench.bench_mut().pointer_up(outside, false), None);
    assert!(!bench.bench().is_any_dragging());
    assert!(bench.selection().is_empty());
}

#[test]
fn parts_still_loading_cannot_be_clicked() {
    let mut bench = PartsBench::new();
    bench.bench_mut().set_viewport(1500, 400);
    let ndc = ndc_of(bench.bench(), glam::Vec3::new(-1.25, 0.0, 0.0));
    let p = PointerSample {
        client: Vec2::new(1.0, 1.0),
        ndc,
    };
    assert_eq!(bench.bench_mut().pointer_down(p, true), None);
    assert_eq!(bench.bench_mut().pointer_up(p, true), None);
    assert!(bench.selection().is_empty());
}

#[test]
fn idle_spin_advances_every_frame() {
    let mut bench = loaded_bench();
    let id = node_of(&bench, "breadboard");
    let mut last = bench.bench().node(id).unwrap().rotation().yaw;
    for _ in 0..10 {
        bench.update();
        let yaw = bench.bench().node(id).unwrap().rotation().yaw;
        assert!(yaw > last);
        last = yaw;
    }
}

#[test]
fn drag_rotation_depends_only_on_pointer() {
    let mut bench = loaded_bench();
    let id = node_of(&bench, "lcd");
    let down = sample_on(&bench, "lcd", (0.0, 0.0));
    bench.bench_mut().pointer_down(down, true);

    bench.bench_mut().pointer_moved(Vec2::new(0.25, -0.5));
    bench.update();
    let first = bench.bench().node(id).unwrap().rotation();
    bench.update();
    bench.update();
    let later = bench.bench().node(id).unwrap().rotation();
    assert_eq!(first, later);
    assert!((first.yaw - 0.25 * PI * 4.0).abs() < 1e-5);
    assert!((first.pitch + 0.5 * PI * 0.8).abs() < 1e-5);
}

#[test]
fn dragging_past_the_canvas_edge_holds_the_edge_angle() {
    let mut bench = loaded_bench();
    let id = node_of(&bench, "lcd");
    let down = sample_on(&bench, "lcd", (0.0, 0.0));
    bench.bench_mut().pointer_down(down, true);

    // pointer dragged well outside the 1500x400 surface, below and right
    let outside = pointer_ndc(Vec2::new(3000.0, 1200.0), Vec2::new(1500.0, 400.0));
    assert!(outside.x > 1.0 && outside.y < -1.0);
    bench.bench_mut().pointer_moved(outside);
    bench.update();

    let r = bench.bench().node(id).unwrap().rotation();
    assert!(r.yaw.abs() <= 4.0 * PI + 1e-5);
    assert!(r.pitch.abs() <= 0.8 * PI + 1e-5);
    assert!((r.yaw - 4.0 * PI).abs() < 1e-5);
    assert!((r.pitch + 0.8 * PI).abs() < 1e-5);
}

#[test]
fn overlapping_bounds_pick_the_part_actually_under_the_pointer() {
    let mut bench = PartsBench::new();
    bench.bench_mut().set_viewport(1500, 400);
    for (id, path) in bench.bench().pending_loads() {
        // a wide flat board whose bounding sphere reaches over the joystick
        let mesh = if path.contains("breadboard") {
            cuboid(Vec3::ZERO, Vec3::new(0.4, 0.01, 0.4))
        } else {
            cube(Vec3::ZERO, 0.02)
        };
        bench.bench_mut().finish_load(id, Ok(mesh)).unwrap();
    }

    let joystick = node_of(&bench, "joystick");
    let breadboard = node_of(&bench, "breadboard");
    let scene = bench.bench();
    let at_joystick = ndc_of(scene, scene.node(joystick).unwrap().asset().position);
    let at_board = ndc_of(scene, scene.node(breadboard).unwrap().asset().position);

    assert_eq!(scene.pick(at_joystick), Some(joystick));
    assert_eq!(scene.pick(at_board), Some(breadboard));
}

#[test]
fn select_callback_fires_once_per_click() {
    let hits = Rc::new(Cell::new(0u32));
    let mut scene = SceneHost::new(SceneConfig::new("bench", BENCH_CAMERA_EYE, BENCH_CAMERA_FOV_DEG));
    scene.set_viewport(1500, 400);
    let counter = hits.clone();
    let node = ModelNode::from_mesh(
        AssetReference::new("stm32", "/stm32.glb", 15.0).at(Vec3::new(-4.5, 0.0, 0.0)),
        cube(Vec3::ZERO, 0.05),
        InteractionController::new(0.005),
    )
    .unwrap()
    .on_select(move || counter.set(counter.get() + 1));
    let id = scene.add_node(node);

    let ndc = ndc_of(&scene, Vec3::new(-4.5, 0.0, 0.0));
    let at = |x: f32, y: f32| PointerSample {
        client: Vec2::new(x, y),
        ndc,
    };

    scene.pointer_down(at(100.0, 100.0), true);
    assert_eq!(scene.pointer_up(at(102.0, 101.0), true), Some(id));
    assert_eq!(scene.pointer_up(at(102.0, 101.0), true), None);
    assert_eq!(hits.get(), 1);

    scene.pointer_down(at(100.0, 100.0), true);
    scene.pointer_up(at(200.0, 100.0), true);
    assert_eq!(hits.get(), 1);
}

#[test]
fn loader_label_tracks_settled_assets() {
    let mut bench = PartsBench::new();
    assert_eq!(bench.bench().progress().label(), "0% loaded");

    let pending = bench.bench().pending_loads();
    assert_eq!(pending.len(), 4);
    assert_eq!(pending[0].1, "/stm32.glb");

    let (first, _) = pending[0];
    bench
        .bench_mut()
        .finish_load(first, Ok(common::cube(glam::Vec3::ZERO, 0.1)))
        .unwrap();
    let (second, _) = pending[1];
    let err = bench
        .bench_mut()
        .finish_load(second, Err(FolioError::EmptyAsset("/lcd.glb".into())));
    assert!(err.is_err());

    let progress = bench.bench().progress();
    assert_eq!(progress.label(), "50% loaded");
    assert!(!progress.is_complete());
}

#[test]
fn overlay_opens_for_selected_part() {
    let mut bench = loaded_bench();
    bench.select("lcd");

    let change = bench.sync_overlay().unwrap();
    let OverlayChange::Opened(view) = change else {
        panic!("expected overlay to open, got {:?}", change);
    };
    assert_eq!(view.name, "LCD Display");
    assert_eq!(
        view.description,
        "This is the LCD screen used to display the game state."
    );
    assert!(!bench.bench_accepts_input());

    let overlay = bench.overlay().unwrap();
    assert_eq!(overlay.loading_text(), Some(OVERLAY_LOADING_TEXT));
    assert_eq!(overlay.scene().pending_loads()[0].1, "/lcd.glb");
    assert_eq!(bench.sync_overlay().unwrap(), OverlayChange::Unchanged);
}

#[test]
fn closing_overlay_clears_selection_and_drops_scene() {
    let mut bench = loaded_bench();
    bench.select("lcd");
    bench.sync_overlay().unwrap();
    load_all_with_cubes(bench.overlay_mut().unwrap().scene_mut());
    for _ in 0..5 {
        bench.update();
    }

    assert_eq!(bench.close_overlay(), OverlayChange::Closed);
    assert!(bench.selection().selected().is_none());
    assert!(bench.overlay().is_none());
    assert!(bench.bench_accepts_input());

    bench.select("joystick");
    bench.sync_overlay().unwrap();
    let overlay = bench.overlay().unwrap();
    assert_eq!(overlay.view().name, "Potentiometer Joystick");
    let (_, node) = overlay.scene().nodes().next().unwrap();
    assert!(node.is_loading());
    assert_eq!(node.rotation().yaw, 0.0);
}

#[test]
fn unknown_selection_is_rejected() {
    let mut bench = PartsBench::new();
    bench.select("arduino");
    let err = bench.sync_overlay().unwrap_err();
    assert_eq!(err.to_string(), "unknown part id: arduino");
    assert!(bench.selection().is_empty());
    assert!(bench.overlay().is_none());
}
