//! Per-object pointer interaction: drag-to-rotate, click-to-select, idle spin.

use crate::constants::{DRAG_CLICK_THRESHOLD_PX, DRAG_PITCH_RANGE, DRAG_YAW_RANGE};
use glam::Vec2;
use std::f32::consts::TAU;

/// Where a drag may begin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragScope {
    /// Only a pointer-down that hits the object starts a drag.
    #[default]
    Object,
    /// Any pointer-down on the page starts a drag; such objects never select.
    Page,
}

/// How a completed press/release pair was interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    Click,
    Drag,
    /// Release without a matching press on this object.
    Ignored,
}

/// Drag bookkeeping owned by exactly one controller.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragState {
    pub is_dragging: bool,
    /// Client-space press position; `None` once the press has been consumed.
    pub start_pointer: Option<Vec2>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotation {
    /// Rotation about the vertical axis (radians).
    pub yaw: f32,
    /// Tilt about the horizontal axis (radians).
    pub pitch: f32,
}

/// Rotation while dragging: a pure function of the pointer position in NDC.
/// Positions past the surface edge saturate at the edge angle.
#[inline]
pub fn drag_rotation(pointer_ndc: Vec2) -> Rotation {
    let p = pointer_ndc.clamp(Vec2::NEG_ONE, Vec2::ONE);
    Rotation {
        yaw: p.x * DRAG_YAW_RANGE,
        pitch: p.y * DRAG_PITCH_RANGE,
    }
}

#[inline]
pub fn is_click(start: Vec2, end: Vec2) -> bool {
    start.distance(end) < DRAG_CLICK_THRESHOLD_PX
}

#[derive(Clone, Debug)]
pub struct InteractionController {
    drag: DragState,
    rotation: Rotation,
    idle_spin: f32,
    interactive: bool,
    scope: DragScope,
}

impl InteractionController {
    pub fn new(idle_spin: f32) -> Self {
        Self {
            drag: DragState::default(),
            rotation: Rotation::default(),
            idle_spin,
            interactive: true,
            scope: DragScope::Object,
        }
    }

    pub fn with_scope(mut self, scope: DragScope) -> Self {
        self.scope = scope;
        self
    }

    /// Spin only; pointer presses are ignored.
    pub fn non_interactive(mut self) -> Self {
        self.interactive = false;
        self
    }

    pub fn scope(&self) -> DragScope {
        self.scope
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Press on this object (or anywhere, for page-scoped controllers).
    /// The latest press wins when several pointers are down.
    pub fn pointer_down(&mut self, client: Vec2) -> bool {
        if !self.interactive {
            return false;
        }
        self.drag = DragState {
            is_dragging: true,
            start_pointer: Some(client),
        };
        true
    }

    /// Release over this object. Consumes the press and classifies the gesture.
    pub fn pointer_up(&mut self, client: Vec2) -> Gesture {
        self.drag.is_dragging = false;
        let Some(start) = self.drag.start_pointer.take() else {
            return Gesture::Ignored;
        };
        if self.scope == DragScope::Page {
            return Gesture::Drag;
        }
        if is_click(start, client) {
            Gesture::Click
        } else {
            Gesture::Drag
        }
    }

    /// Release anywhere on the page: ends the drag without classifying it.
    pub fn release(&mut self) {
        self.drag = DragState::default();
    }

    /// Advance one rendered frame and return the rotation to apply.
    pub fn update(&mut self, pointer_ndc: Vec2) -> Rotation {
        if self.interactive && self.drag.is_dragging {
            self.rotation = drag_rotation(pointer_ndc);
        } else {
            self.rotation.yaw = (self.rotation.yaw + self.idle_spin).rem_euclid(TAU);
        }
        self.rotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_release_is_a_click() {
        let mut c = InteractionController::new(0.005);
        assert!(c.pointer_down(Vec2::new(100.0, 100.0)));
        assert_eq!(c.pointer_up(Vec2::new(102.0, 101.0)), Gesture::Click);
        assert!(!c.is_dragging());
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut c = InteractionController::new(0.005);
        c.pointer_down(Vec2::new(0.0, 0.0));
        assert_eq!(c.pointer_up(Vec2::new(3.0, 4.0)), Gesture::Drag);
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut c = InteractionController::new(0.005);
        assert_eq!(c.pointer_up(Vec2::new(0.0, 0.0)), Gesture::Ignored);
        c.pointer_down(Vec2::ZERO);
        c.pointer_up(Vec2::ZERO);
        assert_eq!(c.pointer_up(Vec2::ZERO), Gesture::Ignored);
    }

    #[test]
    fn page_release_disarms_the_press() {
        let mut c = InteractionController::new(0.005);
        c.pointer_down(Vec2::new(10.0, 10.0));
        c.release();
        assert!(!c.is_dragging());
        assert_eq!(c.pointer_up(Vec2::new(10.0, 10.0)), Gesture::Ignored);
    }

    #[test]
    fn latest_press_wins() {
        let mut c = InteractionController::new(0.005);
        c.pointer_down(Vec2::new(0.0, 0.0));
        c.pointer_down(Vec2::new(300.0, 300.0));
        assert_eq!(c.pointer_up(Vec2::new(301.0, 300.0)), Gesture::Click);
    }

    #[test]
    fn non_interactive_ignores_presses() {
        let mut c = InteractionController::new(0.005).non_interactive();
        assert!(!c.pointer_down(Vec2::ZERO));
        assert_eq!(c.pointer_up(Vec2::ZERO), Gesture::Ignored);
        let before = c.rotation().yaw;
        c.update(Vec2::new(0.9, 0.9));
        assert!((c.rotation().yaw - before - 0.005).abs() < 1e-6);
    }

    #[test]
    fn page_scope_never_clicks() {
        let mut c = InteractionController::new(0.01).with_scope(DragScope::Page);
        c.pointer_down(Vec2::new(5.0, 5.0));
        assert_eq!(c.pointer_up(Vec2::new(5.0, 5.0)), Gesture::Drag);
    }

    #[test]
    fn dragging_maps_pointer_to_bounded_angles() {
        let mut c = InteractionController::new(0.005);
        c.pointer_down(Vec2::ZERO);
        let r = c.update(Vec2::new(1.0, -1.0));
        assert!((r.yaw - DRAG_YAW_RANGE).abs() < 1e-6);
        assert!((r.pitch + DRAG_PITCH_RANGE).abs() < 1e-6);
    }

    #[test]
    fn dragging_past_the_edge_saturates() {
        let mut c = InteractionController::new(0.005);
        c.pointer_down(Vec2::ZERO);
        let r = c.update(Vec2::new(3.0, -5.0));
        assert!((r.yaw - DRAG_YAW_RANGE).abs() < 1e-6);
        assert!((r.pitch + DRAG_PITCH_RANGE).abs() < 1e-6);
        assert_eq!(drag_rotation(Vec2::new(-40.0, 0.5)).yaw, -DRAG_YAW_RANGE);
    }

    #[test]
    fn idle_spin_resumes_after_drag() {
        let mut c = InteractionController::new(0.005);
        c.pointer_down(Vec2::ZERO);
        c.update(Vec2::new(0.1, 0.0));
        c.release();
        let held = c.rotation().yaw;
        let after = c.update(Vec2::new(0.8, 0.8)).yaw;
        assert!((after - (held + 0.005).rem_euclid(TAU)).abs() < 1e-6);
    }
}
