use glam::Vec3;

// Shared interaction/scene tuning constants used by both web and native frontends.

// Interaction
pub const DRAG_CLICK_THRESHOLD_PX: f32 = 5.0; // release closer than this to the press is a click
pub const DRAG_YAW_RANGE: f32 = std::f32::consts::PI * 4.0; // yaw at the right edge of the surface
pub const DRAG_PITCH_RANGE: f32 = std::f32::consts::PI * 0.8; // pitch at the top edge of the surface

// Idle spin (radians per rendered frame)
pub const BENCH_IDLE_SPIN: f32 = 0.005;
pub const SHOWCASE_IDLE_SPIN: f32 = 0.01;

// Uniform scales
pub const BENCH_MODEL_SCALE: f32 = 15.0;
pub const DETAIL_MODEL_SCALE: f32 = 6.0;
pub const SHOWCASE_MODEL_SCALE: f32 = 8.0;

// Bench slots, left to right
pub const BENCH_SLOT_X: [f32; 4] = [-4.5, -1.25, 1.25, 4.5];

// Cameras (eye positions; all look at the origin)
pub const BENCH_CAMERA_EYE: Vec3 = Vec3::new(0.0, 1.0, 5.0);
pub const BENCH_CAMERA_FOV_DEG: f32 = 35.0;
pub const DETAIL_CAMERA_EYE: Vec3 = Vec3::new(0.0, 0.0, 2.0);
pub const DETAIL_CAMERA_FOV_DEG: f32 = 40.0;
pub const SHOWCASE_CAMERA_EYE: Vec3 = Vec3::new(0.0, 1.0, 3.0);
pub const SHOWCASE_CAMERA_FOV_DEG: f32 = 35.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;

// Lighting rig
pub const AMBIENT_INTENSITY: f32 = 0.1;
pub const KEY_LIGHT_POSITION: Vec3 = Vec3::new(2.0, 2.0, 5.0);
pub const KEY_LIGHT_INTENSITY: f32 = 0.5;
pub const ENVIRONMENT_INTENSITY: f32 = 0.25;
pub const ENVIRONMENT_TINT: [f32; 3] = [1.0, 0.78, 0.62]; // warm "dawn" sky

// Page palette (#0f172a)
pub const BACKGROUND_RGB: [f32; 3] = [0.059, 0.090, 0.165];

// Showcase
pub const SHOWCASE_BACKDROP_SIZE: f32 = 10.0;
pub const SHOWCASE_BACKDROP_Z: f32 = -1.5;
pub const SHOWCASE_DIMMED_OPACITY: f32 = 0.3;

// Fallback base color for primitives without a material
pub const DEFAULT_BASE_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

/// Convert an sRGB-encoded color (as written in CSS) to linear for the GPU.
#[inline]
pub fn linear_from_srgb(c: [f32; 3]) -> [f32; 3] {
    c.map(|v| {
        if v <= 0.04045 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    })
}
