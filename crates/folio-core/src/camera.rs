//! Camera description and pointer-to-world math.
//!
//! Nothing here touches platform APIs: front-ends convert their pointer
//! events into surface pixels and hand them in.

use glam::{Mat4, Vec2, Vec3, Vec4};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Camera at `eye` looking at the origin with a vertical fov in degrees.
    pub fn looking_at_origin(eye: Vec3, fovy_degrees: f32) -> Self {
        Self {
            eye,
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy_radians: fovy_degrees.to_radians(),
            znear: crate::constants::CAMERA_ZNEAR,
            zfar: crate::constants::CAMERA_ZFAR,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// World-space ray through a point given in normalized device coordinates.
    ///
    /// Returns `(ray_origin, ray_direction)`.
    pub fn ray_through_ndc(&self, ndc: Vec2) -> (Vec3, Vec3) {
        let inv = self.view_proj().inverse();
        let p_far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let p1: Vec3 = p_far.truncate() / p_far.w;
        let ro = self.eye;
        let rd = (p1 - ro).normalize();
        (ro, rd)
    }
}

/// Convert a pointer position in surface pixels into normalized device
/// coordinates (`[-1, 1]` inside the surface, +y up). Positions outside the
/// surface map outside that range.
#[inline]
pub fn pointer_ndc(px: Vec2, surface_size: Vec2) -> Vec2 {
    let w = surface_size.x.max(1.0);
    let h = surface_size.y.max(1.0);
    Vec2::new((px.x / w) * 2.0 - 1.0, 1.0 - (px.y / h) * 2.0)
}

#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t = -b - sq;
    if t >= 0.0 {
        Some(t)
    } else {
        // origin inside the sphere: report the exit point
        let t_exit = -b + sq;
        (t_exit >= 0.0).then_some(t_exit)
    }
}

/// Möller-Trumbore ray/triangle test. Returns `t` in units of `ray_dir`,
/// which need not be normalized. Back faces count as hits.
pub fn ray_triangle(ray_origin: Vec3, ray_dir: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let e1 = b - a;
    let e2 = c - a;
    let p = ray_dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < 1e-8 {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = ray_origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = ray_dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv_det;
    (t >= 0.0).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_ndc_maps_corners_and_center() {
        let size = Vec2::new(200.0, 100.0);
        assert_eq!(pointer_ndc(Vec2::new(100.0, 50.0), size), Vec2::ZERO);
        assert_eq!(pointer_ndc(Vec2::new(0.0, 0.0), size), Vec2::new(-1.0, 1.0));
        assert_eq!(pointer_ndc(Vec2::new(200.0, 100.0), size), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn center_ray_points_at_target() {
        let cam = Camera::looking_at_origin(Vec3::new(0.0, 1.0, 5.0), 35.0);
        let (ro, rd) = cam.ray_through_ndc(Vec2::ZERO);
        assert_eq!(ro, cam.eye);
        let expected = (Vec3::ZERO - cam.eye).normalize();
        assert!((rd - expected).length() < 1e-4);
    }

    #[test]
    fn ray_sphere_hits_and_misses() {
        let hit = ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 5.0), 2.0);
        assert!((hit.unwrap() - 3.0).abs() < 1e-5);
        assert!(ray_sphere(Vec3::ZERO, Vec3::X, Vec3::new(0.0, 0.0, 5.0), 2.0).is_none());
        assert!(ray_sphere(Vec3::ZERO, -Vec3::Z, Vec3::new(0.0, 0.0, 5.0), 2.0).is_none());
    }

    #[test]
    fn ray_sphere_from_inside_reports_exit() {
        let t = ray_sphere(Vec3::new(0.0, 0.0, 5.0), Vec3::X, Vec3::new(0.0, 0.0, 5.0), 3.0);
        assert!((t.unwrap() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn ray_triangle_hits_inside_and_misses_outside() {
        let (a, b, c) = (
            Vec3::new(-1.0, -1.0, 4.0),
            Vec3::new(1.0, -1.0, 4.0),
            Vec3::new(0.0, 1.0, 4.0),
        );
        let t = ray_triangle(Vec3::ZERO, Vec3::Z, a, b, c);
        assert!((t.unwrap() - 4.0).abs() < 1e-5);
        // unnormalized direction scales t
        let t = ray_triangle(Vec3::ZERO, Vec3::Z * 2.0, a, b, c);
        assert!((t.unwrap() - 2.0).abs() < 1e-5);
        assert!(ray_triangle(Vec3::new(3.0, 0.0, 0.0), Vec3::Z, a, b, c).is_none());
        assert!(ray_triangle(Vec3::ZERO, -Vec3::Z, a, b, c).is_none());
        assert!(ray_triangle(Vec3::ZERO, Vec3::X, a, b, c).is_none());
    }
}
