//! Perspective camera with reverse-Z projection and picking rays.

use glam::{Mat3, Mat4, Quat, Vec2, Vec3};

use crate::raycast::Ray;

/// A perspective camera. Operates in world space; rotation is a unit quaternion
/// whose -Z axis is the view direction.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect: f32,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y: fov_y_degrees.to_radians(),
            aspect,
            near,
            far,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Aim the camera at `target` keeping world +Y as up.
    ///
    /// Leaves the rotation unchanged when `target` coincides with the camera
    /// or lies straight above/below it.
    pub fn look_at(&mut self, target: Vec3) {
        let Some(forward) = (target - self.position).try_normalize() else {
            return;
        };
        let Some(right) = forward.cross(Vec3::Y).try_normalize() else {
            return;
        };
        let up = right.cross(forward);
        self.rotation = Quat::from_mat3(&Mat3::from_cols(right, up, -forward)).normalize();
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Update the aspect ratio from a viewport size. Zero sizes are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), self.up())
    }

    /// Reverse-Z: the near plane maps to depth 1, the far plane to 0.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.far, self.near)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray through a point in normalized device coordinates
    /// (`x` right, `y` up, both in [-1, 1]).
    pub fn ray_through_ndc(&self, ndc: Vec2) -> Ray {
        let half_height = (self.fov_y * 0.5).tan();
        let half_width = half_height * self.aspect;
        let direction = self.forward()
            + self.right() * (ndc.x * half_width)
            + self.up() * (ndc.y * half_height);
        Ray::new(self.position, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn main_camera() -> PerspectiveCamera {
        PerspectiveCamera::new(75.0, 16.0 / 9.0, 0.1, 10_000.0).with_position(Vec3::new(0.0, 0.0, 8.0))
    }

    #[test]
    fn test_default_rotation_looks_down_neg_z() {
        let cam = main_camera();
        assert!((cam.forward() - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_look_at_points_forward_at_target() {
        let mut cam = main_camera();
        cam.position = Vec3::new(3.0, -2.0, 8.0);
        cam.look_at(Vec3::ZERO);
        let expected = (-cam.position).normalize();
        assert!((cam.forward() - expected).length() < 1e-5);
        // Up stays on the world-up side.
        assert!(cam.up().y > 0.0);
    }

    #[test]
    fn test_look_at_degenerate_keeps_rotation() {
        let mut cam = main_camera();
        cam.position = Vec3::new(0.0, 5.0, 0.0);
        cam.look_at(Vec3::ZERO);
        assert_eq!(cam.rotation, Quat::IDENTITY);
        cam.look_at(cam.position);
        assert_eq!(cam.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_reverse_z_depth_range() {
        let cam = main_camera();
        let vp = cam.view_projection_matrix();
        let near = vp.project_point3(Vec3::new(0.0, 0.0, 8.0 - 0.1));
        let far = vp.project_point3(Vec3::new(0.0, 0.0, 8.0 - 10_000.0));
        assert!((near.z - 1.0).abs() < 1e-4, "near depth {}", near.z);
        assert!(far.z.abs() < 1e-4, "far depth {}", far.z);
    }

    #[test]
    fn test_center_ray_is_forward() {
        let cam = main_camera();
        let ray = cam.ray_through_ndc(Vec2::ZERO);
        assert_eq!(ray.origin, cam.position);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_ray_reprojects_to_same_ndc() {
        let cam = main_camera();
        let ndc = Vec2::new(0.6, -0.4);
        let ray = cam.ray_through_ndc(ndc);
        let projected = cam.view_projection_matrix().project_point3(ray.at(50.0));
        assert!((projected.x - ndc.x).abs() < 1e-4);
        assert!((projected.y - ndc.y).abs() < 1e-4);
    }

    #[test]
    fn test_set_viewport_ignores_zero() {
        let mut cam = main_camera();
        cam.set_viewport(1920, 1080);
        assert!((cam.aspect - 16.0 / 9.0).abs() < 1e-6);
        cam.set_viewport(0, 1080);
        assert!((cam.aspect - 16.0 / 9.0).abs() < 1e-6);
    }
}
