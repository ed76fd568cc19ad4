//! Perspective camera
//!
//! Owned by the shell, posed by core commands and the orbit controller.

use glam::{Mat4, Vec3};
use vantage_protocol::CameraData;

pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec3::from_array(vantage::INITIAL_CAMERA_POSITION),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_degrees: vantage::CAMERA_FOV_DEGREES,
            near: vantage::CAMERA_NEAR,
            far: vantage::CAMERA_FAR,
        }
    }

    /// Adopt a full pose from a SetCamera command
    pub fn apply(&mut self, data: &CameraData) {
        self.position = Vec3::from_array(data.position);
        self.target = Vec3::from_array(data.target);
        self.up = Vec3::from_array(data.up);
        self.fov_y_degrees = data.fov_degrees;
        self.near = data.near;
        self.far = data.far;
    }

    /// Move toward or away from the world origin without changing the
    /// viewing direction
    pub fn scale_position(&mut self, factor: f32) {
        self.position *= factor;
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        let view = Mat4::look_at_rh(self.position, self.target, self.up);
        let proj =
            Mat4::perspective_rh(self.fov_y_degrees.to_radians(), aspect, self.near, self.far);
        proj * view
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_matches_bootstrap_pose() {
        let camera = Camera::new();
        assert_eq!(camera.position, Vec3::new(0.0, 5.0, 10.0));
        assert_eq!(camera.fov_y_degrees, 75.0);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 1000.0);
    }

    #[test]
    fn test_scale_position_is_exact_multiplication() {
        let mut camera = Camera::new();
        camera.position = Vec3::new(25.0, 12.5, 25.0);
        camera.scale_position(0.99);
        assert_eq!(camera.position, Vec3::new(25.0 * 0.99, 12.5 * 0.99, 25.0 * 0.99));
    }

    #[test]
    fn test_apply_overwrites_pose() {
        let mut camera = Camera::new();
        camera.apply(&CameraData {
            position: [25.0, 12.5, 25.0],
            target: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
        });
        assert_eq!(camera.position, Vec3::new(25.0, 12.5, 25.0));
        assert_eq!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let mut camera = Camera::new();
        camera.position = Vec3::new(25.0, 12.5, 25.0);
        camera.target = Vec3::ZERO;
        let clip = camera.view_projection(800.0 / 600.0) * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
    }
}
