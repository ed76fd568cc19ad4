//! Orbit controller
//!
//! Left-drag orbits the camera around a target point; the scrollwheel
//! dollies along the view ray when enabled. Input handlers accumulate
//! deltas, and `update` folds them into the camera once per frame, before
//! any zoom commands are applied.

use glam::Vec3;

use crate::camera::Camera;

/// Radians of orbit per pixel of drag
const ROTATE_SPEED: f32 = 0.005;

/// Distance multiplier per scrollwheel line (scrolling up moves closer)
const DOLLY_STEP: f32 = 0.95;

/// Keep the camera off the poles so the up vector stays meaningful
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

pub struct OrbitControls {
    pub target: Vec3,
    pub enable_zoom: bool,
    dragging: bool,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_dolly: f32,
}

impl OrbitControls {
    pub fn new() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_zoom: true,
            dragging: false,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_dolly: 0.0,
        }
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Cursor movement in pixels; only orbits while the button is held
    pub fn on_cursor_delta(&mut self, dx: f32, dy: f32) {
        if self.dragging {
            self.pending_yaw += dx * ROTATE_SPEED;
            self.pending_pitch += dy * ROTATE_SPEED;
        }
    }

    /// Scrollwheel input in lines; inert while zoom is disabled
    pub fn on_scroll(&mut self, lines: f32) {
        if self.enable_zoom {
            self.pending_dolly += lines;
        }
    }

    /// Fold accumulated input into the camera pose. Runs every frame and
    /// keeps the camera aimed at the target.
    pub fn update(&mut self, camera: &mut Camera) {
        camera.target = self.target;

        let offset = camera.position - self.target;
        let radius = offset.length();
        if radius < 1e-6 {
            self.clear_pending();
            return;
        }

        let mut yaw = offset.z.atan2(offset.x);
        let mut pitch = (offset.y / radius).clamp(-1.0, 1.0).asin();

        yaw += self.pending_yaw;
        pitch = (pitch + self.pending_pitch).clamp(-MAX_PITCH, MAX_PITCH);
        let radius = radius * DOLLY_STEP.powf(self.pending_dolly);

        camera.position = self.target
            + radius
                * Vec3::new(
                    pitch.cos() * yaw.cos(),
                    pitch.sin(),
                    pitch.cos() * yaw.sin(),
                );

        self.clear_pending();
    }

    fn clear_pending(&mut self) {
        self.pending_yaw = 0.0;
        self.pending_pitch = 0.0;
        self.pending_dolly = 0.0;
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new()
    }
}
