//! Orbit camera around the tree.

use glam::{Mat4, Vec3};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Vertical field of view in degrees.
pub const FOV_DEGREES: f32 = 35.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 200.0;
pub const START_DISTANCE: f32 = 35.0;
pub const MIN_DISTANCE: f32 = 10.0;
pub const MAX_DISTANCE: f32 = 50.0;
/// Polar angle limits, measured from +Y.
pub const MIN_POLAR: f32 = FRAC_PI_2 - 0.5;
pub const MAX_POLAR: f32 = FRAC_PI_2 + 0.2;
/// Auto-rotate speed; 1.0 is one orbit per minute.
pub const AUTO_ROTATE_SPEED: f32 = 0.5;

const DRAG_SENSITIVITY: f32 = 0.005;
const ZOOM_STEP: f32 = 1.5;

/// Orbit camera. No panning: the target stays at the origin.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Horizontal angle in radians.
    pub yaw: f32,
    /// Elevation above the horizon in radians.
    pub pitch: f32,
    /// Distance from the target.
    pub distance: f32,
    pub target: Vec3,
    pub auto_rotate_speed: f32,
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: START_DISTANCE,
            target: Vec3::ZERO,
            auto_rotate_speed: AUTO_ROTATE_SPEED,
        }
    }

    /// World position of the eye.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(FOV_DEGREES.to_radians(), aspect.max(1e-3), NEAR, FAR)
    }

    /// Angle from +Y down to the eye.
    pub fn polar_angle(&self) -> f32 {
        FRAC_PI_2 - self.pitch
    }

    /// Apply a mouse drag in pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * DRAG_SENSITIVITY;
        self.pitch += dy * DRAG_SENSITIVITY;
        self.clamp();
    }

    /// Apply a wheel step; positive zooms in.
    pub fn zoom(&mut self, scroll: f32) {
        self.distance -= scroll * ZOOM_STEP;
        self.clamp();
    }

    /// Advance auto-rotation by `delta` seconds when `enabled`.
    pub fn update(&mut self, delta: f32, enabled: bool) {
        if enabled && delta > 0.0 {
            self.yaw = (self.yaw + TAU / 60.0 * self.auto_rotate_speed * delta) % TAU;
        }
    }

    fn clamp(&mut self) {
        let polar = self.polar_angle().clamp(MIN_POLAR, MAX_POLAR);
        self.pitch = FRAC_PI_2 - polar;
        self.distance = self.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}
