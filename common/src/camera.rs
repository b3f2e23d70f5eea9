//! Orbital 3D camera shared by every verse

use glam::{Mat4, Vec3};

/// Pose every verse starts from until it positions the camera itself
pub const DEFAULT_DISTANCE: f32 = 10.0;
pub const DEFAULT_YAW: f32 = 0.0;
pub const DEFAULT_PITCH: f32 = 0.3;

/// Radians of orbit per pixel of mouse drag
const DRAG_SENSITIVITY: f32 = 0.005;
const MIN_DISTANCE: f32 = 1.0;
const MAX_DISTANCE: f32 = 80.0;

/// 3D perspective camera with orbital controls
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    // Orbital parameters
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl Camera3D {
    pub fn new(aspect_ratio: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 45.0f32.to_radians(),
            aspect_ratio,
            near: 0.1,
            far: 1000.0,
            distance: DEFAULT_DISTANCE,
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
        };
        camera.update_orbital();
        camera
    }

    /// Return to the default pose, keeping the current aspect ratio
    pub fn reset(&mut self) {
        *self = Self::new(self.aspect_ratio);
    }

    /// Place the camera on its orbit around `target`
    pub fn set_orbit(&mut self, target: Vec3, distance: f32, yaw: f32, pitch: f32) {
        self.target = target;
        self.distance = distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.yaw = yaw;
        self.pitch = pitch.clamp(-1.5, 1.5);
        self.update_orbital();
    }

    /// Update camera position based on orbital parameters
    pub fn update_orbital(&mut self) {
        self.position = self.target + Vec3::new(
            self.distance * self.pitch.cos() * self.yaw.sin(),
            self.distance * self.pitch.sin(),
            self.distance * self.pitch.cos() * self.yaw.cos(),
        );
    }

    /// Orbit the camera around the target
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-1.5, 1.5);
        self.update_orbital();
    }

    /// Orbit from a mouse drag measured in pixels
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.orbit(-dx * DRAG_SENSITIVITY, dy * DRAG_SENSITIVITY);
    }

    /// Zoom in/out
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance - delta).clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.update_orbital();
    }

    /// Unit vector pointing to the right of the view
    pub fn right(&self) -> Vec3 {
        (self.target - self.position).cross(self.up).normalize_or_zero()
    }

    /// Unit vector pointing up in screen space
    pub fn screen_up(&self) -> Vec3 {
        self.right().cross(self.target - self.position).normalize_or_zero()
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
    }

    /// Get the combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn update_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }
}

/// Camera uniform data for shaders
///
/// `right` and `up` let the point pipeline build camera-facing billboards.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 4],
    pub right: [f32; 4],
    pub up: [f32; 4],
}

impl CameraUniform {
    pub fn from_camera_3d(camera: &Camera3D) -> Self {
        let right = camera.right();
        let up = camera.screen_up();
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            position: [camera.position.x, camera.position.y, camera.position.z, 1.0],
            right: [right.x, right.y, right.z, 0.0],
            up: [up.x, up.y, up.z, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_restores_default_pose() {
        let mut camera = Camera3D::new(1.5);
        camera.orbit(1.0, 0.4);
        camera.zoom(3.0);
        camera.reset();

        assert_eq!(camera.distance, DEFAULT_DISTANCE);
        assert_eq!(camera.yaw, DEFAULT_YAW);
        assert_eq!(camera.pitch, DEFAULT_PITCH);
        assert_eq!(camera.aspect_ratio, 1.5);
    }

    #[test]
    fn pitch_and_distance_are_bounded() {
        let mut camera = Camera3D::new(1.0);
        camera.orbit(0.0, 10.0);
        assert!(camera.pitch <= 1.5);
        camera.zoom(1000.0);
        assert!(camera.distance >= MIN_DISTANCE);
    }

    #[test]
    fn billboard_axes_are_orthonormal() {
        let camera = Camera3D::new(1.0);
        let right = camera.right();
        let up = camera.screen_up();
        assert!((right.length() - 1.0).abs() < 1e-4);
        assert!((up.length() - 1.0).abs() < 1e-4);
        assert!(right.dot(up).abs() < 1e-4);
    }
}
