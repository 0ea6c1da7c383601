//! First-person fly camera: yaw/pitch orientation, free movement and zoom.

use glam::{Mat4, Vec3};

use crate::config::{CameraConfig, ProjectionConfig};

/// Pitch never reaches straight up or down, which would flip the basis.
pub const PITCH_LIMIT: f32 = 89.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub world_up: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_speed: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl Camera {
    /// Builds the camera at the configured position. The basis is derived
    /// from yaw and pitch, so the first mouse delta turns from where the
    /// camera is already looking.
    pub fn from_config(config: &CameraConfig) -> Self {
        let min_zoom = config.min_zoom.min(config.max_zoom);
        let mut camera = Self {
            position: config.position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: config.up.try_normalize().unwrap_or(Vec3::Y),
            yaw: config.yaw,
            pitch: config.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            zoom: config.zoom.max(min_zoom).min(config.max_zoom),
            min_zoom,
            max_zoom: config.max_zoom,
            zoom_speed: config.zoom_speed,
            movement_speed: config.movement_speed,
            mouse_sensitivity: config.mouse_sensitivity,
        };
        camera.update_vectors();
        camera
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Projection for `mode`, in OpenGL clip-space convention (depth -1..1).
    pub fn projection_matrix(
        &self,
        mode: ProjectionMode,
        aspect: f32,
        config: &ProjectionConfig,
    ) -> Mat4 {
        match mode {
            ProjectionMode::Orthographic => {
                let extent = config.ortho_half_extent;
                Mat4::orthographic_rh_gl(-extent, extent, -extent, extent, config.near, config.far)
            }
            ProjectionMode::Perspective => Mat4::perspective_rh_gl(
                self.zoom.to_radians(),
                aspect.max(0.01),
                config.near,
                config.far,
            ),
        }
    }

    pub fn process_keyboard(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
            CameraMovement::Up => self.position += self.world_up * velocity,
            CameraMovement::Down => self.position -= self.world_up * velocity,
        }
    }

    /// Rotates by raw offsets; positive `y_offset` looks up.
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch += y_offset * self.mouse_sensitivity;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset * self.zoom_speed)
            .max(self.min_zoom)
            .min(self.max_zoom);
    }

    fn update_vectors(&mut self) {
        let (yaw_sin, yaw_cos) = self.yaw.to_radians().sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.to_radians().sin_cos();
        self.front = Vec3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Z);
        self.right = self
            .front
            .cross(self.world_up)
            .try_normalize()
            .unwrap_or(Vec3::X);
        self.up = self.right.cross(self.front).normalize_or_zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn default_camera_looks_down_negative_z() {
        let camera = Camera::default();
        assert_eq!(camera.position, Vec3::new(0.0, 5.0, 20.0));
        assert!(camera.front.abs_diff_eq(Vec3::NEG_Z, EPSILON));
        assert!(camera.right.abs_diff_eq(Vec3::X, EPSILON));
        assert_eq!(camera.zoom, 80.0);
    }

    #[test]
    fn neutral_mouse_movement_keeps_the_default_basis() {
        let mut camera = Camera::default();
        camera.process_mouse_movement(0.0, 0.0);
        assert!(camera.front.abs_diff_eq(Vec3::NEG_Z, EPSILON));
        assert!(camera.up.abs_diff_eq(Vec3::Y, EPSILON));
    }

    #[test]
    fn configured_yaw_sets_the_starting_direction() {
        let config = CameraConfig {
            yaw: 0.0,
            ..CameraConfig::default()
        };
        let mut camera = Camera::from_config(&config);
        assert!(camera.front.abs_diff_eq(Vec3::X, EPSILON));
        camera.process_mouse_movement(0.0, 0.0);
        assert!(camera.front.abs_diff_eq(Vec3::X, EPSILON));
    }

    #[test]
    fn inverted_zoom_bounds_do_not_panic() {
        let config = CameraConfig {
            min_zoom: 60.0,
            max_zoom: 30.0,
            ..CameraConfig::default()
        };
        let mut camera = Camera::from_config(&config);
        assert_eq!(camera.zoom, 30.0);
        camera.process_mouse_scroll(-10.0);
        assert_eq!(camera.zoom, 30.0);
    }

    #[test]
    fn mouse_movement_scales_by_sensitivity() {
        let mut camera = Camera::default();
        camera.process_mouse_movement(100.0, -50.0);
        assert!((camera.yaw - -80.0).abs() < EPSILON);
        assert!((camera.pitch - -5.0).abs() < EPSILON);
        assert!(camera.front.y < 0.0);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::default();
        for _ in 0..100 {
            camera.process_mouse_movement(0.0, 10_000.0);
        }
        assert_eq!(camera.pitch, PITCH_LIMIT);
        camera.process_mouse_movement(0.0, -1.0e9);
        assert_eq!(camera.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn movement_is_speed_times_delta() {
        let mut camera = Camera::default();
        camera.process_keyboard(CameraMovement::Forward, 0.5);
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 5.0, 10.0), EPSILON));
        camera.process_keyboard(CameraMovement::Right, 0.1);
        camera.process_keyboard(CameraMovement::Up, 0.1);
        assert!(camera.position.abs_diff_eq(Vec3::new(2.0, 7.0, 10.0), EPSILON));
    }

    #[test]
    fn vertical_movement_ignores_pitch() {
        let mut camera = Camera::default();
        camera.process_mouse_movement(0.0, 300.0);
        let start = camera.position;
        camera.process_keyboard(CameraMovement::Down, 1.0);
        assert!((start - camera.position).abs_diff_eq(Vec3::new(0.0, 20.0, 0.0), EPSILON));
    }

    #[test]
    fn scroll_zoom_is_clamped() {
        let mut camera = Camera::default();
        camera.process_mouse_scroll(10.0);
        assert_eq!(camera.zoom, 70.0);
        camera.process_mouse_scroll(-500.0);
        assert_eq!(camera.zoom, 90.0);
        camera.process_mouse_scroll(500.0);
        assert_eq!(camera.zoom, 1.0);
    }

    #[test]
    fn orthographic_projection_ignores_zoom() {
        let config = ProjectionConfig::default();
        let mut camera = Camera::default();
        let before = camera.projection_matrix(ProjectionMode::Orthographic, 1.25, &config);
        camera.process_mouse_scroll(30.0);
        let after = camera.projection_matrix(ProjectionMode::Orthographic, 1.25, &config);
        assert_eq!(before, after);
        assert_eq!(
            before,
            Mat4::orthographic_rh_gl(-10.0, 10.0, -10.0, 10.0, 0.1, 100.0)
        );
    }

    #[test]
    fn perspective_projection_uses_zoom_and_aspect() {
        let config = ProjectionConfig::default();
        let camera = Camera::default();
        let projection = camera.projection_matrix(ProjectionMode::Perspective, 1.25, &config);
        let expected = Mat4::perspective_rh_gl(80f32.to_radians(), 1.25, 0.1, 100.0);
        assert!(projection.abs_diff_eq(expected, EPSILON));
    }
}
