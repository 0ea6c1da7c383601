//! Per-frame camera driver: mouse and scroll events, polled keys, and the
//! view/projection push.

use glam::{Mat4, Vec3};
use log::debug;

use crate::camera::{Camera, CameraMovement, ProjectionMode};
use crate::config::{KeyBindings, ProjectionConfig, SceneConfig};
use crate::input::InputSource;
use crate::light::SpotLight;
use crate::shading::{self, ShadingInterface};
use crate::viewport::ViewportProvider;

/// Result of one [`ViewController::prepare_view`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewFrame {
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
    pub delta_time: f32,
    pub mode: ProjectionMode,
    pub close_requested: bool,
}

#[derive(Debug, Clone)]
pub struct ViewController {
    camera: Camera,
    projection: ProjectionConfig,
    keys: KeyBindings,
    mode: ProjectionMode,
    first_mouse: bool,
    last_x: f32,
    last_y: f32,
    last_frame: f64,
}

impl ViewController {
    pub fn new(camera: Camera, projection: ProjectionConfig, keys: KeyBindings) -> Self {
        Self {
            camera,
            projection,
            keys,
            mode: ProjectionMode::Perspective,
            first_mouse: true,
            last_x: 0.0,
            last_y: 0.0,
            last_frame: 0.0,
        }
    }

    pub fn from_config(config: &SceneConfig) -> anyhow::Result<Self> {
        Ok(Self::new(
            Camera::from_config(&config.camera),
            config.projection.clone(),
            config.keys.resolve()?,
        ))
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ProjectionMode) {
        if self.mode != mode {
            debug!("projection mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    /// Cursor position callback. The first event only records the reference
    /// point so the camera does not jump on startup.
    pub fn on_mouse_move(&mut self, x: f32, y: f32) {
        if self.first_mouse {
            self.last_x = x;
            self.last_y = y;
            self.first_mouse = false;
            return;
        }

        let x_offset = x - self.last_x;
        // Screen y grows downwards.
        let y_offset = self.last_y - y;
        self.last_x = x;
        self.last_y = y;
        self.camera.process_mouse_movement(x_offset, y_offset);
    }

    pub fn on_scroll(&mut self, y_offset: f32) {
        self.camera.process_mouse_scroll(y_offset);
    }

    /// Starts frame timing at `now`, so the next frame's delta excludes
    /// anything that happened before.
    pub fn restart_clock(&mut self, now: f64) {
        self.last_frame = now;
    }

    /// Applies every held movement key and the projection keys. Returns
    /// `true` when the quit key is down.
    pub fn process_keyboard<I>(&mut self, input: &I, delta_time: f32) -> bool
    where
        I: InputSource + ?Sized,
    {
        let movements = [
            (self.keys.forward, CameraMovement::Forward),
            (self.keys.backward, CameraMovement::Backward),
            (self.keys.left, CameraMovement::Left),
            (self.keys.right, CameraMovement::Right),
            (self.keys.up, CameraMovement::Up),
            (self.keys.down, CameraMovement::Down),
        ];
        for (key, movement) in movements {
            if input.is_pressed(key) {
                self.camera.process_keyboard(movement, delta_time);
            }
        }

        // Orthographic is checked last so it wins when both are held.
        if input.is_pressed(self.keys.perspective) {
            self.set_mode(ProjectionMode::Perspective);
        }
        if input.is_pressed(self.keys.orthographic) {
            self.set_mode(ProjectionMode::Orthographic);
        }

        input.is_pressed(self.keys.quit)
    }

    /// Advances the frame clock to `now` (seconds), polls the keyboard and
    /// pushes view, projection, view position and the headlamp spot light.
    pub fn prepare_view<I, V, S>(
        &mut self,
        now: f64,
        input: &I,
        viewport: &V,
        shading: &mut S,
    ) -> ViewFrame
    where
        I: InputSource + ?Sized,
        V: ViewportProvider + ?Sized,
        S: ShadingInterface + ?Sized,
    {
        let delta_time = (now - self.last_frame) as f32;
        self.last_frame = now;

        let close_requested = self.process_keyboard(input, delta_time);

        let view = self.camera.view_matrix();
        let projection =
            self.camera
                .projection_matrix(self.mode, viewport.aspect_ratio(), &self.projection);

        shading.set_mat4(shading::VIEW, view);
        shading.set_mat4(shading::PROJECTION, projection);
        shading.set_vec3(shading::VIEW_POSITION, self.camera.position);
        SpotLight::track(shading, self.camera.position, self.camera.front);

        ViewFrame {
            view,
            projection,
            camera_position: self.camera.position,
            delta_time,
            mode: self.mode,
            close_requested,
        }
    }
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new(
            Camera::default(),
            ProjectionConfig::default(),
            KeyBindings::default(),
        )
    }
}
