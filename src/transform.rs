//! Model-matrix construction from declarative scale/rotation/translation.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::shading::{self, ShadingInterface};

/// Scale, per-axis Euler rotation in degrees, and translation for one draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformSpec {
    pub scale: Vec3,
    pub rotation_degrees: Vec3,
    pub translation: Vec3,
}

impl Default for TransformSpec {
    fn default() -> Self {
        Self {
            scale: Vec3::ONE,
            rotation_degrees: Vec3::ZERO,
            translation: Vec3::ZERO,
        }
    }
}

impl TransformSpec {
    pub fn new(scale: Vec3, rotation_degrees: Vec3, translation: Vec3) -> Self {
        Self {
            scale,
            rotation_degrees,
            translation,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        compute(
            self.scale,
            self.rotation_degrees.x,
            self.rotation_degrees.y,
            self.rotation_degrees.z,
            self.translation,
        )
    }
}

/// Builds `T * Rz * Ry * Rx * S`: scale first, then X, Y and Z rotation,
/// translation last.
pub fn compute(
    scale: Vec3,
    x_rotation_degrees: f32,
    y_rotation_degrees: f32,
    z_rotation_degrees: f32,
    translation: Vec3,
) -> Mat4 {
    let scale = Mat4::from_scale(scale);
    let rotation_x = Mat4::from_rotation_x(x_rotation_degrees.to_radians());
    let rotation_y = Mat4::from_rotation_y(y_rotation_degrees.to_radians());
    let rotation_z = Mat4::from_rotation_z(z_rotation_degrees.to_radians());
    let translation = Mat4::from_translation(translation);
    translation * rotation_z * rotation_y * rotation_x * scale
}

/// Computes the model matrix and makes it the active one for the next draw.
pub fn apply<S>(shading: &mut S, spec: &TransformSpec) -> Mat4
where
    S: ShadingInterface + ?Sized,
{
    let model = spec.matrix();
    shading.set_mat4(shading::MODEL, model);
    model
}
