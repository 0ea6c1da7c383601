//! Uniform-setting facade between the scene core and the shader stage.
//!
//! Values are addressed by string key; the last write before a draw call is
//! what that draw sees.

use std::collections::HashMap;

use glam::{Mat4, Vec2, Vec3, Vec4};

pub const MODEL: &str = "model";
pub const VIEW: &str = "view";
pub const PROJECTION: &str = "projection";
pub const VIEW_POSITION: &str = "viewPosition";
pub const OBJECT_COLOR: &str = "objectColor";
pub const OBJECT_TEXTURE: &str = "objectTexture";
pub const USE_TEXTURE: &str = "useTexture";
pub const USE_LIGHTING: &str = "useLighting";
pub const UV_SCALE: &str = "uvScale";
pub const MATERIAL_DIFFUSE: &str = "material.diffuseColor";
pub const MATERIAL_SPECULAR: &str = "material.specularColor";
pub const MATERIAL_SHININESS: &str = "material.shininess";
pub const SPOT_POSITION: &str = "spotLight.position";
pub const SPOT_DIRECTION: &str = "spotLight.direction";

/// A single typed uniform value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
    Sampler(i32),
}

/// Sink for named shader values.
pub trait ShadingInterface {
    fn set_value(&mut self, name: &str, value: UniformValue);

    fn set_bool(&mut self, name: &str, value: bool) {
        self.set_value(name, UniformValue::Bool(value));
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.set_value(name, UniformValue::Int(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.set_value(name, UniformValue::Float(value));
    }

    fn set_vec2(&mut self, name: &str, value: Vec2) {
        self.set_value(name, UniformValue::Vec2(value));
    }

    fn set_vec3(&mut self, name: &str, value: Vec3) {
        self.set_value(name, UniformValue::Vec3(value));
    }

    fn set_vec4(&mut self, name: &str, value: Vec4) {
        self.set_value(name, UniformValue::Vec4(value));
    }

    fn set_mat4(&mut self, name: &str, value: Mat4) {
        self.set_value(name, UniformValue::Mat4(value));
    }

    fn set_sampler(&mut self, name: &str, unit: i32) {
        self.set_value(name, UniformValue::Sampler(unit));
    }
}

/// Current value of every uniform written so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformStore {
    values: HashMap<String, UniformValue>,
}

impl UniformStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Booleans written as ints are accepted as well (non-zero is true).
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            UniformValue::Bool(value) => Some(value),
            UniformValue::Int(value) => Some(value != 0),
            _ => None,
        }
    }

    pub fn get_int(&self, name: &str) -> Option<i32> {
        match self.get(name)? {
            UniformValue::Int(value) | UniformValue::Sampler(value) => Some(value),
            UniformValue::Bool(value) => Some(value as i32),
            _ => None,
        }
    }

    pub fn get_float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            UniformValue::Float(value) => Some(value),
            _ => None,
        }
    }

    pub fn get_vec2(&self, name: &str) -> Option<Vec2> {
        match self.get(name)? {
            UniformValue::Vec2(value) => Some(value),
            _ => None,
        }
    }

    pub fn get_vec3(&self, name: &str) -> Option<Vec3> {
        match self.get(name)? {
            UniformValue::Vec3(value) => Some(value),
            _ => None,
        }
    }

    pub fn get_vec4(&self, name: &str) -> Option<Vec4> {
        match self.get(name)? {
            UniformValue::Vec4(value) => Some(value),
            _ => None,
        }
    }

    pub fn get_mat4(&self, name: &str) -> Option<Mat4> {
        match self.get(name)? {
            UniformValue::Mat4(value) => Some(value),
            _ => None,
        }
    }
}

impl ShadingInterface for UniformStore {
    fn set_value(&mut self, name: &str, value: UniformValue) {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
        } else {
            self.values.insert(name.to_string(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let mut store = UniformStore::new();
        store.set_vec3(MATERIAL_DIFFUSE, Vec3::ONE);
        store.set_vec3(MATERIAL_DIFFUSE, Vec3::new(0.5, 0.4, 0.3));
        assert_eq!(store.get_vec3(MATERIAL_DIFFUSE), Some(Vec3::new(0.5, 0.4, 0.3)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn typed_getters_reject_mismatched_kinds() {
        let mut store = UniformStore::new();
        store.set_float(MATERIAL_SHININESS, 5.0);
        assert_eq!(store.get_float(MATERIAL_SHININESS), Some(5.0));
        assert_eq!(store.get_vec3(MATERIAL_SHININESS), None);
        assert_eq!(store.get_mat4("missing"), None);
    }

    #[test]
    fn int_and_bool_interconvert() {
        let mut store = UniformStore::new();
        store.set_int(USE_TEXTURE, 1);
        store.set_bool(USE_LIGHTING, true);
        store.set_sampler(OBJECT_TEXTURE, 3);
        assert_eq!(store.get_bool(USE_TEXTURE), Some(true));
        assert_eq!(store.get_int(USE_LIGHTING), Some(1));
        assert_eq!(store.get_int(OBJECT_TEXTURE), Some(3));
    }
}
