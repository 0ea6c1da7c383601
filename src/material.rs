use glam::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::shading::{self, ShadingInterface};

/// Surface response pushed to the shader before a draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDescriptor {
    pub tag: String,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
}

impl MaterialDescriptor {
    pub fn new(tag: impl Into<String>, diffuse: Vec3, specular: Vec3, shininess: f32) -> Self {
        Self {
            tag: tag.into(),
            diffuse,
            specular,
            shininess: shininess.max(0.0),
        }
    }

    pub fn apply<S>(&self, shading: &mut S)
    where
        S: ShadingInterface + ?Sized,
    {
        shading.set_vec3(shading::MATERIAL_DIFFUSE, self.diffuse);
        shading.set_vec3(shading::MATERIAL_SPECULAR, self.specular);
        shading.set_float(shading::MATERIAL_SHININESS, self.shininess);
    }
}

/// The catalogue the still-life is shaded with.
pub fn default_catalogue() -> Vec<MaterialDescriptor> {
    vec![
        MaterialDescriptor::new("plastic", Vec3::splat(0.5), Vec3::splat(0.7), 5.0),
        MaterialDescriptor::new(
            "wood",
            Vec3::new(0.6, 0.5, 0.2),
            Vec3::new(0.5, 0.2, 0.5),
            1.0,
        ),
        MaterialDescriptor::new(
            "stone",
            Vec3::splat(0.5),
            Vec3::new(0.73, 0.3, 0.3),
            6.0,
        ),
    ]
}

/// Append-only list of materials addressed by tag.
#[derive(Debug, Clone, Default)]
pub struct MaterialRegistry {
    materials: Vec<MaterialDescriptor>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, material: MaterialDescriptor) {
        self.materials.push(material);
    }

    pub fn define_all(&mut self) {
        self.materials.extend(default_catalogue());
    }

    /// First material whose tag matches exactly.
    pub fn find(&self, tag: &str) -> Option<&MaterialDescriptor> {
        self.materials.iter().find(|material| material.tag == tag)
    }

    /// Pushes the material registered under `tag`. Unknown tags leave the
    /// current material values in place and return `false`.
    pub fn select<S>(&self, shading: &mut S, tag: &str) -> bool
    where
        S: ShadingInterface + ?Sized,
    {
        match self.find(tag) {
            Some(material) => {
                material.apply(shading);
                true
            }
            None => {
                debug!("material '{tag}' not found, keeping previous material");
                false
            }
        }
    }

    pub fn materials(&self) -> &[MaterialDescriptor] {
        &self.materials
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
