//! Fixed light rig: two point lights, one directional light and a spot light
//! that follows the camera.

use glam::Vec3;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::shading::{self, ShadingInterface};

/// Number of point lights the shading stage has room for.
pub const MAX_POINT_LIGHTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub active: bool,
}

/// Cone light. `position` and `direction` are replaced every frame by the
/// camera's position and front vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    /// Cosine of the inner cone angle.
    pub cut_off: f32,
    /// Cosine of the outer cone angle.
    pub outer_cut_off: f32,
    pub active: bool,
}

impl SpotLight {
    /// Moves the headlamp to the viewer.
    pub fn track<S>(shading: &mut S, position: Vec3, direction: Vec3)
    where
        S: ShadingInterface + ?Sized,
    {
        shading.set_vec3(shading::SPOT_POSITION, position);
        shading.set_vec3(shading::SPOT_DIRECTION, direction);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LightDescriptor {
    Point(PointLight),
    Directional(DirectionalLight),
    Spot(SpotLight),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    lights: Vec<LightDescriptor>,
}

impl Default for LightRig {
    fn default() -> Self {
        Self::new(vec![
            LightDescriptor::Point(PointLight {
                position: Vec3::new(4.0, 6.0, 2.0),
                ambient: Vec3::splat(0.05),
                diffuse: Vec3::ONE,
                specular: Vec3::splat(0.2),
                active: true,
            }),
            LightDescriptor::Point(PointLight {
                position: Vec3::splat(-4.0),
                ambient: Vec3::splat(0.05),
                diffuse: Vec3::splat(0.8),
                specular: Vec3::splat(0.2),
                active: true,
            }),
            LightDescriptor::Directional(DirectionalLight {
                direction: Vec3::new(7.2, 7.2, 1.5),
                ambient: Vec3::new(0.05, 0.05, 0.01),
                diffuse: Vec3::splat(0.8),
                specular: Vec3::splat(0.2),
                active: true,
            }),
            LightDescriptor::Spot(SpotLight {
                position: Vec3::ZERO,
                direction: Vec3::NEG_Z,
                ambient: Vec3::ZERO,
                diffuse: Vec3::ONE,
                specular: Vec3::ONE,
                constant: 1.0,
                linear: 0.014,
                quadratic: 0.0007,
                cut_off: 22.5_f32.to_radians().cos(),
                outer_cut_off: 28.0_f32.to_radians().cos(),
                active: true,
            }),
        ])
    }
}

impl LightRig {
    pub fn new(lights: Vec<LightDescriptor>) -> Self {
        Self { lights }
    }

    pub fn lights(&self) -> &[LightDescriptor] {
        &self.lights
    }

    /// Enables lighting and pushes every light. Point lights are numbered in
    /// the order they appear; only the first [`MAX_POINT_LIGHTS`] are pushed.
    pub fn setup_all<S>(&self, shading: &mut S)
    where
        S: ShadingInterface + ?Sized,
    {
        shading.set_bool(shading::USE_LIGHTING, true);

        let mut point_index = 0;
        for light in &self.lights {
            match light {
                LightDescriptor::Point(point) => {
                    if point_index >= MAX_POINT_LIGHTS {
                        warn!("ignoring point light beyond the first {MAX_POINT_LIGHTS}");
                        continue;
                    }
                    let prefix = format!("pointLights[{point_index}]");
                    shading.set_vec3(&format!("{prefix}.position"), point.position);
                    shading.set_vec3(&format!("{prefix}.ambient"), point.ambient);
                    shading.set_vec3(&format!("{prefix}.diffuse"), point.diffuse);
                    shading.set_vec3(&format!("{prefix}.specular"), point.specular);
                    shading.set_bool(&format!("{prefix}.active"), point.active);
                    point_index += 1;
                }
                LightDescriptor::Directional(directional) => {
                    shading.set_vec3("directionalLight.direction", directional.direction);
                    shading.set_vec3("directionalLight.ambient", directional.ambient);
                    shading.set_vec3("directionalLight.diffuse", directional.diffuse);
                    shading.set_vec3("directionalLight.specular", directional.specular);
                    shading.set_bool("directionalLight.active", directional.active);
                }
                LightDescriptor::Spot(spot) => {
                    SpotLight::track(shading, spot.position, spot.direction);
                    shading.set_vec3("spotLight.ambient", spot.ambient);
                    shading.set_vec3("spotLight.diffuse", spot.diffuse);
                    shading.set_vec3("spotLight.specular", spot.specular);
                    shading.set_float("spotLight.constant", spot.constant);
                    shading.set_float("spotLight.linear", spot.linear);
                    shading.set_float("spotLight.quadratic", spot.quadratic);
                    shading.set_float("spotLight.cutOff", spot.cut_off);
                    shading.set_float("spotLight.outerCutOff", spot.outer_cut_off);
                    shading.set_bool("spotLight.active", spot.active);
                }
            }
        }
    }
}
