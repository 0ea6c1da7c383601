//! GPU layout of the per-draw uniform block and its packing from the
//! current [`UniformStore`] state.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::light::MAX_POINT_LIGHTS;
use crate::shading::{self, UniformStore};

/// Maps OpenGL clip depth (-1..1) onto wgpu's (0..1).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
]);

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointLightBlock {
    /// `w` is the active flag.
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DirectionalLightBlock {
    /// `w` is the active flag.
    pub direction: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SpotLightBlock {
    /// `w` is the active flag.
    pub position: [f32; 4],
    pub direction: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// constant, linear, quadratic, unused.
    pub attenuation: [f32; 4],
    /// inner cosine, outer cosine, unused, unused.
    pub cone: [f32; 4],
}

/// Everything one draw reads, laid out to match `DrawUniform` in the shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DrawUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
    pub view_position: [f32; 4],
    pub object_color: [f32; 4],
    /// rgb diffuse, `w` shininess.
    pub material_diffuse: [f32; 4],
    pub material_specular: [f32; 4],
    /// use texture, use lighting, uv scale x, uv scale y.
    pub flags: [f32; 4],
    pub point_lights: [PointLightBlock; MAX_POINT_LIGHTS],
    pub directional: DirectionalLightBlock,
    pub spot: SpotLightBlock,
}

impl DrawUniform {
    /// Packs the store's current values. Anything never written gets a
    /// neutral default: identity matrices, white, unit UV scale, lights off.
    pub fn from_store(store: &UniformStore) -> Self {
        let mat4 = |name: &str| store.get_mat4(name).unwrap_or(Mat4::IDENTITY);
        let vec3 = |name: &str| store.get_vec3(name).unwrap_or(Vec3::ZERO);
        let flag = |name: &str| bool_to_f32(store.get_bool(name).unwrap_or(false));
        let float = |name: &str| store.get_float(name).unwrap_or(0.0);

        let model = mat4(shading::MODEL);
        let normal = Mat4::from_mat3(Mat3::from_mat4(model).inverse().transpose());
        let view_proj = OPENGL_TO_WGPU_MATRIX * mat4(shading::PROJECTION) * mat4(shading::VIEW);
        let uv_scale = store.get_vec2(shading::UV_SCALE).unwrap_or(Vec2::ONE);

        let point_lights = std::array::from_fn(|index| {
            let key = |field: &str| format!("pointLights[{index}].{field}");
            PointLightBlock {
                position: vec3(&key("position")).extend(flag(&key("active"))).to_array(),
                ambient: vec3(&key("ambient")).extend(0.0).to_array(),
                diffuse: vec3(&key("diffuse")).extend(0.0).to_array(),
                specular: vec3(&key("specular")).extend(0.0).to_array(),
            }
        });

        let directional = DirectionalLightBlock {
            direction: vec3("directionalLight.direction")
                .extend(flag("directionalLight.active"))
                .to_array(),
            ambient: vec3("directionalLight.ambient").extend(0.0).to_array(),
            diffuse: vec3("directionalLight.diffuse").extend(0.0).to_array(),
            specular: vec3("directionalLight.specular").extend(0.0).to_array(),
        };

        let spot = SpotLightBlock {
            position: vec3(shading::SPOT_POSITION)
                .extend(flag("spotLight.active"))
                .to_array(),
            direction: vec3(shading::SPOT_DIRECTION).extend(0.0).to_array(),
            ambient: vec3("spotLight.ambient").extend(0.0).to_array(),
            diffuse: vec3("spotLight.diffuse").extend(0.0).to_array(),
            specular: vec3("spotLight.specular").extend(0.0).to_array(),
            attenuation: [
                float("spotLight.constant"),
                float("spotLight.linear"),
                float("spotLight.quadratic"),
                0.0,
            ],
            cone: [float("spotLight.cutOff"), float("spotLight.outerCutOff"), 0.0, 0.0],
        };

        Self {
            model: model.to_cols_array_2d(),
            normal: normal.to_cols_array_2d(),
            view_proj: view_proj.to_cols_array_2d(),
            view_position: vec3(shading::VIEW_POSITION).extend(1.0).to_array(),
            object_color: store
                .get_vec4(shading::OBJECT_COLOR)
                .unwrap_or(Vec4::ONE)
                .to_array(),
            material_diffuse: vec3(shading::MATERIAL_DIFFUSE)
                .extend(float(shading::MATERIAL_SHININESS))
                .to_array(),
            material_specular: vec3(shading::MATERIAL_SPECULAR).extend(0.0).to_array(),
            flags: [
                flag(shading::USE_TEXTURE),
                flag(shading::USE_LIGHTING),
                uv_scale.x,
                uv_scale.y,
            ],
            point_lights,
            directional,
            spot,
        }
    }
}

fn bool_to_f32(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}
