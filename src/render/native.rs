use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use bytemuck::bytes_of;
use log::warn;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::{Window, WindowId};

use crate::gfx::{GraphicsResources, MeshHandle, PixelFormat, TextureHandle, MAX_TEXTURE_UNITS};
use crate::mesh::{MeshData, MeshKind, MeshVertex};
use crate::render::uniforms::DrawUniform;
use crate::shading::{self, ShadingInterface, UniformStore, UniformValue};

const DRAW_UNIFORM_SIZE: u64 = std::mem::size_of::<DrawUniform>() as u64;
const INITIAL_DRAW_CAPACITY: usize = 32;

/// wgpu renderer that replays immediate-mode calls.
///
/// Uniform writes land in a [`UniformStore`]; every `draw_mesh` snapshots
/// the store into a [`DrawUniform`] and queues the draw. `end_frame`
/// uploads all snapshots into one dynamic-offset buffer and replays the
/// queue in a single pass.
pub struct Renderer {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    depth: DepthBuffer,
    pipeline: wgpu::RenderPipeline,
    draw_layout: wgpu::BindGroupLayout,
    draw_buffer: DrawBuffer,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    fallback_texture: GpuTexture,
    textures: HashMap<TextureHandle, GpuTexture>,
    units: [Option<TextureHandle>; MAX_TEXTURE_UNITS],
    next_texture: u32,
    meshes: Vec<MeshBuffers>,
    uniforms: UniformStore,
    pending: Vec<PendingDraw>,
}

impl Renderer {
    /// Initializes the GPU renderer for the provided window.
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Err(anyhow!("window has zero area"));
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            flags: wgpu::InstanceFlags::default(),
            memory_budget_thresholds: Default::default(),
            backend_options: Default::default(),
        });
        let surface = instance.create_surface(Arc::clone(&window))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to acquire GPU adapter")?;

        let device_descriptor = wgpu::DeviceDescriptor {
            label: Some("scene-device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            experimental_features: Default::default(),
            memory_hints: Default::default(),
            trace: Default::default(),
        };
        let (device, queue) = adapter
            .request_device(&device_descriptor)
            .await
            .context("failed to create GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|format| format.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no texture formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps
                .present_modes
                .iter()
                .copied()
                .find(|mode| {
                    matches!(
                        mode,
                        wgpu::PresentMode::Mailbox | wgpu::PresentMode::Immediate
                    )
                })
                .unwrap_or(wgpu::PresentMode::Fifo),
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let depth = DepthBuffer::create(&device, config.width, config.height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene-shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });

        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw-bind-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(DRAW_UNIFORM_SIZE),
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture-bind-layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene-pipeline-layout"),
            bind_group_layouts: &[&draw_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<MeshVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                        2 => Float32x2
                    ],
                }],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthBuffer::FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
            cache: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("scene-sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let draw_buffer = DrawBuffer::create(&device, &draw_layout, alignment, INITIAL_DRAW_CAPACITY);

        let fallback_texture = GpuTexture::upload(
            &device,
            &queue,
            &texture_layout,
            &sampler,
            &[255, 255, 255, 255],
            1,
            1,
            "fallback-white",
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            size,
            depth,
            pipeline,
            draw_layout,
            draw_buffer,
            texture_layout,
            sampler,
            fallback_texture,
            textures: HashMap::new(),
            units: [None; MAX_TEXTURE_UNITS],
            next_texture: 0,
            meshes: Vec::new(),
            uniforms: UniformStore::new(),
            pending: Vec::new(),
        })
    }

    /// Returns the identifier of the window owned by the renderer.
    pub fn window_id(&self) -> WindowId {
        self.window.id()
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Resizes the swap chain to match the new dimensions.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth = DepthBuffer::create(&self.device, new_size.width, new_size.height);
    }

    /// Drops draws queued since the last frame.
    pub fn begin_frame(&mut self) {
        self.pending.clear();
    }

    /// Uploads the queued draw uniforms and replays every draw in one pass.
    pub fn end_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let pending = std::mem::take(&mut self.pending);
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        if pending.len() > self.draw_buffer.capacity {
            let capacity = pending.len().next_power_of_two();
            self.draw_buffer = DrawBuffer::create(
                &self.device,
                &self.draw_layout,
                self.draw_buffer.stride,
                capacity,
            );
        }
        if !pending.is_empty() {
            let stride = self.draw_buffer.stride as usize;
            let mut bytes = vec![0u8; stride * pending.len()];
            for (index, draw) in pending.iter().enumerate() {
                let offset = index * stride;
                bytes[offset..offset + DRAW_UNIFORM_SIZE as usize]
                    .copy_from_slice(bytes_of(&draw.uniform));
            }
            self.queue
                .write_buffer(&self.draw_buffer.buffer, 0, &bytes);
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene-encoder"),
            });

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.0,
                        g: 0.0,
                        b: 0.0,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.pipeline);
        for (index, draw) in pending.iter().enumerate() {
            let Some(mesh) = self.meshes.get(draw.mesh.0 as usize) else {
                continue;
            };
            let texture = draw
                .texture
                .and_then(|handle| self.textures.get(&handle))
                .unwrap_or(&self.fallback_texture);
            let offset = (index as u64 * self.draw_buffer.stride) as u32;

            pass.set_bind_group(0, &self.draw_buffer.bind_group, &[offset]);
            pass.set_bind_group(1, &texture.bind_group, &[]);
            pass.set_vertex_buffer(0, mesh.vertex.slice(..));
            pass.set_index_buffer(mesh.index.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }

        drop(pass);
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn sampled_texture(&self) -> Option<TextureHandle> {
        if !self.uniforms.get_bool(shading::USE_TEXTURE).unwrap_or(false) {
            return None;
        }
        let unit = self.uniforms.get_int(shading::OBJECT_TEXTURE)?;
        usize::try_from(unit)
            .ok()
            .and_then(|unit| self.units.get(unit).copied().flatten())
    }
}

impl ShadingInterface for Renderer {
    fn set_value(&mut self, name: &str, value: UniformValue) {
        self.uniforms.set_value(name, value);
    }
}

impl GraphicsResources for Renderer {
    fn allocate_texture(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> TextureHandle {
        let rgba;
        let data = match format {
            PixelFormat::Rgba8 => pixels,
            PixelFormat::Rgb8 => {
                rgba = expand_rgb(pixels);
                &rgba[..]
            }
        };
        let handle = TextureHandle(self.next_texture);
        self.next_texture += 1;
        let texture = GpuTexture::upload(
            &self.device,
            &self.queue,
            &self.texture_layout,
            &self.sampler,
            data,
            width,
            height,
            &format!("texture-{}", handle.0),
        );
        self.textures.insert(handle, texture);
        handle
    }

    fn bind_texture_unit(&mut self, handle: TextureHandle, unit: usize) {
        match self.units.get_mut(unit) {
            Some(slot) => *slot = Some(handle),
            None => warn!("texture unit {unit} is out of range"),
        }
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        if self.textures.remove(&handle).is_none() {
            warn!("texture {handle:?} released twice");
        }
        for slot in self.units.iter_mut().filter(|slot| **slot == Some(handle)) {
            *slot = None;
        }
    }

    fn allocate_mesh(&mut self, kind: MeshKind) -> MeshHandle {
        let handle = MeshHandle(self.meshes.len() as u32);
        self.meshes
            .push(MeshBuffers::from_mesh(&self.device, &kind.build(), kind.name()));
        handle
    }

    fn draw_mesh(&mut self, handle: MeshHandle) {
        self.pending.push(PendingDraw {
            mesh: handle,
            uniform: DrawUniform::from_store(&self.uniforms),
            texture: self.sampled_texture(),
        });
    }
}

fn expand_rgb(pixels: &[u8]) -> Vec<u8> {
    pixels
        .chunks_exact(3)
        .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
        .collect()
}

struct PendingDraw {
    mesh: MeshHandle,
    uniform: DrawUniform,
    texture: Option<TextureHandle>,
}

struct DrawBuffer {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    stride: u64,
    capacity: usize,
}

impl DrawBuffer {
    fn create(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        alignment: u64,
        capacity: usize,
    ) -> Self {
        let stride = DRAW_UNIFORM_SIZE.div_ceil(alignment.max(1)) * alignment.max(1);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("draw-uniforms"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw-bind-group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(DRAW_UNIFORM_SIZE),
                }),
            }],
        });
        Self {
            buffer,
            bind_group,
            stride,
            capacity,
        }
    }
}

struct GpuTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

impl GpuTexture {
    #[allow(clippy::too_many_arguments)]
    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        rgba: &[u8],
        width: u32,
        height: u32,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * size.width),
                rows_per_image: Some(size.height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        Self {
            _texture: texture,
            bind_group,
        }
    }
}

struct MeshBuffers {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    fn from_mesh(device: &wgpu::Device, mesh: &MeshData, label: &str) -> Self {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex,
            index,
            index_count: mesh.indices.len() as u32,
        }
    }
}

struct DepthBuffer {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthBuffer {
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

    fn create(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth-texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

const SHADER: &str = r#"
struct PointLight {
    position: vec4<f32>,
    ambient: vec4<f32>,
    diffuse: vec4<f32>,
    specular: vec4<f32>,
}

struct DirectionalLight {
    direction: vec4<f32>,
    ambient: vec4<f32>,
    diffuse: vec4<f32>,
    specular: vec4<f32>,
}

struct SpotLight {
    position: vec4<f32>,
    direction: vec4<f32>,
    ambient: vec4<f32>,
    diffuse: vec4<f32>,
    specular: vec4<f32>,
    attenuation: vec4<f32>,
    cone: vec4<f32>,
}

struct DrawUniform {
    model: mat4x4<f32>,
    normal: mat4x4<f32>,
    view_proj: mat4x4<f32>,
    view_position: vec4<f32>,
    object_color: vec4<f32>,
    material_diffuse: vec4<f32>,
    material_specular: vec4<f32>,
    flags: vec4<f32>,
    point_lights: array<PointLight, 2>,
    directional: DirectionalLight,
    spot: SpotLight,
}

@group(0) @binding(0)
var<uniform> object: DrawUniform;

@group(1) @binding(0)
var object_texture: texture_2d<f32>;
@group(1) @binding(1)
var object_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world_position = object.model * vec4<f32>(input.position, 1.0);
    out.position = object.view_proj * world_position;
    out.world_pos = world_position.xyz;
    out.normal = normalize((object.normal * vec4<f32>(input.normal, 0.0)).xyz);
    out.uv = input.uv;
    return out;
}

fn specular_term(normal: vec3<f32>, light_dir: vec3<f32>, view_dir: vec3<f32>) -> f32 {
    let reflect_dir = reflect(-light_dir, normal);
    let shininess = max(object.material_diffuse.w, 1.0);
    return pow(max(dot(view_dir, reflect_dir), 0.0), shininess);
}

fn point_light(light: PointLight, normal: vec3<f32>, pos: vec3<f32>, view_dir: vec3<f32>, base: vec3<f32>) -> vec3<f32> {
    let light_dir = normalize(light.position.xyz - pos);
    let diff = max(dot(normal, light_dir), 0.0);
    let spec = specular_term(normal, light_dir, view_dir);
    return light.ambient.xyz * base
        + light.diffuse.xyz * diff * base * object.material_diffuse.xyz
        + light.specular.xyz * spec * object.material_specular.xyz;
}

fn directional_light(light: DirectionalLight, normal: vec3<f32>, view_dir: vec3<f32>, base: vec3<f32>) -> vec3<f32> {
    let light_dir = normalize(-light.direction.xyz);
    let diff = max(dot(normal, light_dir), 0.0);
    let spec = specular_term(normal, light_dir, view_dir);
    return light.ambient.xyz * base
        + light.diffuse.xyz * diff * base * object.material_diffuse.xyz
        + light.specular.xyz * spec * object.material_specular.xyz;
}

fn spot_light(light: SpotLight, normal: vec3<f32>, pos: vec3<f32>, view_dir: vec3<f32>, base: vec3<f32>) -> vec3<f32> {
    let to_light = light.position.xyz - pos;
    let light_dir = normalize(to_light);
    let diff = max(dot(normal, light_dir), 0.0);
    let spec = specular_term(normal, light_dir, view_dir);
    let distance = length(to_light);
    let attenuation = 1.0 / max(
        light.attenuation.x + light.attenuation.y * distance + light.attenuation.z * distance * distance,
        0.0001
    );
    let theta = dot(light_dir, normalize(-light.direction.xyz));
    let epsilon = max(light.cone.x - light.cone.y, 0.0001);
    let intensity = clamp((theta - light.cone.y) / epsilon, 0.0, 1.0);
    let ambient = light.ambient.xyz * base;
    let diffuse = light.diffuse.xyz * diff * base * object.material_diffuse.xyz;
    let specular = light.specular.xyz * spec * object.material_specular.xyz;
    return (ambient + (diffuse + specular) * intensity) * attenuation;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let use_texture = object.flags.x > 0.5;
    let use_lighting = object.flags.y > 0.5;
    let uv = input.uv * object.flags.zw;

    let texel = textureSample(object_texture, object_sampler, uv);
    let base = select(object.object_color, texel, use_texture);

    if !use_lighting {
        return base;
    }

    let normal = normalize(input.normal);
    let view_dir = normalize(object.view_position.xyz - input.world_pos);
    var lit = vec3<f32>(0.0);
    for (var i = 0u; i < 2u; i = i + 1u) {
        if object.point_lights[i].position.w > 0.5 {
            lit += point_light(object.point_lights[i], normal, input.world_pos, view_dir, base.rgb);
        }
    }
    if object.directional.direction.w > 0.5 {
        lit += directional_light(object.directional, normal, view_dir, base.rgb);
    }
    if object.spot.position.w > 0.5 {
        lit += spot_light(object.spot, normal, input.world_pos, view_dir, base.rgb);
    }
    return vec4<f32>(lit, base.a);
}
"#;
