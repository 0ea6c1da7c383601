//! Scene preparation and the per-frame draw script.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use glam::{Vec2, Vec4};
use log::{debug, info, warn};

use crate::config::SceneConfig;
use crate::decoder::ImageDecoder;
use crate::gfx::{MeshHandle, RenderBackend};
use crate::input::InputSource;
use crate::light::LightRig;
use crate::material::MaterialRegistry;
use crate::mesh::MeshKind;
use crate::scene::{Scene, SceneObject};
use crate::shading::{self, ShadingInterface};
use crate::texture::TextureRegistry;
use crate::transform;
use crate::view::{ViewController, ViewFrame};
use crate::viewport::ViewportProvider;

/// Counts reported by [`SceneComposer::prepare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrepareSummary {
    pub textures: usize,
    pub materials: usize,
    pub meshes: usize,
}

/// Owns the registries and replays the scene's draw list each frame.
#[derive(Debug)]
pub struct SceneComposer {
    scene: Scene,
    texture_sources: Vec<(PathBuf, String)>,
    textures: TextureRegistry,
    materials: MaterialRegistry,
    lights: LightRig,
    meshes: HashMap<MeshKind, MeshHandle>,
    prepared: bool,
}

impl SceneComposer {
    pub fn new(scene: Scene, texture_sources: Vec<(PathBuf, String)>) -> Self {
        Self {
            scene,
            texture_sources,
            textures: TextureRegistry::new(),
            materials: MaterialRegistry::new(),
            lights: LightRig::default(),
            meshes: HashMap::new(),
            prepared: false,
        }
    }

    /// Loads and binds textures, defines materials, pushes the lights and
    /// uploads one buffer per mesh kind. Only the first call does anything.
    pub fn prepare<D, B>(&mut self, decoder: &D, backend: &mut B) -> PrepareSummary
    where
        D: ImageDecoder + ?Sized,
        B: RenderBackend + ?Sized,
    {
        if self.prepared {
            warn!("scene already prepared");
            return self.summary();
        }

        self.textures.load_all(
            decoder,
            backend,
            self.texture_sources
                .iter()
                .map(|(path, tag)| (path.as_path(), tag.as_str())),
        );
        self.textures.bind_all(backend);
        self.materials.define_all();
        self.lights.setup_all(backend);
        for kind in MeshKind::ALL {
            let handle = backend.allocate_mesh(kind);
            self.meshes.insert(kind, handle);
        }
        self.prepared = true;

        let summary = self.summary();
        info!(
            "scene prepared: {} textures, {} materials, {} meshes",
            summary.textures, summary.materials, summary.meshes
        );
        summary
    }

    fn summary(&self) -> PrepareSummary {
        PrepareSummary {
            textures: self.textures.len(),
            materials: self.materials.len(),
            meshes: self.meshes.len(),
        }
    }

    /// Issues every object's transform, color, material, texture and draw.
    /// Returns the number of draw calls made.
    pub fn render<B>(&self, backend: &mut B) -> usize
    where
        B: RenderBackend + ?Sized,
    {
        let mut draws = 0;
        for object in &self.scene.objects {
            if self.render_object(backend, object) {
                draws += 1;
            }
        }
        draws
    }

    fn render_object<B>(&self, backend: &mut B, object: &SceneObject) -> bool
    where
        B: RenderBackend + ?Sized,
    {
        let Some(&mesh) = self.meshes.get(&object.mesh) else {
            warn!("no {} mesh prepared for '{}'", object.mesh.name(), object.name);
            return false;
        };

        transform::apply(backend, &object.transform);
        if let Some(color) = object.color {
            set_color(backend, color);
        }
        if let Some(tag) = object.material.as_deref() {
            self.materials.select(backend, tag);
        }
        if let Some(tag) = object.texture.as_deref() {
            self.set_texture(backend, tag);
        }
        set_uv_scale(backend, object.uv_scale.unwrap_or(Vec2::ONE));
        backend.draw_mesh(mesh);
        true
    }

    /// Turns texturing on with the slot registered under `tag`. Unknown tags
    /// change nothing.
    pub fn set_texture<S>(&self, shading: &mut S, tag: &str) -> bool
    where
        S: ShadingInterface + ?Sized,
    {
        let Some(slot) = self.textures.find_slot(tag) else {
            debug!("texture '{tag}' not found, skipping");
            return false;
        };
        shading.set_bool(shading::USE_TEXTURE, true);
        shading.set_sampler(shading::OBJECT_TEXTURE, slot as i32);
        true
    }

    /// Releases every uploaded texture.
    pub fn teardown<B>(&mut self, backend: &mut B)
    where
        B: RenderBackend + ?Sized,
    {
        self.textures.release_all(backend);
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }
}

/// Solid color for the next draw; texturing is switched off.
pub fn set_color<S>(shading: &mut S, color: Vec4)
where
    S: ShadingInterface + ?Sized,
{
    shading.set_bool(shading::USE_TEXTURE, false);
    shading.set_vec4(shading::OBJECT_COLOR, color);
}

pub fn set_uv_scale<S>(shading: &mut S, scale: Vec2)
where
    S: ShadingInterface + ?Sized,
{
    shading.set_vec2(shading::UV_SCALE, scale);
}

/// Everything the window callbacks and the frame loop share: the view
/// controller and the composer. The host owns it and passes it to each
/// callback.
#[derive(Debug)]
pub struct SceneContext {
    pub view: ViewController,
    pub composer: SceneComposer,
}

impl SceneContext {
    pub fn new(view: ViewController, composer: SceneComposer) -> Self {
        Self { view, composer }
    }

    /// Still-life scene with camera, keys and textures taken from `config`.
    pub fn from_config(config: &SceneConfig) -> Result<Self> {
        Ok(Self::new(
            ViewController::from_config(config)?,
            SceneComposer::new(Scene::still_life(), config.texture_sources()),
        ))
    }

    pub fn prepare<D, B>(&mut self, decoder: &D, backend: &mut B) -> PrepareSummary
    where
        D: ImageDecoder + ?Sized,
        B: RenderBackend + ?Sized,
    {
        self.composer.prepare(decoder, backend)
    }

    pub fn on_mouse_move(&mut self, x: f32, y: f32) {
        self.view.on_mouse_move(x, y);
    }

    pub fn on_scroll(&mut self, y_offset: f32) {
        self.view.on_scroll(y_offset);
    }

    pub fn restart_clock(&mut self, now: f64) {
        self.view.restart_clock(now);
    }

    /// One frame: camera update and push, then the draw list.
    pub fn frame<I, V, B>(&mut self, now: f64, input: &I, viewport: &V, backend: &mut B) -> ViewFrame
    where
        I: InputSource + ?Sized,
        V: ViewportProvider + ?Sized,
        B: RenderBackend + ?Sized,
    {
        let frame = self.view.prepare_view(now, input, viewport, backend);
        self.composer.render(backend);
        frame
    }

    pub fn shutdown<B>(&mut self, backend: &mut B)
    where
        B: RenderBackend + ?Sized,
    {
        self.composer.teardown(backend);
    }
}
