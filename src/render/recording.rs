//! In-memory backend that records every call instead of touching a GPU.
//!
//! Used by the headless summary mode and throughout the test suite.

use std::collections::{HashMap, HashSet};

use log::warn;

use crate::gfx::{GraphicsResources, MeshHandle, PixelFormat, TextureHandle, MAX_TEXTURE_UNITS};
use crate::mesh::MeshKind;
use crate::shading::{self, ShadingInterface, UniformStore, UniformValue};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetUniform {
        name: String,
        value: UniformValue,
    },
    AllocateTexture {
        handle: TextureHandle,
        width: u32,
        height: u32,
        format: PixelFormat,
    },
    BindTexture {
        handle: TextureHandle,
        unit: usize,
    },
    ReleaseTexture(TextureHandle),
    AllocateMesh {
        handle: MeshHandle,
        kind: MeshKind,
    },
    Draw(MeshHandle),
}

/// State captured at one draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub mesh: Option<MeshKind>,
    pub uniforms: UniformStore,
    /// Texture sampled by the draw, if texturing was on and the unit named
    /// by the sampler had something bound.
    pub texture: Option<TextureHandle>,
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    commands: Vec<Command>,
    uniforms: UniformStore,
    draws: Vec<DrawRecord>,
    units: [Option<TextureHandle>; MAX_TEXTURE_UNITS],
    live_textures: HashSet<TextureHandle>,
    meshes: HashMap<MeshHandle, MeshKind>,
    next_texture: u32,
    next_mesh: u32,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    pub fn uniforms(&self) -> &UniformStore {
        &self.uniforms
    }

    pub fn live_textures(&self) -> usize {
        self.live_textures.len()
    }

    pub fn mesh_kind(&self, handle: MeshHandle) -> Option<MeshKind> {
        self.meshes.get(&handle).copied()
    }

    pub fn texture_in_unit(&self, unit: usize) -> Option<TextureHandle> {
        self.units.get(unit).copied().flatten()
    }

    /// Forgets recorded commands and draws but keeps resources and uniform
    /// state, like the start of a new frame.
    pub fn clear_log(&mut self) {
        self.commands.clear();
        self.draws.clear();
    }

    fn sampled_texture(&self) -> Option<TextureHandle> {
        if !self.uniforms.get_bool(shading::USE_TEXTURE).unwrap_or(false) {
            return None;
        }
        let unit = self.uniforms.get_int(shading::OBJECT_TEXTURE)?;
        usize::try_from(unit)
            .ok()
            .and_then(|unit| self.texture_in_unit(unit))
    }
}

impl ShadingInterface for RecordingBackend {
    fn set_value(&mut self, name: &str, value: UniformValue) {
        self.uniforms.set_value(name, value);
        self.commands.push(Command::SetUniform {
            name: name.to_string(),
            value,
        });
    }
}

impl GraphicsResources for RecordingBackend {
    fn allocate_texture(
        &mut self,
        _pixels: &[u8],
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> TextureHandle {
        let handle = TextureHandle(self.next_texture);
        self.next_texture += 1;
        self.live_textures.insert(handle);
        self.commands.push(Command::AllocateTexture {
            handle,
            width,
            height,
            format,
        });
        handle
    }

    fn bind_texture_unit(&mut self, handle: TextureHandle, unit: usize) {
        let Some(slot) = self.units.get_mut(unit) else {
            warn!("texture unit {unit} is out of range");
            return;
        };
        *slot = Some(handle);
        self.commands.push(Command::BindTexture { handle, unit });
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        if !self.live_textures.remove(&handle) {
            warn!("texture {handle:?} released twice");
        }
        for slot in self.units.iter_mut().filter(|slot| **slot == Some(handle)) {
            *slot = None;
        }
        self.commands.push(Command::ReleaseTexture(handle));
    }

    fn allocate_mesh(&mut self, kind: MeshKind) -> MeshHandle {
        let handle = MeshHandle(self.next_mesh);
        self.next_mesh += 1;
        self.meshes.insert(handle, kind);
        self.commands.push(Command::AllocateMesh { handle, kind });
        handle
    }

    fn draw_mesh(&mut self, handle: MeshHandle) {
        let record = DrawRecord {
            mesh: self.mesh_kind(handle),
            uniforms: self.uniforms.clone(),
            texture: self.sampled_texture(),
        };
        self.draws.push(record);
        self.commands.push(Command::Draw(handle));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_snapshot_the_current_uniforms() {
        let mut backend = RecordingBackend::new();
        let cube = backend.allocate_mesh(MeshKind::Box);
        backend.set_float(shading::MATERIAL_SHININESS, 5.0);
        backend.draw_mesh(cube);
        backend.set_float(shading::MATERIAL_SHININESS, 1.0);
        backend.draw_mesh(cube);

        let shininess: Vec<_> = backend
            .draws()
            .iter()
            .map(|draw| draw.uniforms.get_float(shading::MATERIAL_SHININESS))
            .collect();
        assert_eq!(shininess, [Some(5.0), Some(1.0)]);
        assert_eq!(backend.draws()[0].mesh, Some(MeshKind::Box));
    }

    #[test]
    fn sampled_texture_follows_the_sampler_unit() {
        let mut backend = RecordingBackend::new();
        let plane = backend.allocate_mesh(MeshKind::Plane);
        let marble = backend.allocate_texture(&[0; 3], 1, 1, PixelFormat::Rgb8);
        let wood = backend.allocate_texture(&[0; 3], 1, 1, PixelFormat::Rgb8);
        backend.bind_texture_unit(marble, 0);
        backend.bind_texture_unit(wood, 1);

        backend.set_bool(shading::USE_TEXTURE, true);
        backend.set_sampler(shading::OBJECT_TEXTURE, 1);
        backend.draw_mesh(plane);
        backend.set_bool(shading::USE_TEXTURE, false);
        backend.draw_mesh(plane);

        assert_eq!(backend.draws()[0].texture, Some(wood));
        assert_eq!(backend.draws()[1].texture, None);
    }

    #[test]
    fn out_of_range_units_are_ignored() {
        let mut backend = RecordingBackend::new();
        let handle = backend.allocate_texture(&[0; 4], 1, 1, PixelFormat::Rgba8);
        backend.bind_texture_unit(handle, MAX_TEXTURE_UNITS);
        assert!(!backend
            .commands()
            .iter()
            .any(|command| matches!(command, Command::BindTexture { .. })));
    }

    #[test]
    fn releasing_clears_bound_units() {
        let mut backend = RecordingBackend::new();
        let handle = backend.allocate_texture(&[0; 4], 1, 1, PixelFormat::Rgba8);
        backend.bind_texture_unit(handle, 3);
        backend.release_texture(handle);
        assert_eq!(backend.texture_in_unit(3), None);
        assert_eq!(backend.live_textures(), 0);
    }
}
