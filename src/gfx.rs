//! Graphics-resource seam: texture upload/binding and mesh submission.

use crate::mesh::MeshKind;
use crate::shading::ShadingInterface;

/// Number of texture units a scene may bind at once.
pub const MAX_TEXTURE_UNITS: usize = 16;

/// Opaque reference to an uploaded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Opaque reference to uploaded mesh buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

/// Pixel layouts accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    pub fn from_channels(channels: u8) -> Option<Self> {
        match channels {
            3 => Some(Self::Rgb8),
            4 => Some(Self::Rgba8),
            _ => None,
        }
    }

    pub fn channels(self) -> u8 {
        match self {
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }
}

pub trait GraphicsResources {
    fn allocate_texture(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> TextureHandle;

    fn bind_texture_unit(&mut self, handle: TextureHandle, unit: usize);

    fn release_texture(&mut self, handle: TextureHandle);

    fn allocate_mesh(&mut self, kind: MeshKind) -> MeshHandle;

    /// Draws with whatever shading state was written last.
    fn draw_mesh(&mut self, handle: MeshHandle);
}

/// Everything the composer needs from a backend.
pub trait RenderBackend: ShadingInterface + GraphicsResources {}

impl<T> RenderBackend for T where T: ShadingInterface + GraphicsResources + ?Sized {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rgb_and_rgba_map_to_formats() {
        assert_eq!(PixelFormat::from_channels(3), Some(PixelFormat::Rgb8));
        assert_eq!(PixelFormat::from_channels(4), Some(PixelFormat::Rgba8));
        for channels in [0, 1, 2, 5] {
            assert_eq!(PixelFormat::from_channels(channels), None);
        }
        assert_eq!(PixelFormat::Rgba8.channels(), 4);
    }
}
