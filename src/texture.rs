//! Tag-addressed texture registry.
//!
//! Entries are kept in load order and looked up with a linear scan; the
//! position of an entry is its texture unit, so insertion order matters here
//! in a way it does not for materials.

use std::path::Path;

use log::{info, warn};

use crate::decoder::ImageDecoder;
use crate::error::{TextureError, TextureResult};
use crate::gfx::{GraphicsResources, PixelFormat, TextureHandle, MAX_TEXTURE_UNITS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureEntry {
    pub tag: String,
    pub handle: TextureHandle,
    pub slot: usize,
}

#[derive(Debug)]
pub struct TextureRegistry {
    entries: Vec<TextureEntry>,
    capacity: usize,
}

impl Default for TextureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::with_capacity(MAX_TEXTURE_UNITS)
    }

    /// Registry limited to `capacity` entries, never more than the number of
    /// texture units.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(MAX_TEXTURE_UNITS);
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Decodes `path`, uploads it and registers it under `tag`.
    ///
    /// Returns the slot assigned to the new entry. Failures leave the
    /// registry untouched; the pixel buffer is dropped right after upload.
    pub fn load<D, G>(
        &mut self,
        decoder: &D,
        gfx: &mut G,
        path: &Path,
        tag: &str,
    ) -> TextureResult<usize>
    where
        D: ImageDecoder + ?Sized,
        G: GraphicsResources + ?Sized,
    {
        if self.entries.len() >= self.capacity {
            return Err(TextureError::RegistryFull {
                tag: tag.to_string(),
                capacity: self.capacity,
            });
        }

        let image = decoder.decode(path)?;
        let format = PixelFormat::from_channels(image.channels).ok_or_else(|| {
            TextureError::UnsupportedChannelCount {
                path: path.to_path_buf(),
                channels: image.channels,
            }
        })?;

        let handle = gfx.allocate_texture(&image.pixels, image.width, image.height, format);
        let slot = self.entries.len();
        self.entries.push(TextureEntry {
            tag: tag.to_string(),
            handle,
            slot,
        });
        info!(
            "loaded texture '{tag}' from {} ({}x{}, {} channels) into slot {slot}",
            path.display(),
            image.width,
            image.height,
            image.channels
        );
        Ok(slot)
    }

    /// Loads every `(path, tag)` pair in order. Failed loads are logged and
    /// skipped; the number of textures registered is returned.
    pub fn load_all<'a, D, G, I>(&mut self, decoder: &D, gfx: &mut G, sources: I) -> usize
    where
        D: ImageDecoder + ?Sized,
        G: GraphicsResources + ?Sized,
        I: IntoIterator<Item = (&'a Path, &'a str)>,
    {
        let mut loaded = 0;
        for (path, tag) in sources {
            match self.load(decoder, gfx, path, tag) {
                Ok(_) => loaded += 1,
                Err(err) => warn!("skipping texture '{tag}': {err}"),
            }
        }
        loaded
    }

    /// First entry registered under `tag`.
    pub fn find(&self, tag: &str) -> Option<&TextureEntry> {
        self.entries.iter().find(|entry| entry.tag == tag)
    }

    pub fn find_handle(&self, tag: &str) -> Option<TextureHandle> {
        self.find(tag).map(|entry| entry.handle)
    }

    pub fn find_slot(&self, tag: &str) -> Option<usize> {
        self.find(tag).map(|entry| entry.slot)
    }

    /// Binds every entry to the texture unit equal to its slot.
    pub fn bind_all<G>(&self, gfx: &mut G)
    where
        G: GraphicsResources + ?Sized,
    {
        for entry in &self.entries {
            gfx.bind_texture_unit(entry.handle, entry.slot);
        }
    }

    /// Releases every uploaded texture once and empties the registry.
    pub fn release_all<G>(&mut self, gfx: &mut G)
    where
        G: GraphicsResources + ?Sized,
    {
        for entry in self.entries.drain(..) {
            gfx.release_texture(entry.handle);
        }
    }

    pub fn entries(&self) -> &[TextureEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::*;
    use crate::decoder::DecodedImage;
    use crate::render::recording::{Command, RecordingBackend};

    /// Serves canned images by path; anything unknown fails to decode.
    #[derive(Default)]
    struct FakeDecoder {
        images: HashMap<PathBuf, DecodedImage>,
    }

    impl FakeDecoder {
        fn with(mut self, path: &str, channels: u8) -> Self {
            self.images.insert(
                PathBuf::from(path),
                DecodedImage {
                    pixels: vec![0; 4 * channels as usize],
                    width: 2,
                    height: 2,
                    channels,
                },
            );
            self
        }
    }

    impl ImageDecoder for FakeDecoder {
        fn decode(&self, path: &Path) -> TextureResult<DecodedImage> {
            self.images
                .get(path)
                .cloned()
                .ok_or_else(|| TextureError::Decode {
                    path: path.to_path_buf(),
                    message: "no such file".into(),
                })
        }
    }

    #[test]
    fn loaded_textures_get_dense_slots() {
        let decoder = FakeDecoder::default()
            .with("marble.jpg", 3)
            .with("wood.png", 4);
        let mut gfx = RecordingBackend::new();
        let mut registry = TextureRegistry::new();

        assert_eq!(registry.load(&decoder, &mut gfx, Path::new("marble.jpg"), "marble").unwrap(), 0);
        assert_eq!(registry.load(&decoder, &mut gfx, Path::new("wood.png"), "wood").unwrap(), 1);

        assert_eq!(registry.find_slot("marble"), Some(0));
        assert_eq!(registry.find_slot("wood"), Some(1));
        assert_eq!(
            registry.find_handle("wood"),
            Some(registry.entries()[1].handle)
        );
        assert_eq!(registry.find_slot("glass"), None);
        assert_eq!(registry.find_handle("glass"), None);
    }

    #[test]
    fn decode_failure_registers_nothing() {
        let decoder = FakeDecoder::default();
        let mut gfx = RecordingBackend::new();
        let mut registry = TextureRegistry::new();

        let err = registry
            .load(&decoder, &mut gfx, Path::new("missing.jpg"), "marble")
            .unwrap_err();
        assert!(matches!(err, TextureError::Decode { .. }));
        assert!(registry.is_empty());
        assert!(gfx.commands().is_empty());
    }

    #[test]
    fn unsupported_channel_count_is_rejected() {
        let decoder = FakeDecoder::default().with("gray.png", 1).with("wood.png", 3);
        let mut gfx = RecordingBackend::new();
        let mut registry = TextureRegistry::new();

        let err = registry
            .load(&decoder, &mut gfx, Path::new("gray.png"), "gray")
            .unwrap_err();
        assert!(matches!(
            err,
            TextureError::UnsupportedChannelCount { channels: 1, .. }
        ));
        // The next successful load still starts at slot zero.
        assert_eq!(registry.load(&decoder, &mut gfx, Path::new("wood.png"), "wood").unwrap(), 0);
    }

    #[test]
    fn seventeenth_texture_is_rejected() {
        let decoder = FakeDecoder::default().with("tile.png", 4);
        let mut gfx = RecordingBackend::new();
        let mut registry = TextureRegistry::new();

        for i in 0..MAX_TEXTURE_UNITS {
            let slot = registry
                .load(&decoder, &mut gfx, Path::new("tile.png"), &format!("tile{i}"))
                .unwrap();
            assert_eq!(slot, i);
        }
        let before = registry.entries().to_vec();

        let err = registry
            .load(&decoder, &mut gfx, Path::new("tile.png"), "extra")
            .unwrap_err();
        assert!(matches!(err, TextureError::RegistryFull { capacity: 16, .. }));
        assert_eq!(registry.entries(), before.as_slice());

        registry.bind_all(&mut gfx);
        let units: Vec<usize> = gfx
            .commands()
            .iter()
            .filter_map(|command| match command {
                Command::BindTexture { unit, .. } => Some(*unit),
                _ => None,
            })
            .collect();
        assert_eq!(units, (0..MAX_TEXTURE_UNITS).collect::<Vec<_>>());
    }

    #[test]
    fn duplicate_tags_resolve_to_the_first_entry() {
        let decoder = FakeDecoder::default().with("marble.jpg", 3);
        let mut gfx = RecordingBackend::new();
        let mut registry = TextureRegistry::new();

        registry.load(&decoder, &mut gfx, Path::new("marble.jpg"), "marble").unwrap();
        registry.load(&decoder, &mut gfx, Path::new("marble.jpg"), "marble").unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find_slot("marble"), Some(0));
        assert_eq!(registry.find_slot("marble"), Some(0));
    }

    #[test]
    fn load_all_skips_failures() {
        let decoder = FakeDecoder::default().with("wood.png", 3);
        let mut gfx = RecordingBackend::new();
        let mut registry = TextureRegistry::new();

        let loaded = registry.load_all(
            &decoder,
            &mut gfx,
            [
                (Path::new("missing.jpg"), "marble"),
                (Path::new("wood.png"), "wood"),
            ],
        );
        assert_eq!(loaded, 1);
        assert_eq!(registry.find_slot("marble"), None);
        assert_eq!(registry.find_slot("wood"), Some(0));
    }

    #[test]
    fn release_all_frees_each_handle_once() {
        let decoder = FakeDecoder::default().with("a.png", 4).with("b.png", 4);
        let mut gfx = RecordingBackend::new();
        let mut registry = TextureRegistry::new();
        registry.load(&decoder, &mut gfx, Path::new("a.png"), "a").unwrap();
        registry.load(&decoder, &mut gfx, Path::new("b.png"), "b").unwrap();
        let handles: Vec<_> = registry.entries().iter().map(|e| e.handle).collect();

        registry.release_all(&mut gfx);
        registry.release_all(&mut gfx);

        assert!(registry.is_empty());
        let released: Vec<_> = gfx
            .commands()
            .iter()
            .filter_map(|command| match command {
                Command::ReleaseTexture(handle) => Some(*handle),
                _ => None,
            })
            .collect();
        assert_eq!(released, handles);
        assert_eq!(gfx.live_textures(), 0);
    }
}
