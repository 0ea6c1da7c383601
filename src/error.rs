use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while registering a texture.
///
/// None of these are fatal for the scene: the registry logs them and the
/// affected tag simply stays unregistered.
#[derive(Error, Debug)]
pub enum TextureError {
    /// The image file could not be read or decoded.
    #[error("could not load image {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    /// Only 3 (RGB) and 4 (RGBA) channel images can be uploaded.
    #[error("not implemented to handle image {} with {channels} channels", path.display())]
    UnsupportedChannelCount { path: PathBuf, channels: u8 },

    /// Every texture unit is already taken.
    #[error("cannot register texture '{tag}': all {capacity} texture slots are in use")]
    RegistryFull { tag: String, capacity: usize },
}

pub type TextureResult<T> = std::result::Result<T, TextureError>;
