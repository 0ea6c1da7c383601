use std::path::Path;

use image::DynamicImage;

use crate::error::{TextureError, TextureResult};

/// Raw 8-bit pixels produced by an [`ImageDecoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

/// Turns an image file into raw pixels.
pub trait ImageDecoder {
    fn decode(&self, path: &Path) -> TextureResult<DecodedImage>;
}

/// Decoder backed by the `image` crate.
///
/// Images are flipped vertically on load so that row zero is the bottom of
/// the picture, which is where texture coordinate `v = 0` samples.
#[derive(Debug, Clone, Copy)]
pub struct FileImageDecoder {
    pub flip_vertically: bool,
}

impl Default for FileImageDecoder {
    fn default() -> Self {
        Self {
            flip_vertically: true,
        }
    }
}

impl ImageDecoder for FileImageDecoder {
    fn decode(&self, path: &Path) -> TextureResult<DecodedImage> {
        let image = image::open(path).map_err(|err| TextureError::Decode {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let image = if self.flip_vertically {
            image.flipv()
        } else {
            image
        };
        Ok(into_decoded(image))
    }
}

fn into_decoded(image: DynamicImage) -> DecodedImage {
    let (width, height) = (image.width(), image.height());
    let channels = image.color().channel_count();
    let pixels = match image {
        DynamicImage::ImageRgb8(buffer) => buffer.into_raw(),
        DynamicImage::ImageRgba8(buffer) => buffer.into_raw(),
        other => match channels {
            3 => other.to_rgb8().into_raw(),
            4 => other.to_rgba8().into_raw(),
            // Left as-is; the registry rejects these channel counts.
            _ => other.into_bytes(),
        },
    };
    DecodedImage {
        pixels,
        width,
        height,
        channels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn flips_rows_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stripes.png");
        let mut img = RgbImage::new(1, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(0, 1, Rgb([0, 0, 255]));
        img.save(&path).unwrap();

        let decoded = FileImageDecoder::default().decode(&path).unwrap();
        assert_eq!((decoded.width, decoded.height, decoded.channels), (1, 2, 3));
        assert_eq!(decoded.pixels, vec![0, 0, 255, 255, 0, 0]);

        let unflipped = FileImageDecoder {
            flip_vertically: false,
        }
        .decode(&path)
        .unwrap();
        assert_eq!(unflipped.pixels, vec![255, 0, 0, 0, 0, 255]);
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let err = FileImageDecoder::default()
            .decode(Path::new("does/not/exist.png"))
            .unwrap_err();
        assert!(matches!(err, TextureError::Decode { .. }));
    }

    #[test]
    fn grayscale_keeps_its_channel_count() {
        let decoded = into_decoded(DynamicImage::new_luma8(2, 2));
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.pixels.len(), 4);
    }
}
