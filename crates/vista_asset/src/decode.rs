//! Decoded environment images

use image::DynamicImage;

use crate::error::{AssetError, AssetResult};

/// Color image ready for texture upload
#[derive(Clone, Debug)]
pub struct ColorImage {
    /// Raw pixel data (RGBA8)
    pub data: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Bytes per row
    pub bytes_per_row: u32,
    /// Is sRGB
    pub srgb: bool,
}

impl ColorImage {
    /// Decode PNG/JPEG bytes
    pub fn decode(bytes: &[u8], path: &str) -> AssetResult<Self> {
        Ok(Self::from_image(&decode_image(bytes, path)?))
    }

    /// Convert a decoded image
    pub fn from_image(image: &DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            data: rgba.into_raw(),
            width,
            height,
            bytes_per_row: width * 4,
            srgb: true,
        }
    }

    /// Single-colored image, used before the first environment arrives
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            data: rgba.to_vec(),
            width: 1,
            height: 1,
            bytes_per_row: 4,
            srgb: true,
        }
    }
}

/// Decode image bytes, naming `path` in the error.
pub fn decode_image(bytes: &[u8], path: &str) -> AssetResult<DynamicImage> {
    image::load_from_memory(bytes).map_err(|source| AssetError::Decode {
        path: path.to_string(),
        source,
    })
}

/// A loaded environment
#[derive(Clone, Debug)]
pub struct Environment {
    /// Directory name
    pub name: String,
    /// Skybox colors
    pub color: ColorImage,
    /// Depth map, if one was available
    pub depth: Option<DynamicImage>,
}

impl Environment {
    /// Whether a depth map was loaded
    pub fn has_depth(&self) -> bool {
        self.depth.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(image::RgbaImage::new(width, height));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_color() {
        let color = ColorImage::decode(&png_bytes(8, 4), "skybox.png").unwrap();
        assert_eq!((color.width, color.height), (8, 4));
        assert_eq!(color.bytes_per_row, 32);
        assert_eq!(color.data.len(), 8 * 4 * 4);
    }

    #[test]
    fn test_decode_garbage_names_path() {
        let err = ColorImage::decode(b"not an image", "environments/x/skybox.png").unwrap_err();
        assert!(err.to_string().contains("environments/x/skybox.png"));
    }
}
