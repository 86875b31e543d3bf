//! Depth raster sampling

use image::DynamicImage;

use crate::error::{MeshError, MeshResult};

/// Single-channel depth raster extracted from a decoded depth image.
///
/// Only the red channel is kept; samples are normalized to `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthRaster {
    width: u32,
    height: u32,
    values: Vec<u8>,
}

impl DepthRaster {
    /// Extract the red channel of a decoded image.
    pub fn from_image(image: &DynamicImage) -> MeshResult<Self> {
        let rgba = image.to_rgba8();
        Self::from_rgba(rgba.width(), rgba.height(), rgba.as_raw())
    }

    /// Build from a tightly packed RGBA8 buffer.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> MeshResult<Self> {
        if width == 0 || height == 0 {
            return Err(MeshError::RasterUnavailable(format!(
                "depth image has no pixels ({}x{})",
                width, height
            )));
        }
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(MeshError::RasterUnavailable(format!(
                "expected {} bytes for {}x{} RGBA, got {}",
                expected,
                width,
                height,
                rgba.len()
            )));
        }

        Ok(Self {
            width,
            height,
            values: rgba.chunks_exact(4).map(|px| px[0]).collect(),
        })
    }

    /// Raster width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Raster height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Nearest-pixel sample at `(u, v)`, `v` running top to bottom.
    ///
    /// Coordinates that land outside the raster return 0.
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        if !u.is_finite() || !v.is_finite() {
            return 0.0;
        }
        let x = (u * self.width as f32).floor();
        let y = (v * self.height as f32).floor();
        if x < 0.0 || y < 0.0 || x >= self.width as f32 || y >= self.height as f32 {
            return 0.0;
        }
        self.texel(x as u32, y as u32)
    }

    /// Nearest-pixel sample that wraps `u` around the panorama and clamps
    /// `v` to the first and last rows.
    ///
    /// Used for mesh vertices, whose pole and seam coordinates sit exactly on
    /// or just past the raster edge. Through [`sample`](Self::sample) the
    /// bottom pole ring (`v = 1`) and the closing column (`u = 1`) would read
    /// 0 and land at `min_distance + depth_range` whatever the depth map says.
    pub fn sample_edge(&self, u: f32, v: f32) -> f32 {
        if !u.is_finite() || !v.is_finite() {
            return 0.0;
        }
        let x = ((u * self.width as f32).floor() as i64).rem_euclid(self.width as i64);
        let y = ((v * self.height as f32).floor() as i64).clamp(0, self.height as i64 - 1);
        self.texel(x as u32, y as u32)
    }

    fn texel(&self, x: u32, y: u32) -> f32 {
        let index = y as usize * self.width as usize + x as usize;
        self.values[index] as f32 / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> DepthRaster {
        let mut rgba = Vec::new();
        for y in 0..height {
            for x in 0..width {
                rgba.extend_from_slice(&[(x * 10 + y) as u8, 0, 0, 255]);
            }
        }
        DepthRaster::from_rgba(width, height, &rgba).unwrap()
    }

    #[test]
    fn test_nearest_pixel() {
        let raster = gradient(4, 2);
        assert_eq!(raster.sample(0.0, 0.0), 0.0);
        assert_eq!(raster.sample(0.3, 0.0), 10.0 / 255.0);
        assert_eq!(raster.sample(0.99, 0.6), 31.0 / 255.0);
    }

    #[test]
    fn test_out_of_bounds_is_zero() {
        let raster = DepthRaster::from_rgba(2, 2, &[255; 16]).unwrap();
        assert_eq!(raster.sample(0.5, 0.5), 1.0);
        for (u, v) in [(1.0, 0.5), (0.5, 1.0), (-0.01, 0.5), (0.5, -0.2), (3.0, 7.0)] {
            assert_eq!(raster.sample(u, v), 0.0, "({}, {})", u, v);
        }
        assert_eq!(raster.sample(f32::NAN, 0.5), 0.0);
        assert_eq!(raster.sample(0.5, f32::INFINITY), 0.0);
    }

    #[test]
    fn test_edge_sampling_wraps_and_clamps() {
        let raster = gradient(4, 2);
        assert_eq!(raster.sample_edge(1.0, 0.0), raster.sample(0.0, 0.0));
        assert_eq!(raster.sample_edge(-0.1, 0.0), raster.sample(0.9, 0.0));
        assert_eq!(raster.sample_edge(0.3, 1.0), raster.sample(0.3, 0.9));
    }

    #[test]
    fn test_empty_raster_rejected() {
        assert!(matches!(
            DepthRaster::from_rgba(0, 4, &[]),
            Err(MeshError::RasterUnavailable(_))
        ));
        assert!(DepthRaster::from_rgba(2, 2, &[0; 15]).is_err());
    }

    #[test]
    fn test_from_image_uses_red_channel() {
        let mut img = image::RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([51, 200, 200, 255]));
        img.put_pixel(1, 0, image::Rgba([102, 0, 0, 255]));
        let raster = DepthRaster::from_image(&DynamicImage::ImageRgba8(img)).unwrap();
        assert_eq!(raster.sample(0.0, 0.0), 0.2);
        assert_eq!(raster.sample(0.5, 0.0), 0.4);
    }
}
