//! Perspective to equirectangular projection

use glam::{Mat3, Vec3};
use image::{DynamicImage, Rgb32FImage, Rgba, Rgba32FImage};

use crate::error::{BakeError, BakeResult};

/// Projected directions with a smaller camera-space depth fall behind the camera
const MIN_DEPTH: f32 = 1e-6;

/// Camera placement for [`map_equirectangular`]. Angles are in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Horizontal field of view of the source photo
    pub hfov: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
    /// Output width; the height is half of it
    pub output_width: u32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            hfov: 90.0,
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            output_width: 4096,
        }
    }
}

impl Projection {
    fn validate(&self) -> BakeResult<()> {
        if !(self.hfov > 0.0 && self.hfov < 180.0) {
            return Err(BakeError::InvalidParameter(format!(
                "hfov must be between 0 and 180 degrees, got {}",
                self.hfov
            )));
        }
        if self.output_width < 2 {
            return Err(BakeError::InvalidParameter(format!(
                "output width must be at least 2, got {}",
                self.output_width
            )));
        }
        Ok(())
    }

    /// Rotation taking world directions into the camera frame
    fn rotation(&self) -> Mat3 {
        Mat3::from_rotation_z(self.roll.to_radians())
            * Mat3::from_rotation_y(self.yaw.to_radians())
            * Mat3::from_rotation_x(self.pitch.to_radians())
    }
}

/// Map a perspective image onto an equirectangular canvas.
///
/// Any input alpha is ignored. The output alpha is 1 where the source covers
/// the direction and 0 elsewhere; uncovered pixels are black.
pub fn map_equirectangular(image: &DynamicImage, projection: &Projection) -> BakeResult<Rgba32FImage> {
    projection.validate()?;
    if image.width() == 0 || image.height() == 0 {
        return Err(BakeError::InvalidParameter("input image is empty".to_string()));
    }

    let source = image.to_rgb32f();
    let (w_in, h_in) = (source.width() as f32, source.height() as f32);

    let hfov = projection.hfov.to_radians();
    let vfov = hfov * h_in / w_in;
    let fx = (w_in / 2.0) / (hfov / 2.0).tan();
    let fy = (h_in / 2.0) / (vfov / 2.0).tan();
    let (cx, cy) = (w_in / 2.0, h_in / 2.0);
    let rotation = projection.rotation();

    let w_out = projection.output_width;
    let h_out = w_out / 2;
    let mut output = Rgba32FImage::new(w_out, h_out);

    for y in 0..h_out {
        let phi = (0.5 - y as f32 / h_out as f32) * std::f32::consts::PI;
        for x in 0..w_out {
            let theta = (x as f32 / w_out as f32) * std::f32::consts::TAU - std::f32::consts::PI;
            let dir = Vec3::new(phi.cos() * theta.sin(), -phi.sin(), phi.cos() * theta.cos());
            let cam = rotation * dir;
            if cam.z <= MIN_DEPTH {
                continue;
            }

            let x_im = cam.x / cam.z * fx + cx;
            let y_im = cam.y / cam.z * fy + cy;
            let inside = x_im.is_finite()
                && y_im.is_finite()
                && (0.0..w_in).contains(&x_im)
                && (0.0..h_in).contains(&y_im);
            if !inside {
                continue;
            }

            let [r, g, b] = sample_bilinear(&source, x_im, y_im);
            output.put_pixel(
                x,
                y,
                Rgba([r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0), 1.0]),
            );
        }
    }

    log::debug!(
        "Projected {}x{} image (hfov {}) to {}x{}",
        source.width(),
        source.height(),
        projection.hfov,
        w_out,
        h_out
    );
    Ok(output)
}

/// Bilinear sample treating pixel centers as integer coordinates.
fn sample_bilinear(image: &Rgb32FImage, x: f32, y: f32) -> [f32; 3] {
    let max_x = image.width() - 1;
    let max_y = image.height() - 1;
    let x = x.clamp(0.0, max_x as f32);
    let y = y.clamp(0.0, max_y as f32);

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(max_x);
    let y1 = (y0 + 1).min(max_y);
    let tx = x - x0 as f32;
    let ty = y - y0 as f32;

    let p00 = image.get_pixel(x0, y0).0;
    let p10 = image.get_pixel(x1, y0).0;
    let p01 = image.get_pixel(x0, y1).0;
    let p11 = image.get_pixel(x1, y1).0;

    let mut out = [0.0; 3];
    for c in 0..3 {
        let top = p00[c] + (p10[c] - p00[c]) * tx;
        let bottom = p01[c] + (p11[c] - p01[c]) * tx;
        out[c] = top + (bottom - top) * ty;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use image::{Rgb, RgbImage};

    fn split_image() -> DynamicImage {
        // Left half black, right half white
        DynamicImage::ImageRgb8(RgbImage::from_fn(8, 8, |x, _| {
            if x < 4 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        }))
    }

    fn solid(w: u32, h: u32, rgb: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb(rgb)))
    }

    #[test]
    fn test_output_is_two_to_one() {
        let projection = Projection {
            output_width: 64,
            ..Default::default()
        };
        let out = map_equirectangular(&solid(4, 4, [255, 0, 0]), &projection).unwrap();
        assert_eq!(out.dimensions(), (64, 32));
    }

    #[test]
    fn test_front_is_covered_and_back_is_transparent() {
        let projection = Projection {
            output_width: 64,
            ..Default::default()
        };
        let out = map_equirectangular(&solid(4, 4, [255, 0, 0]), &projection).unwrap();

        let front = out.get_pixel(32, 16).0;
        assert_relative_eq!(front[0], 1.0);
        assert_relative_eq!(front[1], 0.0);
        assert_relative_eq!(front[3], 1.0);

        let back = out.get_pixel(0, 16).0;
        assert_eq!(back, [0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_right_of_center_samples_right_half() {
        let projection = Projection {
            output_width: 64,
            ..Default::default()
        };
        let out = map_equirectangular(&split_image(), &projection).unwrap();

        // 22.5 degrees either side of center
        assert_relative_eq!(out.get_pixel(36, 16).0[0], 1.0);
        assert_relative_eq!(out.get_pixel(28, 16).0[0], 0.0);
    }

    #[test]
    fn test_yaw_moves_coverage() {
        let projection = Projection {
            yaw: 90.0,
            output_width: 64,
            ..Default::default()
        };
        let out = map_equirectangular(&solid(4, 4, [255, 255, 255]), &projection).unwrap();

        assert_relative_eq!(out.get_pixel(16, 16).0[3], 1.0);
        assert_relative_eq!(out.get_pixel(32, 16).0[3], 0.0);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let image = solid(4, 4, [0, 0, 0]);
        let wide = Projection {
            hfov: 180.0,
            ..Default::default()
        };
        assert!(matches!(
            map_equirectangular(&image, &wide),
            Err(BakeError::InvalidParameter(_))
        ));

        let narrow = Projection {
            output_width: 1,
            ..Default::default()
        };
        assert!(map_equirectangular(&image, &narrow).is_err());
    }
}
