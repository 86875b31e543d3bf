//! Seam blending for panoramas
//!
//! The first and last columns of an equirectangular image meet on the
//! sphere. Depth estimators treat them independently, so the two borders
//! rarely agree; this pulls both toward their average over a short ramp.

use image::Rgba32FImage;

/// Blend the vertical edges of `image` in place.
///
/// `distance` is the ramp width in pixels, capped at half the image width.
/// Column `i` from either edge moves `(distance - i) / distance` of the way
/// toward the edge average, so the outermost columns end up equal.
pub fn interpolate_edges(image: &mut Rgba32FImage, distance: u32) {
    let (width, height) = image.dimensions();
    let distance = distance.min(width / 2);
    if distance == 0 {
        return;
    }

    for y in 0..height {
        let left = image.get_pixel(0, y).0;
        let right = image.get_pixel(width - 1, y).0;

        for i in 0..distance {
            let blend = (distance - i) as f32 / distance as f32;
            for c in 0..4 {
                let average = (left[c] + right[c]) / 2.0;
                image.get_pixel_mut(i, y).0[c] -= blend * (left[c] - average);
                image.get_pixel_mut(width - 1 - i, y).0[c] -= blend * (right[c] - average);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use image::Rgba;

    fn ramp(width: u32) -> Rgba32FImage {
        Rgba32FImage::from_fn(width, 2, |x, _| {
            let v = x as f32 / (width - 1) as f32;
            Rgba([v, v, v, 1.0])
        })
    }

    #[test]
    fn test_edges_meet_at_average() {
        let mut image = ramp(10);
        interpolate_edges(&mut image, 3);

        let left = image.get_pixel(0, 0).0[0];
        let right = image.get_pixel(9, 0).0[0];
        assert_relative_eq!(left, 0.5);
        assert_relative_eq!(right, 0.5);
    }

    #[test]
    fn test_ramp_fades_inward() {
        let mut image = ramp(10);
        let before = image.get_pixel(1, 0).0[0];
        interpolate_edges(&mut image, 3);

        // Second column moves two thirds of the half-gap
        assert_relative_eq!(image.get_pixel(1, 0).0[0], before + 0.5 * 2.0 / 3.0, epsilon = 1e-6);
        // Beyond the ramp nothing changes
        assert_relative_eq!(image.get_pixel(4, 0).0[0], 4.0 / 9.0);
        // Alpha edges already agree
        assert_relative_eq!(image.get_pixel(0, 1).0[3], 1.0);
    }

    #[test]
    fn test_distance_capped_at_half_width() {
        let mut image = ramp(4);
        interpolate_edges(&mut image, 100);

        // Columns 0 and 3 blend fully, 1 and 2 by half
        assert_relative_eq!(image.get_pixel(0, 0).0[0], 0.5);
        assert_relative_eq!(image.get_pixel(1, 0).0[0], 1.0 / 3.0 + 0.25, epsilon = 1e-6);
        assert_relative_eq!(image.get_pixel(2, 0).0[0], 2.0 / 3.0 - 0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_distance_is_noop() {
        let mut image = ramp(6);
        let before = image.clone();
        interpolate_edges(&mut image, 0);
        assert_eq!(image, before);
    }
}
