//! Image files and environment saving

use std::path::{Path, PathBuf};

use image::DynamicImage;

use vista_asset::{CompletionRecord, EnvironmentStore};

use crate::error::{BakeError, BakeResult};

/// Open an image file, format chosen from its contents
pub fn read_image(path: &Path) -> BakeResult<DynamicImage> {
    image::open(path).map_err(|source| BakeError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Write an image, format chosen from the extension.
///
/// Float images are quantized to 8 bits first.
pub fn write_image(image: &DynamicImage, path: &Path) -> BakeResult<()> {
    let result = match image {
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            DynamicImage::ImageRgba8(image.to_rgba8()).save(path)
        }
        _ => image.save(path),
    };
    result.map_err(|source| BakeError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Save one environment per color image into `store`.
///
/// `depths` is either empty or holds one depth map per color image. The
/// returned record names the last environment written, as served on `port`.
pub fn save_environments(
    store: &EnvironmentStore,
    name: &str,
    colors: &[PathBuf],
    depths: &[PathBuf],
    port: u16,
) -> BakeResult<CompletionRecord> {
    if colors.is_empty() {
        return Err(BakeError::InvalidParameter("no color images given".to_string()));
    }

    let colors = colors.iter().map(|p| read_image(p)).collect::<BakeResult<Vec<_>>>()?;
    let depths = depths.iter().map(|p| read_image(p)).collect::<BakeResult<Vec<_>>>()?;

    let saved = store.save_batch(name, &colors, Some(depths.as_slice()))?;
    let last = saved
        .last()
        .ok_or_else(|| BakeError::InvalidParameter("nothing was saved".to_string()))?;
    Ok(CompletionRecord::new(last, port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, Rgba32FImage};

    #[test]
    fn test_float_images_written_as_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let image = DynamicImage::ImageRgba32F(Rgba32FImage::from_pixel(4, 2, Rgba([1.0, 0.0, 0.0, 1.0])));

        write_image(&image, &path).unwrap();

        let back = read_image(&path).unwrap().to_rgba8();
        assert_eq!(back.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_missing_input_reports_path() {
        let err = read_image(Path::new("/nonexistent/skybox.png")).unwrap_err();
        assert!(err.to_string().contains("skybox.png"));
    }

    #[test]
    fn test_save_requires_color() {
        let dir = tempfile::tempdir().unwrap();
        let store = EnvironmentStore::new(dir.path());
        assert!(save_environments(&store, "x", &[], &[], 4443).is_err());
    }
}
