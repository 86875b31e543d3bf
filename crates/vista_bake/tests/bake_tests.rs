//! End-to-end bake pipeline tests

use image::{DynamicImage, Luma, Rgb, RgbImage};
use tempfile::TempDir;

use vista_asset::{list_environment_dirs, CompletionRecord, EnvironmentStore, COLOR_FILE, DEPTH_FILE};
use vista_bake::{
    interpolate_edges, map_equirectangular, read_image, save_environments, write_image, BakeError,
    Projection,
};

fn write_fixture(dir: &TempDir, file: &str, image: DynamicImage) -> std::path::PathBuf {
    let path = dir.path().join(file);
    write_image(&image, &path).unwrap();
    path
}

#[test]
fn test_projection_then_save_produces_viewable_environment() {
    let dir = tempfile::tempdir().unwrap();
    let photo = write_fixture(
        &dir,
        "photo.png",
        DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 12, Rgb([200, 100, 50]))),
    );

    let projection = Projection {
        hfov: 60.0,
        output_width: 128,
        ..Default::default()
    };
    let projected = map_equirectangular(&read_image(&photo).unwrap(), &projection).unwrap();
    let pano = write_fixture(&dir, "pano.png", DynamicImage::ImageRgba32F(projected));

    let store = EnvironmentStore::new(dir.path().join("environments"));
    let record = save_environments(&store, "Forest: day?", &[pano], &[], 4443).unwrap();

    assert_eq!(record, CompletionRecord::new("Forest_ day_", 4443));
    let saved = dir.path().join("environments").join("Forest_ day_");
    assert!(saved.join(COLOR_FILE).is_file());
    assert!(!saved.join(DEPTH_FILE).exists());

    let color = read_image(&saved.join(COLOR_FILE)).unwrap();
    assert_eq!((color.width(), color.height()), (128, 64));
}

#[test]
fn test_blended_depth_saved_with_batch() {
    let dir = tempfile::tempdir().unwrap();
    let color = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 4, Rgb([10, 20, 30])));
    let depth = DynamicImage::ImageLuma8(image::GrayImage::from_fn(8, 4, |x, _| Luma([(x * 30) as u8])));

    let mut blended = depth.to_rgba32f();
    interpolate_edges(&mut blended, 2);
    let left = blended.get_pixel(0, 0).0[0];
    let right = blended.get_pixel(7, 0).0[0];
    assert!((left - right).abs() < 1e-6);

    let colors = vec![
        write_fixture(&dir, "a.png", color.clone()),
        write_fixture(&dir, "b.png", color),
    ];
    let depths = vec![
        write_fixture(&dir, "a_depth.png", DynamicImage::ImageRgba32F(blended.clone())),
        write_fixture(&dir, "b_depth.png", DynamicImage::ImageRgba32F(blended)),
    ];

    let store = EnvironmentStore::new(dir.path().join("environments"));
    let record = save_environments(&store, "Cave", &colors, &depths, 5000).unwrap();

    assert_eq!(record.name(), "Cave 2");
    assert_eq!(record.port(), "5000");
    let listed = list_environment_dirs(&dir.path().join("environments")).unwrap();
    assert_eq!(listed, vec!["Cave".to_string(), "Cave 2".to_string()]);
    assert!(dir.path().join("environments/Cave 2").join(DEPTH_FILE).is_file());
}

#[test]
fn test_depth_count_must_match() {
    let dir = tempfile::tempdir().unwrap();
    let color = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 2, Rgb([0, 0, 0])));
    let colors = vec![
        write_fixture(&dir, "a.png", color.clone()),
        write_fixture(&dir, "b.png", color.clone()),
    ];
    let depths = vec![write_fixture(&dir, "d.png", color)];

    let store = EnvironmentStore::new(dir.path().join("environments"));
    let err = save_environments(&store, "Cave", &colors, &depths, 4443).unwrap_err();

    assert!(matches!(err, BakeError::Asset(_)));
    assert!(list_environment_dirs(&dir.path().join("environments")).unwrap().is_empty());
}
