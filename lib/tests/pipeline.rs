use ascii_studio::{
    ConversionParams, Density, FaultKind, SilentObserver, convert_batch, convert_bytes,
    convert_image, convert_path,
};
use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::PathBuf;
use tempfile::TempDir;

fn stripes(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, _| {
        if (x / 4) % 2 == 0 {
            Rgb([240, 240, 240])
        } else {
            Rgb([20, 20, 20])
        }
    })
}

fn write_png(dir: &TempDir, name: &str, img: &RgbImage) -> PathBuf {
    let path = dir.path().join(name);
    img.save_with_format(&path, ImageFormat::Png).unwrap();
    path
}

#[test]
fn convert_path_matches_convert_image() {
    let dir = TempDir::new().unwrap();
    let img = stripes(64, 48);
    let path = write_png(&dir, "stripes.png", &img);
    let params = ConversionParams {
        output_width: 32,
        ..Default::default()
    };

    let from_disk = convert_path(&path, params, &SilentObserver).unwrap();
    let in_memory = convert_image(&img, params, &SilentObserver).unwrap();
    assert_eq!(from_disk, in_memory);
    assert_eq!(from_disk.width(), 32);
    // 32 * 0.75 * 0.55 = 13.2
    assert_eq!(from_disk.height(), 13);
}

#[test]
fn convert_bytes_drops_alpha() {
    let img = RgbaImage::from_pixel(20, 20, Rgba([255, 255, 255, 0]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();

    let params = ConversionParams {
        output_width: 10,
        ..Default::default()
    };
    let art = convert_bytes(&bytes, params, &SilentObserver).unwrap();
    assert!(art.chars().all(|c| c == ' '));
}

#[test]
fn output_text_is_newline_joined_rows() {
    let params = ConversionParams {
        output_width: 12,
        density: Density::Fine,
        ..Default::default()
    };
    let art = convert_image(&stripes(40, 40), params, &SilentObserver).unwrap();
    let text = art.to_string();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), art.height() as usize);
    assert!(lines.iter().all(|l| l.chars().count() == 12));
    assert!(!text.ends_with('\n'));
}

#[test]
fn batch_keeps_input_order_and_isolates_failures() {
    let dir = TempDir::new().unwrap();
    let white = write_png(&dir, "white.png", &RgbImage::from_pixel(10, 10, Rgb([255, 255, 255])));
    let black = write_png(&dir, "black.png", &RgbImage::from_pixel(10, 10, Rgb([0, 0, 0])));
    let missing = dir.path().join("missing.png");

    let params = ConversionParams {
        output_width: 8,
        ..Default::default()
    };
    let results = convert_batch(&[white, missing, black], params, &SilentObserver);

    assert_eq!(results.len(), 3);
    assert!(results[0].as_ref().unwrap().chars().all(|c| c == ' '));
    assert_eq!(results[1].as_ref().unwrap_err().kind(), FaultKind::Input);
    assert!(results[2].as_ref().unwrap().chars().all(|c| c == '@'));
}

#[test]
fn non_image_file_is_input_failure() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.png");
    std::fs::write(&path, "plain text").unwrap();

    let err = convert_path(&path, ConversionParams::default(), &SilentObserver).unwrap_err();
    assert_eq!(err.kind(), FaultKind::Input);
    assert!(err.to_string().starts_with("Error converting image"));
}
