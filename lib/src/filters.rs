use crate::config::ConversionParams;
use image::{GrayImage, Luma, Rgb, RgbImage, imageops};

/// Edge enhancement kernel, applied with a divisor of 2
///
/// Weights sum to 2 so flat regions keep their value while gradients are
/// pushed apart.
const EDGE_ENHANCE_KERNEL: [[i32; 3]; 3] = [[-1, -1, -1], [-1, 10, -1], [-1, -1, -1]];
const EDGE_ENHANCE_SCALE: f32 = 2.0;

/// Normalized luminance of an RGB pixel
///
/// Formula: L = (0.299*R + 0.587*G + 0.114*B) / 255
///
/// Computed on integer weights so pure white is exactly 1.0.
pub fn luminance(pixel: &Rgb<u8>) -> f64 {
    let [r, g, b] = pixel.0;
    let weighted = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
    weighted as f64 / 255_000.0
}

/// Convert to an 8-bit grayscale plane with the same weights as [`luminance`]
pub fn grayscale(img: &RgbImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut output = GrayImage::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let weighted = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
        output.put_pixel(x, y, Luma([((weighted + 500) / 1000) as u8]));
    }

    output
}

fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Sharpen outlines with a 3x3 edge-enhance kernel, per channel
///
/// Samples outside the image are clamped to the nearest edge pixel.
pub fn edge_enhance(img: &RgbImage) -> RgbImage {
    let (width, height) = img.dimensions();
    let mut output = RgbImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let mut sums = [0i32; 3];

            for (ky, row) in EDGE_ENHANCE_KERNEL.iter().enumerate() {
                for (kx, &weight) in row.iter().enumerate() {
                    let sample_x = (x as i64 + kx as i64 - 1).clamp(0, width as i64 - 1) as u32;
                    let sample_y = (y as i64 + ky as i64 - 1).clamp(0, height as i64 - 1) as u32;
                    let sample = img.get_pixel(sample_x, sample_y);
                    for c in 0..3 {
                        sums[c] += weight * sample[c] as i32;
                    }
                }
            }

            let pixel = Rgb(sums.map(|s| to_channel(s as f32 / EDGE_ENHANCE_SCALE)));
            output.put_pixel(x, y, pixel);
        }
    }

    output
}

/// Scale every channel by `factor` (1.0 = unchanged, 0.0 = black)
pub fn adjust_brightness(img: &RgbImage, factor: f32) -> RgbImage {
    let mut output = img.clone();
    for pixel in output.pixels_mut() {
        pixel.0 = pixel.0.map(|c| to_channel(c as f32 * factor));
    }
    output
}

/// Mean grayscale value, rounded to the nearest level
pub fn mean_gray(img: &RgbImage) -> u8 {
    let gray = grayscale(img);
    let count = gray.len();
    if count == 0 {
        return 0;
    }
    let total: u64 = gray.pixels().map(|p| p[0] as u64).sum();
    ((total as f64 / count as f64) + 0.5) as u8
}

/// Stretch every channel away from (or toward) the mean gray by `factor`
///
/// 1.0 leaves the image unchanged, 0.0 collapses it to flat mean gray.
pub fn adjust_contrast(img: &RgbImage, factor: f32) -> RgbImage {
    let mean = mean_gray(img) as f32;
    let mut output = img.clone();
    for pixel in output.pixels_mut() {
        pixel.0 = pixel.0.map(|c| to_channel(mean + (c as f32 - mean) * factor));
    }
    output
}

/// Apply the tone adjustments in order: edge enhance, brightness, contrast, invert
pub fn adjust_tone(img: &RgbImage, params: &ConversionParams) -> RgbImage {
    let enhanced = edge_enhance(img);
    let brightened = adjust_brightness(&enhanced, params.brightness);
    let mut output = adjust_contrast(&brightened, params.contrast);

    if params.invert {
        imageops::invert(&mut output);
    }

    output
}
