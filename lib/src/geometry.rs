use image::{RgbImage, imageops};

/// Height-to-width correction for monospace glyph cells
///
/// A character cell is roughly twice as tall as it is wide, so rows are
/// squashed to keep the picture's proportions in text.
pub const GLYPH_ASPECT: f64 = 0.55;

/// Largest output grid, in characters, a conversion may produce
///
/// 4096 x 4096; larger requests are rejected before any buffer is allocated.
pub const MAX_OUTPUT_PIXELS: u64 = 4096 * 4096;

/// True when a `width` x `height` grid fits in [`MAX_OUTPUT_PIXELS`]
pub fn within_budget(width: u32, height: u32) -> bool {
    width as u64 * height as u64 <= MAX_OUTPUT_PIXELS
}

/// Compute the output grid size for a source image and a target column count
///
/// `height = round(width * (src_height / src_width) * 0.55)`, never less than 1.
pub fn target_dimensions(src_width: u32, src_height: u32, output_width: u32) -> (u32, u32) {
    let width = output_width.max(1);
    if src_width == 0 {
        return (width, 1);
    }

    let aspect = src_height as f64 / src_width as f64;
    // Saturates at u32::MAX for absurd aspect ratios
    let height = (width as f64 * aspect * GLYPH_ASPECT).round();
    (width, (height as u32).max(1))
}

/// Resample the image to one pixel per output character
///
/// Uses Lanczos3 to keep aliasing out of the per-pixel mapping.
pub fn resize_for_glyphs(input: &RgbImage, output_width: u32) -> RgbImage {
    let (src_width, src_height) = input.dimensions();
    let (width, height) = target_dimensions(src_width, src_height, output_width);
    imageops::resize(input, width, height, imageops::FilterType::Lanczos3)
}
