use crate::detail::IntensityMap;
use crate::filters::luminance;
use crate::observer::{Degradation, Observer};
use crate::palette::Palette;
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// How the local intensity enters the blend
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendScale {
    /// Intensity in [0, 1] is blended as-is against the palette index
    #[default]
    Raw,
    /// Intensity is first stretched to the palette range `[0, len - 1]`
    Palette,
}

/// Per-pixel mapping failure, absorbed by [`map_image`]
#[derive(Debug, Error, PartialEq)]
pub enum MappingFault {
    #[error("non-finite local intensity {0}")]
    NonFiniteIntensity(f32),
    #[error("non-finite detail weight {0}")]
    NonFiniteWeight(f32),
}

/// Palette index from luminance alone
///
/// `floor(L * (len - 1))`, clamped into the palette.
pub fn luminance_index(pixel: &Rgb<u8>, palette: Palette) -> usize {
    let max_index = palette.max_index();
    let index = (luminance(pixel) * max_index as f64).floor() as usize;
    index.min(max_index)
}

/// Blend the luminance index with the local intensity
///
/// [`BlendScale::Raw`]: `round(base * (1 - weight) + intensity * weight)`.
/// [`BlendScale::Palette`]: `round(base * (1 - weight) + intensity * (len - 1) * weight)`.
/// Either way the result is clamped into the palette; weight 0 keeps `base`
/// and weight 1 uses the local intensity alone.
pub fn blend_index(
    base: usize,
    intensity: f32,
    weight: f32,
    scale: BlendScale,
    palette: Palette,
) -> Result<usize, MappingFault> {
    if !intensity.is_finite() {
        return Err(MappingFault::NonFiniteIntensity(intensity));
    }
    if !weight.is_finite() {
        return Err(MappingFault::NonFiniteWeight(weight));
    }

    let max_index = palette.max_index() as f64;
    let base = (base as f64).min(max_index);
    let weight = weight.clamp(0.0, 1.0) as f64;
    let local = match scale {
        BlendScale::Raw => intensity.clamp(0.0, 1.0) as f64,
        BlendScale::Palette => intensity.clamp(0.0, 1.0) as f64 * max_index,
    };

    let blended = base * (1.0 - weight) + local * weight;
    Ok(blended.round().clamp(0.0, max_index) as usize)
}

/// Select the character for one pixel
///
/// `intensity` is the co-located intensity map value, `None` when the map
/// carries no detail.
pub fn map_pixel(
    pixel: &Rgb<u8>,
    intensity: Option<f32>,
    weight: f32,
    scale: BlendScale,
    palette: Palette,
) -> Result<char, MappingFault> {
    let base = luminance_index(pixel, palette);
    let index = match intensity {
        Some(v) => blend_index(base, v, weight, scale, palette)?,
        None => base,
    };
    Ok(palette.get(index))
}

/// Map every pixel of the adjusted image to a character, row by row
///
/// A flat intensity map is ignored. A pixel whose mapping fails gets the
/// palette's middle character; the failures are reported once per image.
pub fn map_image(
    img: &RgbImage,
    detail: Option<&IntensityMap>,
    weight: f32,
    scale: BlendScale,
    palette: Palette,
    observer: &dyn Observer,
) -> Vec<String> {
    let (width, height) = img.dimensions();
    let detail = detail.filter(|map| !map.is_flat());

    let mut faults = 0usize;
    let mut first_fault = None;
    let mut rows = Vec::with_capacity(height as usize);

    for y in 0..height {
        let mut row = String::with_capacity(width as usize);
        for x in 0..width {
            let intensity = detail.and_then(|map| map.get(x, y));
            let ch = match map_pixel(img.get_pixel(x, y), intensity, weight, scale, palette) {
                Ok(ch) => ch,
                Err(fault) => {
                    faults += 1;
                    first_fault.get_or_insert((x, y, fault));
                    palette.middle()
                }
            };
            row.push(ch);
        }
        rows.push(row);
    }

    if let Some((x, y, fault)) = first_fault {
        observer.on_degraded(
            Degradation::PixelMapping,
            &format!("{faults} pixel(s) substituted, first at ({x}, {y}): {fault}"),
        );
    }

    rows
}

/// The text grid produced by a conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiArt {
    rows: Vec<String>,
    width: u32,
    palette: Palette,
}

impl AsciiArt {
    pub(crate) fn new(rows: Vec<String>, width: u32, palette: Palette) -> Self {
        Self {
            rows,
            width,
            palette,
        }
    }

    /// Column count
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Row count
    pub fn height(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// The palette every character was drawn from
    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Every character, row-major
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.rows.iter().flat_map(|row| row.chars())
    }

    pub fn into_rows(self) -> Vec<String> {
        self.rows
    }
}

impl fmt::Display for AsciiArt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(row)?;
        }
        Ok(())
    }
}
