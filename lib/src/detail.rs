//! Local detail estimation
//!
//! Flat luminance thresholding erases fine texture such as hair or fabric.
//! The intensity map measures how much each pixel's neighbourhood varies so
//! the character mapper can bias busy regions toward a locally informed glyph.

use crate::filters::grayscale;
use crate::observer::{Degradation, Observer};
use image::{GrayImage, RgbImage};
use imageproc::filter::gaussian_blur_f32;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// Noise suppression applied to the grayscale plane before measuring variation
pub const BLUR_SIGMA: f32 = 1.0;

/// Value of every cell in the fallback map
pub const NEUTRAL_INTENSITY: f32 = 0.5;

/// Failure while building an intensity map
#[derive(Debug, Error)]
pub enum DetailError {
    #[error("non-finite local variation at ({x}, {y})")]
    NonFinite { x: u32, y: u32 },
    #[error("intensity map holds {actual} values, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("detail estimation panicked: {0}")]
    Panicked(String),
}

/// Per-pixel local variation, normalized to [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityMap {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl IntensityMap {
    /// Map with every cell set to `value`
    pub fn uniform(width: u32, height: u32, value: f32) -> Self {
        Self {
            width,
            height,
            values: vec![value; width as usize * height as usize],
        }
    }

    /// Fallback map used when estimation fails
    pub fn neutral(width: u32, height: u32) -> Self {
        Self::uniform(width, height, NEUTRAL_INTENSITY)
    }

    pub fn from_values(width: u32, height: u32, values: Vec<f32>) -> Result<Self, DetailError> {
        let expected = width as usize * height as usize;
        if values.len() != expected {
            return Err(DetailError::SizeMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Value at a pixel, `None` outside the map
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.values.get((y * self.width + x) as usize).copied()
    }

    fn range(&self) -> (f32, f32) {
        self.values
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// True when every cell holds the same value, i.e. the map carries no detail
    pub fn is_flat(&self) -> bool {
        let (lo, hi) = self.range();
        hi <= lo
    }

    /// Min-max stretch to [0, 1]; a flat map is left untouched
    fn normalize(&mut self) {
        let (lo, hi) = self.range();
        if hi > lo {
            let span = hi - lo;
            for v in &mut self.values {
                *v = (*v - lo) / span;
            }
        }
    }
}

/// Population standard deviation of every 3x3 window
///
/// Uses summed-area tables of the values and their squares so each window
/// costs four lookups. The one-pixel border stays at zero.
pub fn local_std_dev(plane: &GrayImage) -> Vec<f32> {
    let (width, height) = plane.dimensions();
    let (w, h) = (width as usize, height as usize);
    let mut output = vec![0.0f32; w * h];

    if w < 3 || h < 3 {
        return output;
    }

    // Tables are (w + 1) x (h + 1) with a zero first row and column
    let stride = w + 1;
    let mut sum = vec![0.0f64; stride * (h + 1)];
    let mut sum_sq = vec![0.0f64; stride * (h + 1)];

    for y in 0..h {
        let mut row_sum = 0.0;
        let mut row_sum_sq = 0.0;
        for x in 0..w {
            let v = plane.get_pixel(x as u32, y as u32)[0] as f64;
            row_sum += v;
            row_sum_sq += v * v;
            let idx = (y + 1) * stride + (x + 1);
            sum[idx] = sum[idx - stride] + row_sum;
            sum_sq[idx] = sum_sq[idx - stride] + row_sum_sq;
        }
    }

    let window = |table: &[f64], x: usize, y: usize| -> f64 {
        // Window covers columns x-1..=x+1 and rows y-1..=y+1
        let (x0, x1, y0, y1) = (x - 1, x + 2, y - 1, y + 2);
        table[y1 * stride + x1] - table[y0 * stride + x1] - table[y1 * stride + x0]
            + table[y0 * stride + x0]
    };

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let mean = window(&sum, x, y) / 9.0;
            let mean_sq = window(&sum_sq, x, y) / 9.0;
            let variance = (mean_sq - mean * mean).max(0.0);
            output[y * w + x] = variance.sqrt() as f32;
        }
    }

    output
}

/// Build the normalized intensity map of an adjusted image
pub fn estimate_local_detail(img: &RgbImage) -> Result<IntensityMap, DetailError> {
    let (width, height) = img.dimensions();
    let gray = grayscale(img);
    let blurred = gaussian_blur_f32(&gray, BLUR_SIGMA);
    let raw = local_std_dev(&blurred);

    if let Some(idx) = raw.iter().position(|v| !v.is_finite()) {
        return Err(DetailError::NonFinite {
            x: idx as u32 % width,
            y: idx as u32 / width,
        });
    }

    let mut map = IntensityMap::from_values(width, height, raw)?;
    map.normalize();
    Ok(map)
}

/// Build the intensity map, substituting the neutral map on any failure
///
/// A failed estimation never aborts the conversion; it is reported to the
/// observer as [`Degradation::DetailEstimation`].
pub fn estimate_or_neutral(img: &RgbImage, observer: &dyn Observer) -> IntensityMap {
    estimate_with(img, estimate_local_detail, observer)
}

/// Run `estimate` on `img`, falling back to the neutral map on `Err` or panic
pub fn estimate_with<F>(img: &RgbImage, estimate: F, observer: &dyn Observer) -> IntensityMap
where
    F: FnOnce(&RgbImage) -> Result<IntensityMap, DetailError>,
{
    let (width, height) = img.dimensions();
    let result = panic::catch_unwind(AssertUnwindSafe(|| estimate(img)))
        .unwrap_or_else(|payload| Err(DetailError::Panicked(panic_message(payload.as_ref()))));

    match result {
        Ok(map) => map,
        Err(e) => {
            observer.on_degraded(Degradation::DetailEstimation, &e.to_string());
            IntensityMap::neutral(width, height)
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
