//! Command-line arguments and their merge into conversion parameters.

use ascii_studio::{BlendScale, ConfigError, ConversionParams, Density};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Density tier as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DensityArg {
    Fine,
    Medium,
    Coarse,
}

impl From<DensityArg> for Density {
    fn from(d: DensityArg) -> Self {
        match d {
            DensityArg::Fine => Density::Fine,
            DensityArg::Medium => Density::Medium,
            DensityArg::Coarse => Density::Coarse,
        }
    }
}

/// Blend scale as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BlendScaleArg {
    Raw,
    Palette,
}

impl From<BlendScaleArg> for BlendScale {
    fn from(s: BlendScaleArg) -> Self {
        match s {
            BlendScaleArg::Raw => BlendScale::Raw,
            BlendScaleArg::Palette => BlendScale::Palette,
        }
    }
}

/// Convert images to ASCII art.
#[derive(Debug, Parser)]
#[command(name = "ascii-studio", version, about)]
pub struct Cli {
    /// Images to convert (PNG, JPEG, BMP, ...)
    #[arg(required = true, value_name = "IMAGE")]
    pub images: Vec<PathBuf>,

    /// Output file, or a directory when several images are given (default: stdout)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output width in characters [default: 100]
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: Option<u32>,

    /// Character density [default: medium]
    #[arg(short, long, value_enum)]
    pub density: Option<DensityArg>,

    /// Brightness multiplier [default: 1.0]
    #[arg(long)]
    pub brightness: Option<f32>,

    /// Contrast multiplier [default: 1.0]
    #[arg(long)]
    pub contrast: Option<f32>,

    /// Invert the image before mapping
    #[arg(long, overrides_with = "no_invert")]
    pub invert: bool,

    /// Do not invert, even if the config file asks for it
    #[arg(long, overrides_with = "invert")]
    pub no_invert: bool,

    /// Detail preservation weight between 0.0 and 1.0 [default: 0.7]
    #[arg(long, value_name = "WEIGHT")]
    pub detail: Option<f32>,

    /// Scale of local detail in the blend: raw intensity or stretched to the ramp [default: raw]
    #[arg(long, value_enum, value_name = "SCALE")]
    pub blend_scale: Option<BlendScaleArg>,

    /// Reserved color flag
    #[arg(long)]
    pub color: bool,

    /// TOML file with conversion parameters; flags override its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Build validated parameters from the config file (if any) and flags.
    pub fn params(&self) -> Result<ConversionParams, ConfigError> {
        let mut params = match &self.config {
            Some(path) => ConversionParams::load(path)?,
            None => ConversionParams::default(),
        };

        if let Some(width) = self.width {
            params.output_width = width;
        }
        if let Some(density) = self.density {
            params.density = density.into();
        }
        if let Some(brightness) = self.brightness {
            params.brightness = brightness;
        }
        if let Some(contrast) = self.contrast {
            params.contrast = contrast;
        }
        if let Some(detail) = self.detail {
            params.detail_preservation = detail;
        }
        if let Some(scale) = self.blend_scale {
            params.blend_scale = scale.into();
        }
        if self.invert {
            params.invert = true;
        } else if self.no_invert {
            params.invert = false;
        }
        params.color |= self.color;

        params.validate()?;
        Ok(params)
    }
}
