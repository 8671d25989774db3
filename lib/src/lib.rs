//! ASCII Studio - image to ASCII text converter
//!
//! Resizes an image to one pixel per character, adjusts its tone, measures
//! local detail, and picks a glyph per pixel by blending luminance with that
//! detail so edges and texture survive the conversion.
//!
//! # Example
//! ```no_run
//! use ascii_studio::{ConversionParams, Density, LogObserver, convert_path};
//! use std::path::Path;
//!
//! let params = ConversionParams {
//!     output_width: 80,
//!     density: Density::Fine,
//!     ..Default::default()
//! };
//! match convert_path(Path::new("photo.jpg"), params, &LogObserver) {
//!     Ok(art) => println!("{art}"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

pub mod ascii;
pub mod config;
pub mod detail;
pub mod error;
pub mod filters;
pub mod geometry;
pub mod observer;
pub mod palette;
pub mod processor;

// Re-export main types for convenience
pub use ascii::{AsciiArt, BlendScale};
pub use config::{ConfigError, ConversionParams};
pub use error::{ConversionError, FaultKind};
pub use observer::{Degradation, LogObserver, Observer, SilentObserver, Stage};
pub use palette::{Density, Palette};
pub use processor::{convert_batch, convert_bytes, convert_image, convert_path};
