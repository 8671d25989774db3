//! Injected observability for conversions
//!
//! The pipeline never touches process-wide logging state directly. Callers
//! hand an [`Observer`] to each conversion; [`LogObserver`] forwards to the
//! `log` facade and [`SilentObserver`] drops everything.

use std::fmt;

/// Pipeline stages in execution order
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    Validate,
    Load,
    Resize,
    Adjust,
    EstimateDetail,
    MapPixels,
    Assemble,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validate => "validate",
            Stage::Load => "load",
            Stage::Resize => "resize",
            Stage::Adjust => "adjust",
            Stage::EstimateDetail => "estimate-detail",
            Stage::MapPixels => "map-pixels",
            Stage::Assemble => "assemble",
        };
        f.write_str(name)
    }
}

/// Faults the pipeline absorbs instead of failing the conversion
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Degradation {
    /// Intensity map replaced by the neutral map
    DetailEstimation,
    /// Pixels rendered with the palette's middle glyph
    PixelMapping,
}

/// Receives progress and degradation reports from a conversion
///
/// Must be shareable across threads so one observer can serve a batch.
pub trait Observer: Send + Sync {
    fn on_stage(&self, _stage: Stage, _detail: &str) {}

    fn on_degraded(&self, _fault: Degradation, _detail: &str) {}

    fn on_finished(&self, _rows: u32, _columns: u32) {}
}

/// Forwards reports to the `log` facade under the `ascii_studio` target
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn on_stage(&self, stage: Stage, detail: &str) {
        log::debug!(target: "ascii_studio", "[{stage}] {detail}");
    }

    fn on_degraded(&self, fault: Degradation, detail: &str) {
        log::warn!(target: "ascii_studio", "{fault:?} degraded: {detail}");
    }

    fn on_finished(&self, rows: u32, columns: u32) {
        log::info!(target: "ascii_studio", "conversion finished: {columns}x{rows}");
    }
}

/// Discards every report
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl Observer for SilentObserver {}
