use crate::ascii::{AsciiArt, map_image};
use crate::config::ConversionParams;
use crate::detail::{estimate_or_neutral, panic_message};
use crate::error::ConversionError;
use crate::filters::adjust_tone;
use crate::geometry::{MAX_OUTPUT_PIXELS, resize_for_glyphs, target_dimensions, within_budget};
use crate::observer::{Observer, Stage};
use image::RgbImage;
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

/// Runs `f`, turning a panic into [`ConversionError::Internal`]
fn guarded<T>(f: impl FnOnce() -> Result<T, ConversionError>) -> Result<T, ConversionError> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| Err(ConversionError::Internal(panic_message(payload.as_ref()))))
}

/// Core pipeline on an already decoded image
///
/// 1. Resize to one pixel per character with glyph aspect correction
/// 2. Edge enhance, brightness, contrast, optional inversion
/// 3. Estimate local detail on the adjusted image
/// 4. Map every pixel to a character
/// 5. Assemble the rows
fn run_pipeline(
    input: &RgbImage,
    params: &ConversionParams,
    observer: &dyn Observer,
) -> AsciiArt {
    let (src_width, src_height) = input.dimensions();
    let resized = resize_for_glyphs(input, params.output_width);
    let (width, height) = resized.dimensions();
    observer.on_stage(
        Stage::Resize,
        &format!("{src_width}x{src_height} -> {width}x{height}"),
    );

    let adjusted = adjust_tone(&resized, params);
    observer.on_stage(
        Stage::Adjust,
        &format!(
            "brightness={} contrast={} invert={}",
            params.brightness, params.contrast, params.invert
        ),
    );

    let detail = estimate_or_neutral(&adjusted, observer);
    observer.on_stage(Stage::EstimateDetail, &format!("{width}x{height} map"));

    let palette = params.density.palette();
    let rows = map_image(
        &adjusted,
        Some(&detail),
        params.detail_preservation,
        params.blend_scale,
        palette,
        observer,
    );
    observer.on_stage(Stage::MapPixels, &format!("{} rows", rows.len()));

    let art = AsciiArt::new(rows, width, palette);
    observer.on_stage(Stage::Assemble, &format!("density={}", params.density));
    observer.on_finished(art.height(), art.width());
    art
}

fn validate(params: &ConversionParams, observer: &dyn Observer) -> Result<(), ConversionError> {
    params.validate()?;
    observer.on_stage(Stage::Validate, &format!("{params:?}"));
    Ok(())
}

fn convert_validated(
    input: &RgbImage,
    params: &ConversionParams,
    observer: &dyn Observer,
) -> Result<AsciiArt, ConversionError> {
    if input.width() == 0 || input.height() == 0 {
        return Err(ConversionError::Internal(format!(
            "image has no pixels ({}x{})",
            input.width(),
            input.height()
        )));
    }

    let (width, height) = target_dimensions(input.width(), input.height(), params.output_width);
    if !within_budget(width, height) {
        return Err(ConversionError::TooLarge {
            width,
            height,
            limit: MAX_OUTPUT_PIXELS,
        });
    }

    Ok(run_pipeline(input, params, observer))
}

/// Converts a decoded image to ASCII art
///
/// Parameters are validated first. Faults inside detail estimation or pixel
/// mapping are absorbed and reported to `observer`; anything else, panics
/// included, comes back as an `Err`.
pub fn convert_image(
    input: &RgbImage,
    params: ConversionParams,
    observer: &dyn Observer,
) -> Result<AsciiArt, ConversionError> {
    guarded(|| {
        validate(&params, observer)?;
        convert_validated(input, &params, observer)
    })
}

/// Opens, decodes and converts the image at `path`
pub fn convert_path(
    path: &Path,
    params: ConversionParams,
    observer: &dyn Observer,
) -> Result<AsciiArt, ConversionError> {
    guarded(|| {
        validate(&params, observer)?;
        let image = image::open(path).map_err(|source| ConversionError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        observer.on_stage(Stage::Load, &path.display().to_string());
        convert_validated(&image.to_rgb8(), &params, observer)
    })
}

/// Decodes an in-memory image (format guessed from its header) and converts it
pub fn convert_bytes(
    bytes: &[u8],
    params: ConversionParams,
    observer: &dyn Observer,
) -> Result<AsciiArt, ConversionError> {
    guarded(|| {
        validate(&params, observer)?;
        let image = image::load_from_memory(bytes).map_err(ConversionError::Decode)?;
        observer.on_stage(Stage::Load, &format!("{} bytes", bytes.len()));
        convert_validated(&image.to_rgb8(), &params, observer)
    })
}

/// Converts several images concurrently, one independent pipeline each
///
/// Results come back in input order.
pub fn convert_batch(
    paths: &[PathBuf],
    params: ConversionParams,
    observer: &dyn Observer,
) -> Vec<Result<AsciiArt, ConversionError>> {
    paths
        .par_iter()
        .map(|path| convert_path(path, params, observer))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FaultKind;
    use crate::observer::testing::RecordingObserver;
    use crate::observer::{Degradation, SilentObserver};
    use crate::palette::Density;
    use image::Rgb;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let v = ((x * 255) / width.max(1)) as u8;
            Rgb([v, (y * 7 % 256) as u8, 255 - v])
        })
    }

    #[test]
    fn test_mid_gray_scenario() {
        let img = RgbImage::from_pixel(100, 100, Rgb([128, 128, 128]));
        let params = ConversionParams {
            output_width: 50,
            ..Default::default()
        };
        let art = convert_image(&img, params, &SilentObserver).unwrap();

        assert_eq!(art.width(), 50);
        assert_eq!(art.height(), 28);
        for row in art.rows() {
            assert_eq!(row, &"+".repeat(50));
        }
    }

    #[test]
    fn test_dimensions_follow_aspect_rule() {
        for (w, h, out) in [(100, 100, 50), (64, 200, 17), (300, 40, 80), (5, 5, 1)] {
            let img = gradient(w, h);
            let params = ConversionParams {
                output_width: out,
                ..Default::default()
            };
            let art = convert_image(&img, params, &SilentObserver).unwrap();
            let (ew, eh) = target_dimensions(w, h, out);
            assert_eq!((art.width(), art.height()), (ew, eh));
            assert!(art.rows().iter().all(|r| r.chars().count() == ew as usize));
        }
    }

    #[test]
    fn test_characters_come_from_palette() {
        let img = gradient(120, 90);
        for density in Density::ALL {
            for detail_preservation in [0.0, 0.3, 1.0] {
                let params = ConversionParams {
                    output_width: 40,
                    density,
                    detail_preservation,
                    ..Default::default()
                };
                let art = convert_image(&img, params, &SilentObserver).unwrap();
                let palette = density.palette();
                assert!(art.chars().all(|c| palette.contains(c)));
            }
        }
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let img = gradient(80, 60);
        let params = ConversionParams {
            output_width: 30,
            contrast: 1.4,
            ..Default::default()
        };
        let first = convert_image(&img, params, &SilentObserver).unwrap();
        let second = convert_image(&img, params, &SilentObserver).unwrap();
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn test_uniform_image_ignores_detail_weight() {
        let img = RgbImage::from_pixel(40, 40, Rgb([60, 60, 60]));
        for detail_preservation in [0.0, 0.5, 1.0] {
            let params = ConversionParams {
                output_width: 20,
                detail_preservation,
                ..Default::default()
            };
            let art = convert_image(&img, params, &SilentObserver).unwrap();
            // 60/255 * 9 = 2.1 -> index 2
            assert!(art.chars().all(|c| c == '%'));
        }
    }

    #[test]
    fn test_invert_white_gives_darkest_char() {
        let img = RgbImage::from_pixel(30, 30, Rgb([255, 255, 255]));
        let params = ConversionParams {
            output_width: 10,
            invert: true,
            ..Default::default()
        };
        let art = convert_image(&img, params, &SilentObserver).unwrap();
        assert!(art.chars().all(|c| c == '@'));
    }

    #[test]
    fn test_invert_black_gives_lightest_char() {
        let img = RgbImage::from_pixel(30, 30, Rgb([0, 0, 0]));
        let params = ConversionParams {
            output_width: 10,
            invert: true,
            ..Default::default()
        };
        let art = convert_image(&img, params, &SilentObserver).unwrap();
        assert!(art.chars().all(|c| c == ' '));
    }

    #[test]
    fn test_invalid_params_fail_fast() {
        let img = gradient(10, 10);
        let params = ConversionParams {
            detail_preservation: 3.0,
            ..Default::default()
        };
        let observer = RecordingObserver::default();
        let err = convert_image(&img, params, &observer).unwrap_err();
        assert_eq!(err.kind(), FaultKind::Config);
        assert!(observer.stages.lock().unwrap().is_empty());
    }

    #[test]
    fn test_empty_image_is_internal_failure() {
        let img = RgbImage::new(0, 0);
        let err = convert_image(&img, ConversionParams::default(), &SilentObserver).unwrap_err();
        assert_eq!(err.kind(), FaultKind::Internal);
    }

    #[test]
    fn test_oversized_output_is_rejected_before_resizing() {
        // 4000 rows tall at a width that fits validation still exceeds the budget
        let img = RgbImage::from_pixel(1, 4000, Rgb([128, 128, 128]));
        let params = ConversionParams {
            output_width: 4000,
            ..Default::default()
        };
        let observer = RecordingObserver::default();
        let err = convert_image(&img, params, &observer).unwrap_err();

        assert_eq!(err.kind(), FaultKind::Config);
        assert!(matches!(err, ConversionError::TooLarge { width: 4000, .. }));
        assert_eq!(*observer.stages.lock().unwrap(), vec![Stage::Validate]);
    }

    #[test]
    fn test_huge_width_is_rejected_by_validation() {
        let img = RgbImage::from_pixel(1, 4000, Rgb([128, 128, 128]));
        let params = ConversionParams {
            output_width: 20_000_000,
            ..Default::default()
        };
        let err = convert_image(&img, params, &SilentObserver).unwrap_err();
        assert_eq!(err.kind(), FaultKind::Config);
    }

    #[test]
    fn test_missing_path_is_input_failure() {
        let err = convert_path(
            Path::new("/definitely/not/here.png"),
            ConversionParams::default(),
            &SilentObserver,
        )
        .unwrap_err();
        assert_eq!(err.kind(), FaultKind::Input);
        assert!(err.to_string().contains("here.png"));
    }

    #[test]
    fn test_garbage_bytes_are_input_failure() {
        let err = convert_bytes(b"not an image", ConversionParams::default(), &SilentObserver)
            .unwrap_err();
        assert_eq!(err.kind(), FaultKind::Input);
    }

    #[test]
    fn test_guarded_turns_panic_into_internal() {
        let result: Result<(), ConversionError> = guarded(|| panic!("stage exploded"));
        let err = result.unwrap_err();
        assert_eq!(err.kind(), FaultKind::Internal);
        assert!(err.to_string().contains("stage exploded"));
    }

    #[test]
    fn test_observer_sees_stages_in_order() {
        let observer = RecordingObserver::default();
        let art = convert_image(&gradient(40, 40), ConversionParams::default(), &observer).unwrap();

        assert_eq!(
            *observer.stages.lock().unwrap(),
            vec![
                Stage::Validate,
                Stage::Resize,
                Stage::Adjust,
                Stage::EstimateDetail,
                Stage::MapPixels,
                Stage::Assemble,
            ]
        );
        assert_eq!(
            *observer.finished.lock().unwrap(),
            Some((art.height(), art.width()))
        );
        assert!(
            !observer
                .degradations
                .lock()
                .unwrap()
                .iter()
                .any(|(d, _)| *d == Degradation::DetailEstimation)
        );
    }
}
