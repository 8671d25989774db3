/// Basic example: convert a synthetic test image to ASCII art
///
/// Draws a lit sphere over a dark background and prints it at each density.
use ascii_studio::{ConversionParams, Density, SilentObserver, convert_image};
use image::{Rgb, RgbImage};

fn main() {
    let width = 240;
    let height = 240;
    let center = width as f32 / 2.0;
    let radius = 90.0;

    let img = RgbImage::from_fn(width, height, |x, y| {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist < radius {
            // Light from the top left
            let shade = 1.0 - ((dx + radius) + (dy + radius)) / (4.0 * radius);
            let v = (60.0 + shade * 195.0) as u8;
            Rgb([v, v, v])
        } else {
            Rgb([20, 20, 30])
        }
    });

    for density in Density::ALL {
        let params = ConversionParams {
            output_width: 60,
            density,
            ..Default::default()
        };

        println!("density = {density}");
        match convert_image(&img, params, &SilentObserver) {
            Ok(art) => println!("{art}\n"),
            Err(e) => eprintln!("{e}"),
        }
    }
}
