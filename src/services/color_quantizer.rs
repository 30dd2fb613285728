// src/services/color_quantizer.rs
use crate::errors::FreshScanError;
use crate::models::{DominantColor, Rgb};
use image::{DynamicImage, RgbImage};
use log::debug;
use std::collections::HashMap;
use std::path::Path;

/// Side of the square raster every image is resampled to before counting.
pub const SAMPLE_SIZE: u32 = 100;

/// Pixels darker than this mean brightness are ignored.
pub const MIN_BRIGHTNESS: f64 = 30.0;

/// Pixels brighter than this mean brightness are ignored.
pub const MAX_BRIGHTNESS: f64 = 225.0;

pub const BUCKET_WIDTH: u8 = 10;

pub const MAX_DOMINANT_COLORS: usize = 5;

pub fn load_image(path: &Path) -> Result<DynamicImage, FreshScanError> {
    if !path.is_file() {
        return Err(FreshScanError::ImageRead(format!(
            "Image file not found: {}",
            path.display()
        )));
    }

    // Uploads are stored under generated names, so sniff the format from content.
    image::io::Reader::open(path)
        .map_err(|e| FreshScanError::ImageRead(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| FreshScanError::ImageRead(e.to_string()))?
        .decode()
        .map_err(FreshScanError::from_image)
}

/// Resizes to cover a `SAMPLE_SIZE` square, cropping the overflow around the center.
pub fn sample_raster(img: &DynamicImage) -> RgbImage {
    img.resize_to_fill(SAMPLE_SIZE, SAMPLE_SIZE, image::imageops::FilterType::Lanczos3)
        .to_rgb8()
}

pub fn quantize_dominant_colors(path: &Path) -> Result<Vec<DominantColor>, FreshScanError> {
    let img = load_image(path)?;
    let raster = sample_raster(&img);
    let colors = dominant_colors(&raster);

    debug!(
        "Quantized {} into {} dominant colors",
        path.display(),
        colors.len()
    );

    Ok(colors)
}

/// Ranks quantized buckets of an already sampled raster.
///
/// Percentages are shares of the whole raster, including filtered pixels,
/// so they can sum to less than 100.
pub fn dominant_colors(raster: &RgbImage) -> Vec<DominantColor> {
    let total_pixels = raster.width() as usize * raster.height() as usize;
    if total_pixels == 0 {
        return Vec::new();
    }

    // bucket -> (count, first seen order)
    let mut counts: HashMap<Rgb, (usize, usize)> = HashMap::new();
    for pixel in raster.pixels() {
        let [r, g, b] = pixel.0;
        if !is_informative(r, g, b) {
            continue;
        }

        let order = counts.len();
        let entry = counts.entry(quantize(r, g, b)).or_insert((0, order));
        entry.0 += 1;
    }

    let mut ranked: Vec<(Rgb, usize, usize)> = counts
        .into_iter()
        .map(|(rgb, (count, order))| (rgb, count, order))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(MAX_DOMINANT_COLORS)
        .map(|(rgb, count, _)| DominantColor {
            rgb,
            percentage: count as f64 / total_pixels as f64 * 100.0,
        })
        .collect()
}

fn is_informative(r: u8, g: u8, b: u8) -> bool {
    let brightness = (r as f64 + g as f64 + b as f64) / 3.0;
    (MIN_BRIGHTNESS..=MAX_BRIGHTNESS).contains(&brightness)
}

fn quantize(r: u8, g: u8, b: u8) -> Rgb {
    let floor = |c: u8| c / BUCKET_WIDTH * BUCKET_WIDTH;
    (floor(r), floor(g), floor(b))
}
