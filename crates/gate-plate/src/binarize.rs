use image::{GrayImage, Luma, RgbaImage};
use tracing::debug;

use crate::{PlateError, PlateResult};

pub const MIDPOINT_THRESHOLD: u8 = 128;

const BLACK: Luma<u8> = Luma([0]);
const WHITE: Luma<u8> = Luma([255]);

/// How the black/white cut-off is chosen for an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Threshold {
    /// Pixels brighter than the level become white.
    Fixed(u8),
    /// Level picked per image from its luminance histogram (Otsu).
    Otsu,
}

impl Default for Threshold {
    fn default() -> Self {
        Self::Fixed(MIDPOINT_THRESHOLD)
    }
}

/// Weighted luminance of an RGB triple, rounded to the nearest level.
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let value = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
    value.round().clamp(0.0, 255.0) as u8
}

pub fn decode_and_binarize(bytes: &[u8], threshold: Threshold) -> PlateResult<GrayImage> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| PlateError::Decode(e.to_string()))?;
    Ok(binarize(&decoded.to_rgba8(), threshold))
}

/// Converts every pixel to pure black or pure white. Alpha is ignored.
pub fn binarize(source: &RgbaImage, threshold: Threshold) -> GrayImage {
    let (width, height) = source.dimensions();
    let mut gray = GrayImage::new(width, height);
    for (x, y, pixel) in source.enumerate_pixels() {
        let [r, g, b, _] = pixel.0;
        gray.put_pixel(x, y, Luma([luminance(r, g, b)]));
    }

    let level = match threshold {
        Threshold::Fixed(level) => level,
        Threshold::Otsu => otsu_level(&gray),
    };
    debug!(width, height, level, "binarizing image");

    for pixel in gray.pixels_mut() {
        *pixel = if pixel.0[0] > level { WHITE } else { BLACK };
    }
    gray
}

fn otsu_level(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[usize::from(pixel.0[0])] += 1;
    }

    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return MIDPOINT_THRESHOLD;
    }
    let weighted_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum();

    let mut background_weight = 0u64;
    let mut background_sum = 0.0;
    let mut best_variance = 0.0;
    let mut best_level = MIDPOINT_THRESHOLD;

    for (level, &count) in histogram.iter().enumerate() {
        background_weight += count;
        if background_weight == 0 {
            continue;
        }
        let foreground_weight = total - background_weight;
        if foreground_weight == 0 {
            break;
        }
        background_sum += level as f64 * count as f64;
        let background_mean = background_sum / background_weight as f64;
        let foreground_mean = (weighted_total - background_sum) / foreground_weight as f64;
        let variance = background_weight as f64
            * foreground_weight as f64
            * (background_mean - foreground_mean).powi(2);
        if variance > best_variance {
            best_variance = variance;
            best_level = level as u8;
        }
    }

    best_level
}
