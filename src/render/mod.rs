//! Overlay rendering for human review: heat-colored attention and
//! solid-red lesion masks blended over the source image.
//!
//! The overlay is always resampled onto the source image grid, never the
//! reverse.

use image::{GrayImage, Rgb, RgbImage, imageops};

use crate::facts::BYTE_MASK_THRESHOLD;
use crate::io::floatmap::FloatMap;

pub const DEFAULT_OVERLAY_ALPHA: f32 = 0.5;

/// Classic jet ramp: blue through green to red.
fn jet(v: f32) -> Rgb<u8> {
    let v = v.clamp(0.0, 1.0);
    let r = (1.5 - (4.0 * v - 3.0).abs()).clamp(0.0, 1.0);
    let g = (1.5 - (4.0 * v - 2.0).abs()).clamp(0.0, 1.0);
    let b = (1.5 - (4.0 * v - 1.0).abs()).clamp(0.0, 1.0);
    Rgb([
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    ])
}

/// Blend the jet-colored heatmap over the image at the given alpha.
pub fn attention_overlay(image: &RgbImage, heatmap: &FloatMap, alpha: f32) -> RgbImage {
    let (width, height) = image.dimensions();
    let unit = heatmap.to_unit_range();
    let resized = unit.resized(width, height);

    RgbImage::from_fn(width, height, |x, y| {
        let base = image.get_pixel(x, y);
        let heat = jet(resized.get(x, y));
        Rgb([
            blend(base.0[0], heat.0[0], alpha),
            blend(base.0[1], heat.0[1], alpha),
            blend(base.0[2], heat.0[2], alpha),
        ])
    })
}

/// Add a pure-red layer over the unattenuated image wherever the mask is
/// set, saturating at white.
pub fn mask_overlay(image: &RgbImage, mask: &GrayImage, alpha: f32) -> RgbImage {
    let (width, height) = image.dimensions();
    let resized = if mask.dimensions() != (width, height) {
        imageops::resize(mask, width, height, imageops::FilterType::Nearest)
    } else {
        mask.clone()
    };

    RgbImage::from_fn(width, height, |x, y| {
        let base = *image.get_pixel(x, y);
        if resized.get_pixel(x, y).0[0] > BYTE_MASK_THRESHOLD {
            let red = (f32::from(base.0[0]) + alpha * 255.0).min(255.0).round() as u8;
            Rgb([red, base.0[1], base.0[2]])
        } else {
            base
        }
    })
}

fn blend(base: u8, over: u8, alpha: f32) -> u8 {
    (f32::from(base) * (1.0 - alpha) + f32::from(over) * alpha)
        .round()
        .clamp(0.0, 255.0) as u8
}
