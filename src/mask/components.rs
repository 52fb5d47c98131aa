use std::collections::HashSet;

use image::{GrayImage, Luma};
use imageproc::region_labelling::{Connectivity, connected_components};

/// Keep only the largest connected foreground region, filled solid. An
/// empty input stays empty. Equal-area regions tie-break on the lowest
/// label, which is the first one encountered in scan order.
pub fn keep_largest_filled(mask: &GrayImage) -> GrayImage {
    let labels = connected_components(mask, Connectivity::Eight, Luma([0u8]));

    let max_label = labels.pixels().map(|p| p.0[0]).max().unwrap_or(0);
    if max_label == 0 {
        return GrayImage::new(mask.width(), mask.height());
    }

    let mut areas = vec![0u64; max_label as usize + 1];
    for p in labels.pixels() {
        areas[p.0[0] as usize] += 1;
    }

    let mut best = 1u32;
    for label in 2..=max_label {
        if areas[label as usize] > areas[best as usize] {
            best = label;
        }
    }

    let kept = GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
        if labels.get_pixel(x, y).0[0] == best {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    });

    fill_holes(&kept)
}

/// Fill background regions that do not reach the image border. With a single
/// foreground region left, every enclosed background pocket is one of its
/// holes.
pub fn fill_holes(mask: &GrayImage) -> GrayImage {
    let (width, height) = mask.dimensions();
    let inverted = GrayImage::from_fn(width, height, |x, y| {
        if mask.get_pixel(x, y).0[0] > 0 {
            Luma([0u8])
        } else {
            Luma([255u8])
        }
    });
    let labels = connected_components(&inverted, Connectivity::Four, Luma([0u8]));

    let mut border: HashSet<u32> = HashSet::new();
    for x in 0..width {
        border.insert(labels.get_pixel(x, 0).0[0]);
        border.insert(labels.get_pixel(x, height - 1).0[0]);
    }
    for y in 0..height {
        border.insert(labels.get_pixel(0, y).0[0]);
        border.insert(labels.get_pixel(width - 1, y).0[0]);
    }

    GrayImage::from_fn(width, height, |x, y| {
        let label = labels.get_pixel(x, y).0[0];
        if label == 0 || border.contains(&label) {
            Luma([mask.get_pixel(x, y).0[0]])
        } else {
            Luma([255u8])
        }
    })
}

/// Number of 8-connected foreground regions.
pub fn count_components(mask: &GrayImage) -> usize {
    let labels = connected_components(mask, Connectivity::Eight, Luma([0u8]));
    labels.pixels().map(|p| p.0[0]).max().unwrap_or(0) as usize
}
