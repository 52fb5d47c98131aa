use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{close, open};
use tracing::info;

use crate::io::floatmap::FloatMap;
use crate::mask::RefinedMask;
use crate::mask::components;
use crate::schema::v1::MaskSource;

/// Segmentation max activation below this means the network returned an
/// effectively blank map and the attention fallback is used instead.
pub const ACTIVATION_FLOOR: f32 = 0.01;

/// Binarization cutoff on the normalized segmentation map.
pub const SEG_BINARIZE_THRESHOLD: u8 = 100;

/// Stricter cutoff for the attention fallback: attention maps are diffuse
/// and a low threshold would mark most of the image as lesion.
pub const ATTENTION_BINARIZE_THRESHOLD: u8 = 180;

/// Structuring element sizes for close/open cleanup. The attention path uses
/// a larger element to compensate for its coarser spatial resolution.
pub const SEG_KERNEL_SIZE: u8 = 5;
pub const ATTENTION_KERNEL_SIZE: u8 = 7;

#[derive(Debug, Clone, Copy)]
pub struct RefineParams {
    pub activation_floor: f32,
    pub seg_threshold: u8,
    pub attention_threshold: u8,
    pub seg_kernel: u8,
    pub attention_kernel: u8,
}

impl Default for RefineParams {
    fn default() -> Self {
        Self {
            activation_floor: ACTIVATION_FLOOR,
            seg_threshold: SEG_BINARIZE_THRESHOLD,
            attention_threshold: ATTENTION_BINARIZE_THRESHOLD,
            seg_kernel: SEG_KERNEL_SIZE,
            attention_kernel: ATTENTION_KERNEL_SIZE,
        }
    }
}

/// Produce the authoritative lesion mask from the two raw signals.
///
/// The segmentation map wins whenever it shows any activation above the
/// floor; otherwise the classifier's attention map, resampled onto the
/// segmentation grid, is the best available localization signal. Output is
/// deterministic for identical inputs.
pub fn refine(segmentation: &FloatMap, attention: &FloatMap, params: &RefineParams) -> RefinedMask {
    let (source, normalized, thresh, kernel) = if segmentation.max() > params.activation_floor {
        (
            MaskSource::Segmentation,
            segmentation.to_normalized_bytes(),
            params.seg_threshold,
            params.seg_kernel,
        )
    } else {
        info!("segmentation blank; falling back to attention map");
        let resized = attention.resized(segmentation.width(), segmentation.height());
        (
            MaskSource::AttentionFallback,
            resized.to_normalized_bytes(),
            params.attention_threshold,
            params.attention_kernel,
        )
    };

    let binary = binarize_bytes(&normalized, thresh);
    let cleaned = cleanup(&binary, kernel);
    let mask = components::keep_largest_filled(&cleaned);

    RefinedMask { mask, source }
}

/// Closing fills small gaps, opening removes small isolated specks.
fn cleanup(binary: &GrayImage, kernel: u8) -> GrayImage {
    let radius = kernel / 2;
    if radius == 0 {
        return binary.clone();
    }
    let closed = close(binary, Norm::LInf, radius);
    open(&closed, Norm::LInf, radius)
}

/// Binarize a byte image, mapping pixels above the cutoff to 255.
pub fn binarize_bytes(mask: &GrayImage, thresh: u8) -> GrayImage {
    GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
        if mask.get_pixel(x, y).0[0] > thresh {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}
