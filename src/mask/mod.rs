use image::GrayImage;

use crate::schema::v1::MaskSource;

pub mod components;
pub mod refine;

/// Single-region binary lesion mask after source selection, thresholding,
/// and morphological cleanup. Pixels are 0 or 255; at most one connected
/// foreground region remains and it is filled solid.
#[derive(Debug, Clone)]
pub struct RefinedMask {
    pub mask: GrayImage,
    pub source: MaskSource,
}
