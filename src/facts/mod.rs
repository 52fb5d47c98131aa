//! Bridge from raster masks to symbolic clinical facts.

use image::GrayImage;
use imageproc::contours::{BorderType, Contour, find_contours};

use crate::io::floatmap::FloatMap;
use crate::mask::refine::binarize_bytes;
use crate::math::geometry;
use crate::schema::v1::{Lobe, TumorClass};

/// Calibration constant: foreground pixels per cm² at the pipeline's
/// canonical mask resolution. Not derived from any image metadata.
pub const PIXELS_PER_CM2: f64 = 500.0;

/// Binarization cutoffs for the re-check on extractor input: byte masks and
/// unit-range float masks are both accepted.
pub const BYTE_MASK_THRESHOLD: u8 = 127;
pub const FLOAT_MASK_THRESHOLD: f32 = 0.5;

/// Immutable value snapshot of everything the reasoner needs. Editing the
/// mask replaces the whole value via re-derivation, never a field patch.
#[derive(Debug, Clone, PartialEq)]
pub struct ClinicalFacts {
    pub class: TumorClass,
    pub confidence: f64,
    pub volume_cm2: f64,
    pub affected_lobes: Vec<Lobe>,
    /// `1 - circularity` of the dominant contour. Intentionally unclamped:
    /// degenerate or self-intersecting contours can push it above 1 or
    /// below 0.
    pub irregularity: f64,
}

impl ClinicalFacts {
    /// Zero-valued facts for a negative finding or an empty mask.
    pub fn negative(class: TumorClass, confidence: f64) -> Self {
        Self {
            class,
            confidence,
            volume_cm2: 0.0,
            affected_lobes: Vec::new(),
            irregularity: 0.0,
        }
    }

    /// Derive facts from a byte mask (refiner output or an edited mask).
    pub fn derive(class: TumorClass, confidence: f64, mask: &GrayImage) -> Self {
        let binary = binarize_bytes(mask, BYTE_MASK_THRESHOLD);
        Self::from_binary(class, confidence, &binary)
    }

    /// Derive facts from an externally supplied float mask. Byte-range maps
    /// binarize at the byte cutoff, unit-range maps at the float cutoff.
    pub fn derive_from_floats(class: TumorClass, confidence: f64, map: &FloatMap) -> Self {
        let cutoff = if map.max() > 1.0 {
            f32::from(BYTE_MASK_THRESHOLD)
        } else {
            FLOAT_MASK_THRESHOLD
        };
        let binary = GrayImage::from_fn(map.width(), map.height(), |x, y| {
            if map.get(x, y) > cutoff {
                image::Luma([255u8])
            } else {
                image::Luma([0u8])
            }
        });
        Self::from_binary(class, confidence, &binary)
    }

    fn from_binary(class: TumorClass, confidence: f64, binary: &GrayImage) -> Self {
        let pixels = geometry::count_foreground(binary);
        let volume_cm2 = geometry::round2(pixels as f64 / PIXELS_PER_CM2);
        let affected_lobes = assign_lobe(binary).into_iter().collect();
        let irregularity = shape_irregularity(binary);

        Self {
            class,
            confidence,
            volume_cm2,
            affected_lobes,
            irregularity,
        }
    }
}

/// Exactly one lobe per non-empty mask, from the centroid row against the
/// vertical thirds of the mask.
fn assign_lobe(binary: &GrayImage) -> Option<Lobe> {
    let row = geometry::centroid_row(binary)?;
    let height = f64::from(binary.height());
    let row = f64::from(row);
    if row < height / 3.0 {
        Some(Lobe::Frontal)
    } else if row > height * 2.0 / 3.0 {
        Some(Lobe::Temporal)
    } else {
        Some(Lobe::Parietal)
    }
}

/// `1 - circularity` of the largest outer contour; 0.0 when there is no
/// contour or its perimeter degenerates to zero.
fn shape_irregularity(binary: &GrayImage) -> f64 {
    let contours: Vec<Contour<i32>> = find_contours(binary);
    let largest = contours
        .iter()
        .filter(|c| c.border_type == BorderType::Outer)
        .map(|c| (geometry::polygon_area(&c.points), c))
        .max_by(|a, b| a.0.total_cmp(&b.0));

    let Some((area, contour)) = largest else {
        return 0.0;
    };
    let perimeter = geometry::polygon_perimeter(&contour.points);
    if perimeter == 0.0 {
        return 0.0;
    }
    geometry::round2(1.0 - geometry::circularity(area, perimeter))
}
