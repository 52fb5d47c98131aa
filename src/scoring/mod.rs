//! Overlap scoring between a reference mask and a learner-drawn mask.

use image::{GrayImage, imageops};

use crate::math::geometry;
use crate::schema::v1::Feedback;

/// Any intensity above this counts as foreground when comparing masks.
pub const OVERLAP_BINARIZE_THRESHOLD: u8 = 10;

pub const EXCELLENT_ACCURACY_PCT: f64 = 60.0;
pub const GOOD_ACCURACY_PCT: f64 = 30.0;
pub const PARTIAL_ACCURACY_PCT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreResult {
    pub iou: f64,
    pub accuracy_pct: f64,
    pub feedback: Feedback,
}

/// Intersection-over-Union of two masks. A candidate on a different grid is
/// resampled onto the reference grid with nearest-neighbor so no boundary
/// pixels are invented. An empty union scores 0.0 rather than NaN.
pub fn compare(reference: &GrayImage, candidate: &GrayImage) -> ScoreResult {
    let resized;
    let candidate = if candidate.dimensions() != reference.dimensions() {
        resized = imageops::resize(
            candidate,
            reference.width(),
            reference.height(),
            imageops::FilterType::Nearest,
        );
        &resized
    } else {
        candidate
    };

    let mut intersection: u64 = 0;
    let mut union: u64 = 0;
    for (a, b) in reference.pixels().zip(candidate.pixels()) {
        let a = a.0[0] > OVERLAP_BINARIZE_THRESHOLD;
        let b = b.0[0] > OVERLAP_BINARIZE_THRESHOLD;
        if a && b {
            intersection += 1;
        }
        if a || b {
            union += 1;
        }
    }

    let iou = if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    };
    let accuracy_pct = geometry::round1(iou * 100.0);

    ScoreResult {
        iou,
        accuracy_pct,
        feedback: feedback_for(accuracy_pct),
    }
}

/// Strict threshold ladder: boundary values fall into the lower bucket.
pub fn feedback_for(accuracy_pct: f64) -> Feedback {
    if accuracy_pct > EXCELLENT_ACCURACY_PCT {
        Feedback::Excellent
    } else if accuracy_pct > GOOD_ACCURACY_PCT {
        Feedback::Good
    } else if accuracy_pct > PARTIAL_ACCURACY_PCT {
        Feedback::Partial
    } else {
        Feedback::Missed
    }
}
