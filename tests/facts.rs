use image::{GrayImage, Luma};
use neurosym::facts::ClinicalFacts;
use neurosym::io::floatmap::FloatMap;
use neurosym::schema::v1::{Lobe, TumorClass};

fn mask_with_rect(w: u32, h: u32, x0: u32, y0: u32, rw: u32, rh: u32) -> GrayImage {
    GrayImage::from_fn(w, h, |x, y| {
        if x >= x0 && x < x0 + rw && y >= y0 && y < y0 + rh {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

#[test]
fn volume_is_linear_in_pixel_count() {
    let single = mask_with_rect(64, 64, 20, 20, 10, 10);
    let double = mask_with_rect(64, 64, 20, 20, 10, 20);

    let a = ClinicalFacts::derive(TumorClass::Glioma, 0.9, &single);
    let b = ClinicalFacts::derive(TumorClass::Glioma, 0.9, &double);

    assert_eq!(a.volume_cm2, 0.2);
    assert_eq!(b.volume_cm2, 0.4);
}

#[test]
fn volume_rounds_to_two_decimals() {
    let mask = mask_with_rect(64, 64, 5, 5, 3, 1);
    let facts = ClinicalFacts::derive(TumorClass::Meningioma, 0.8, &mask);
    // 3 pixels / 500 = 0.006
    assert_eq!(facts.volume_cm2, 0.01);
}

#[test]
fn centroid_row_selects_the_lobe() {
    let top = mask_with_rect(30, 90, 10, 5, 10, 10);
    let middle = mask_with_rect(30, 90, 10, 40, 10, 10);
    let bottom = mask_with_rect(30, 90, 10, 75, 10, 10);

    let a = ClinicalFacts::derive(TumorClass::Glioma, 0.9, &top);
    let b = ClinicalFacts::derive(TumorClass::Glioma, 0.9, &middle);
    let c = ClinicalFacts::derive(TumorClass::Glioma, 0.9, &bottom);

    assert_eq!(a.affected_lobes, vec![Lobe::Frontal]);
    assert_eq!(b.affected_lobes, vec![Lobe::Parietal]);
    assert_eq!(c.affected_lobes, vec![Lobe::Temporal]);
}

#[test]
fn empty_mask_degrades_to_zero_facts() {
    let empty = GrayImage::new(64, 64);
    let facts = ClinicalFacts::derive(TumorClass::Pituitary, 0.55, &empty);

    assert_eq!(facts.class, TumorClass::Pituitary);
    assert_eq!(facts.confidence, 0.55);
    assert_eq!(facts.volume_cm2, 0.0);
    assert!(facts.affected_lobes.is_empty());
    assert_eq!(facts.irregularity, 0.0);
}

#[test]
fn square_irregularity_is_known_value() {
    let mask = mask_with_rect(64, 64, 20, 20, 10, 10);
    let facts = ClinicalFacts::derive(TumorClass::Glioma, 0.9, &mask);
    // Contour through pixel centers: area 81, perimeter 36,
    // 1 - 4*pi*81/36^2 = 0.2146 -> 0.21.
    assert_eq!(facts.irregularity, 0.21);
}

#[test]
fn unit_range_float_mask_binarizes_at_half() {
    let mut data = vec![0.4f32; 64];
    for v in data.iter_mut().take(10) {
        *v = 0.6;
    }
    let map = FloatMap::new(8, 8, data).unwrap();

    let facts = ClinicalFacts::derive_from_floats(TumorClass::Glioma, 0.9, &map);
    assert_eq!(facts.volume_cm2, 0.02);
}

#[test]
fn byte_range_float_mask_binarizes_at_byte_cutoff() {
    let mut data = vec![100.0f32; 64];
    for v in data.iter_mut().take(6) {
        *v = 200.0;
    }
    let map = FloatMap::new(8, 8, data).unwrap();

    let facts = ClinicalFacts::derive_from_floats(TumorClass::Glioma, 0.9, &map);
    // 6 pixels / 500 = 0.012
    assert_eq!(facts.volume_cm2, 0.01);
}

#[test]
fn gray_input_below_byte_cutoff_is_background() {
    let faint = GrayImage::from_fn(16, 16, |_, _| Luma([100u8]));
    let facts = ClinicalFacts::derive(TumorClass::Glioma, 0.9, &faint);
    assert_eq!(facts.volume_cm2, 0.0);
    assert!(facts.affected_lobes.is_empty());
}
