use std::fs;
use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;
use image::{GrayImage, Luma};
use tempfile::TempDir;

use neurosym::io::floatmap::{FloatMap, load};

#[test]
fn fmap_roundtrip() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("attention.fmap");

    let data = vec![0.0f32, 0.25, 0.5, 0.75, 1.0, 0.1, 0.9, 0.33, 0.66, 0.05, 0.5, 0.2];
    let map = FloatMap::new(4, 3, data.clone()).unwrap();
    map.save(&path).unwrap();

    let loaded = load(&path).unwrap();
    assert_eq!(loaded.width(), 4);
    assert_eq!(loaded.height(), 3);
    assert_eq!(loaded.data(), data.as_slice());
    assert_eq!(loaded.max(), 1.0);
    assert_eq!(loaded.min(), 0.0);
}

#[test]
fn gzipped_fmap_reads_identically() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("attention.fmap.gz");

    let data = vec![0.2f32; 16];
    let map = FloatMap::new(4, 4, data).unwrap();

    let mut raw = Vec::new();
    map.write_to(&mut raw).unwrap();
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw).unwrap();
    fs::write(&path, encoder.finish().unwrap()).unwrap();

    let loaded = load(&path).unwrap();
    assert_eq!(loaded, map);
}

#[test]
fn bad_magic_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("broken.fmap");
    fs::write(&path, b"NOTAFMAPxxxxxxxxxxxxxxxxxxxx").unwrap();
    assert!(load(&path).is_err());
}

#[test]
fn truncated_body_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("short.fmap");

    let map = FloatMap::new(4, 4, vec![0.5f32; 16]).unwrap();
    let mut raw = Vec::new();
    map.write_to(&mut raw).unwrap();
    raw.truncate(raw.len() - 8);
    fs::write(&path, raw).unwrap();

    assert!(load(&path).is_err());
}

#[test]
fn raster_input_scales_to_unit_range() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("mask.png");

    let img = GrayImage::from_fn(8, 8, |x, _| Luma([if x < 4 { 0u8 } else { 255u8 }]));
    img.save(&path).unwrap();

    let loaded = load(&path).unwrap();
    assert_eq!(loaded.width(), 8);
    assert_eq!(loaded.get(0, 0), 0.0);
    assert_eq!(loaded.get(7, 0), 1.0);
}

#[test]
fn normalization_uses_observed_range() {
    let map = FloatMap::new(3, 1, vec![0.0, 0.5, 1.0]).unwrap();
    let bytes = map.to_normalized_bytes();
    assert_eq!(bytes.get_pixel(0, 0).0[0], 0);
    assert_eq!(bytes.get_pixel(1, 0).0[0], 128);
    assert_eq!(bytes.get_pixel(2, 0).0[0], 255);

    // Offset ranges stretch to the full byte range too.
    let map = FloatMap::new(2, 1, vec![10.0, 20.0]).unwrap();
    let bytes = map.to_normalized_bytes();
    assert_eq!(bytes.get_pixel(0, 0).0[0], 0);
    assert_eq!(bytes.get_pixel(1, 0).0[0], 255);
}

#[test]
fn flat_map_normalizes_to_zero() {
    let map = FloatMap::new(4, 4, vec![0.7f32; 16]).unwrap();
    let bytes = map.to_normalized_bytes();
    assert!(bytes.pixels().all(|p| p.0[0] == 0));
}

#[test]
fn unit_range_conversion_detects_byte_maps() {
    let bytes = FloatMap::new(2, 1, vec![0.0, 255.0]).unwrap();
    let unit = bytes.to_unit_range();
    assert_eq!(unit.get(0, 0), 0.0);
    assert_eq!(unit.get(1, 0), 1.0);

    let already_unit = FloatMap::new(2, 1, vec![0.25, 0.75]).unwrap();
    let unit = already_unit.to_unit_range();
    assert_eq!(unit.get(0, 0), 0.25);
    assert_eq!(unit.get(1, 0), 0.75);
}

#[test]
fn resized_map_keeps_value_range() {
    let map = FloatMap::new(4, 4, vec![1.0f32; 16]).unwrap();
    let resized = map.resized(8, 8);
    assert_eq!(resized.width(), 8);
    assert_eq!(resized.height(), 8);
    assert!(resized.data().iter().all(|v| (*v - 1.0).abs() < 1e-6));
}
