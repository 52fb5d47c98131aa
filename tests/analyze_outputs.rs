use std::fs;
use std::path::Path;

use assert_cmd::Command;
use image::{GrayImage, Luma};
use serde_json::Value;
use tempfile::TempDir;

use neurosym::io::floatmap::FloatMap;

fn write_inputs(dir: &Path) {
    let img = GrayImage::from_fn(32, 32, |x, y| Luma([(x * 4 + y * 2) as u8]));
    img.save(dir.join("brain.png")).unwrap();

    let mut attention = vec![0.0f32; 32 * 32];
    for y in 8..16u32 {
        for x in 8..16u32 {
            attention[(y * 32 + x) as usize] = 1.0;
        }
    }
    FloatMap::new(32, 32, attention)
        .unwrap()
        .save(&dir.join("attention.fmap"))
        .unwrap();

    let mut segmentation = vec![0.0f32; 64 * 64];
    for y in 20..32u32 {
        for x in 20..32u32 {
            segmentation[(y * 64 + x) as usize] = 1.0;
        }
    }
    FloatMap::new(64, 64, segmentation)
        .unwrap()
        .save(&dir.join("segmentation.fmap"))
        .unwrap();
}

fn run_analyze(input: &Path, out: &Path, extra: &[&str]) {
    let mut cmd = Command::cargo_bin("neurosym").unwrap();
    cmd.args([
        "analyze",
        "--image",
        input.join("brain.png").to_str().unwrap(),
        "--attention",
        input.join("attention.fmap").to_str().unwrap(),
        "--segmentation",
        input.join("segmentation.fmap").to_str().unwrap(),
        "--label",
        "glioma",
        "--confidence",
        "0.93",
        "--out",
        out.to_str().unwrap(),
    ]);
    cmd.args(extra);
    cmd.assert().success();
}

#[test]
fn analyze_report_schema_fields_exist() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_inputs(input.path());
    run_analyze(input.path(), out.path(), &[]);

    let report = out.path().join("report.json");
    let v: Value = serde_json::from_slice(&fs::read(report).unwrap()).unwrap();
    assert_eq!(v["tool"], "neurosym");
    assert_eq!(v["schema_version"], "v1");
    assert_eq!(v["classification"]["label"], "glioma");
    assert_eq!(v["mask_source"], "segmentation");
    assert!(v["facts"]["volume_cm2"].as_f64().unwrap() > 0.0);
    assert_eq!(v["facts"]["affected_lobes"].as_array().unwrap().len(), 1);
    assert!(v["treatment"]["action"].is_string());
    assert!(
        v["explanation"]
            .as_str()
            .unwrap()
            .starts_with("Diagnosis: Glioma.")
    );
    assert_eq!(v["artifacts"]["refined_mask"], "refined_mask.png");
    assert_eq!(v["artifacts"]["attention_overlay"], "attention_overlay.png");
    assert_eq!(v["artifacts"]["mask_overlay"], "mask_overlay.png");

    assert!(out.path().join("refined_mask.png").exists());
    assert!(out.path().join("attention_overlay.png").exists());
    assert!(out.path().join("mask_overlay.png").exists());
}

#[test]
fn analyze_outputs_are_deterministic() {
    let input = TempDir::new().unwrap();
    write_inputs(input.path());
    let out1 = TempDir::new().unwrap();
    let out2 = TempDir::new().unwrap();

    run_analyze(input.path(), out1.path(), &[]);
    run_analyze(input.path(), out2.path(), &[]);

    for name in ["report.json", "refined_mask.png", "mask_overlay.png"] {
        let a = fs::read(out1.path().join(name)).unwrap();
        let b = fs::read(out2.path().join(name)).unwrap();
        assert_eq!(a, b, "mismatch in {}", name);
    }
}

#[test]
fn genetics_flags_flow_into_the_plan() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_inputs(input.path());
    run_analyze(input.path(), out.path(), &["--idh", "wildtype"]);

    let report = out.path().join("report.json");
    let v: Value = serde_json::from_slice(&fs::read(report).unwrap()).unwrap();
    assert_eq!(v["genetics"]["idh_status"], "Wildtype");
    assert_eq!(v["treatment"]["action"], "Aggressive Resection + Radiation");

    // 12x12 blob -> 144 px -> 0.29 cm²; min(75 + 15 + 0.29 * 0.5, 99).
    let severity = v["treatment"]["severity_score"].as_f64().unwrap();
    assert!((severity - 90.145).abs() < 1e-9, "severity {}", severity);
    assert!(
        v["explanation"]
            .as_str()
            .unwrap()
            .contains("IDH Wildtype suggests an aggressive course")
    );
}

#[test]
fn no_lesion_run_skips_artifacts() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_inputs(input.path());

    let mut cmd = Command::cargo_bin("neurosym").unwrap();
    cmd.args([
        "analyze",
        "--image",
        input.path().join("brain.png").to_str().unwrap(),
        "--attention",
        input.path().join("attention.fmap").to_str().unwrap(),
        "--label",
        "no-lesion",
        "--confidence",
        "0.97",
        "--out",
        out.path().to_str().unwrap(),
    ]);
    cmd.assert().success();

    let report = out.path().join("report.json");
    let v: Value = serde_json::from_slice(&fs::read(report).unwrap()).unwrap();
    assert_eq!(v["classification"]["label"], "no_lesion");
    assert!(v["mask_source"].is_null());
    assert_eq!(v["facts"]["volume_cm2"], 0.0);
    assert_eq!(v["facts"]["affected_lobes"].as_array().unwrap().len(), 0);
    assert_eq!(v["treatment"]["action"], "None");
    assert_eq!(v["treatment"]["severity_score"], 0.0);
    assert!(v["artifacts"]["refined_mask"].is_null());

    assert!(!out.path().join("refined_mask.png").exists());
    assert!(!out.path().join("attention_overlay.png").exists());
    assert!(!out.path().join("mask_overlay.png").exists());
}

#[test]
fn missing_segmentation_for_tumor_label_fails() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_inputs(input.path());

    let mut cmd = Command::cargo_bin("neurosym").unwrap();
    cmd.args([
        "analyze",
        "--image",
        input.path().join("brain.png").to_str().unwrap(),
        "--attention",
        input.path().join("attention.fmap").to_str().unwrap(),
        "--label",
        "glioma",
        "--confidence",
        "0.93",
        "--out",
        out.path().to_str().unwrap(),
    ]);
    cmd.assert().failure();
}

#[test]
fn undecodable_source_image_aborts() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_inputs(input.path());
    fs::write(input.path().join("brain.png"), b"not an image").unwrap();

    let mut cmd = Command::cargo_bin("neurosym").unwrap();
    cmd.args([
        "analyze",
        "--image",
        input.path().join("brain.png").to_str().unwrap(),
        "--attention",
        input.path().join("attention.fmap").to_str().unwrap(),
        "--segmentation",
        input.path().join("segmentation.fmap").to_str().unwrap(),
        "--label",
        "glioma",
        "--confidence",
        "0.93",
        "--out",
        out.path().to_str().unwrap(),
    ]);
    cmd.assert().failure();
    assert!(!out.path().join("report.json").exists());
}

#[test]
fn score_cli_reports_perfect_match() {
    let tmp = TempDir::new().unwrap();
    let mask = GrayImage::from_fn(32, 32, |x, y| {
        if (8..16).contains(&x) && (8..16).contains(&y) {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    });
    mask.save(tmp.path().join("reference.png")).unwrap();
    mask.save(tmp.path().join("drawing.png")).unwrap();

    let mut cmd = Command::cargo_bin("neurosym").unwrap();
    cmd.args([
        "score",
        "--reference",
        tmp.path().join("reference.png").to_str().unwrap(),
        "--candidate",
        tmp.path().join("drawing.png").to_str().unwrap(),
        "--json",
    ]);
    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let v: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["iou"], 1.0);
    assert_eq!(v["accuracy_pct"], 100.0);
    assert_eq!(v["feedback"], "excellent");
}

#[test]
fn facts_cli_rederives_from_edited_mask() {
    let tmp = TempDir::new().unwrap();
    let mask = GrayImage::from_fn(64, 64, |x, y| {
        if (20..30).contains(&x) && (20..30).contains(&y) {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    });
    mask.save(tmp.path().join("edited.png")).unwrap();

    let mut cmd = Command::cargo_bin("neurosym").unwrap();
    cmd.args([
        "facts",
        "--mask",
        tmp.path().join("edited.png").to_str().unwrap(),
        "--label",
        "meningioma",
        "--confidence",
        "0.88",
        "--json",
    ]);
    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let v: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["classification"]["label"], "meningioma");
    assert_eq!(v["facts"]["volume_cm2"], 0.2);
    assert_eq!(v["treatment"]["action"], "Active Surveillance");
}
