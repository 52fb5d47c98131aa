use std::path::PathBuf;

use image::RgbImage;

use crate::facts::ClinicalFacts;
use crate::io::floatmap::FloatMap;
use crate::mask::RefinedMask;
use crate::mask::refine::RefineParams;
use crate::reason::TreatmentPlan;
use crate::render::DEFAULT_OVERLAY_ALPHA;
use crate::schema::v1::{AnalysisReportV1, GeneticMarkers, TumorClass};

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub report_path: PathBuf,
    pub refined_mask_path: PathBuf,
    pub attention_overlay_path: PathBuf,
    pub mask_overlay_path: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct ArtifactPaths {
    pub refined_mask: Option<String>,
    pub attention_overlay: Option<String>,
    pub mask_overlay: Option<String>,
}

/// Per-analysis state threaded through the pipeline stages. Each analysis
/// request builds a fresh Ctx; nothing is shared between invocations.
#[derive(Debug)]
pub struct Ctx {
    pub image_path: PathBuf,
    pub attention_path: PathBuf,
    pub segmentation_path: Option<PathBuf>,
    pub label: TumorClass,
    pub confidence: f64,
    pub genetics: Option<GeneticMarkers>,
    pub alpha: f32,
    pub refine_params: RefineParams,
    pub warnings: Vec<String>,
    pub source_image: Option<RgbImage>,
    pub attention: Option<FloatMap>,
    pub segmentation: Option<FloatMap>,
    pub refined: Option<RefinedMask>,
    pub facts: Option<ClinicalFacts>,
    pub explanation: Option<String>,
    pub treatment: Option<TreatmentPlan>,
    pub artifacts: ArtifactPaths,
    pub output: OutputPaths,
    pub report: AnalysisReportV1,
}

impl Ctx {
    pub fn new(
        image_path: PathBuf,
        attention_path: PathBuf,
        segmentation_path: Option<PathBuf>,
        label: TumorClass,
        confidence: f64,
        genetics: Option<GeneticMarkers>,
        out_dir: PathBuf,
        tool_version: &str,
    ) -> Self {
        let report_path = out_dir.join("report.json");
        let refined_mask_path = out_dir.join("refined_mask.png");
        let attention_overlay_path = out_dir.join("attention_overlay.png");
        let mask_overlay_path = out_dir.join("mask_overlay.png");
        let report = AnalysisReportV1::empty(tool_version, label, confidence);
        Self {
            image_path,
            attention_path,
            segmentation_path,
            label,
            confidence,
            genetics,
            alpha: DEFAULT_OVERLAY_ALPHA,
            refine_params: RefineParams::default(),
            warnings: Vec::new(),
            source_image: None,
            attention: None,
            segmentation: None,
            refined: None,
            facts: None,
            explanation: None,
            treatment: None,
            artifacts: ArtifactPaths::default(),
            output: OutputPaths {
                out_dir,
                report_path,
                refined_mask_path,
                attention_overlay_path,
                mask_overlay_path,
            },
            report,
        }
    }
}
