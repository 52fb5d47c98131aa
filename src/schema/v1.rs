use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TumorClass {
    Glioma,
    Meningioma,
    Pituitary,
    NoLesion,
}

impl fmt::Display for TumorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TumorClass::Glioma => "Glioma",
            TumorClass::Meningioma => "Meningioma",
            TumorClass::Pituitary => "Pituitary",
            TumorClass::NoLesion => "No lesion",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lobe {
    Frontal,
    Parietal,
    Temporal,
}

impl fmt::Display for Lobe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Lobe::Frontal => "frontal",
            Lobe::Parietal => "parietal",
            Lobe::Temporal => "temporal",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdhStatus {
    Mutant,
    Wildtype,
    Unknown,
}

impl fmt::Display for IdhStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IdhStatus::Mutant => "Mutant",
            IdhStatus::Wildtype => "Wildtype",
            IdhStatus::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MgmtStatus {
    Methylated,
    Unmethylated,
    Unknown,
}

impl fmt::Display for MgmtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MgmtStatus::Methylated => "Methylated",
            MgmtStatus::Unmethylated => "Unmethylated",
            MgmtStatus::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneticMarkers {
    pub idh_status: IdhStatus,
    pub mgmt_status: MgmtStatus,
}

/// Which raw signal the refiner selected as the mask source. Carried in the
/// report so a reviewer can tell a direct segmentation from a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskSource {
    Segmentation,
    AttentionFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Excellent,
    Good,
    Partial,
    Missed,
}

impl Feedback {
    pub fn message(&self) -> &'static str {
        match self {
            Feedback::Excellent => "Excellent! Your diagnosis aligns closely with the AI.",
            Feedback::Good => "Good effort. You found the general area, but check the boundaries.",
            Feedback::Partial => "You found the lesion, but the coverage is partial.",
            Feedback::Missed => "Missed the location. Compare with the AI result.",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputMeta {
    pub image: Option<String>,
    pub image_width: Option<u32>,
    pub image_height: Option<u32>,
    pub mask_width: Option<u32>,
    pub mask_height: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationV1 {
    pub label: TumorClass,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactsV1 {
    pub volume_cm2: f64,
    pub affected_lobes: Vec<Lobe>,
    pub irregularity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreatmentPlanV1 {
    pub severity_score: f64,
    pub action: String,
    pub follow_up: String,
    pub protocol: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifacts {
    pub refined_mask: Option<String>,
    pub attention_overlay: Option<String>,
    pub mask_overlay: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReportV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub input_meta: InputMeta,
    pub classification: ClassificationV1,
    pub mask_source: Option<MaskSource>,
    pub facts: FactsV1,
    pub genetics: Option<GeneticMarkers>,
    pub explanation: String,
    pub treatment: TreatmentPlanV1,
    pub artifacts: Artifacts,
    pub warnings: Vec<String>,
}

impl AnalysisReportV1 {
    pub fn empty(tool_version: &str, label: TumorClass, confidence: f64) -> Self {
        Self {
            tool: "neurosym".to_string(),
            version: tool_version.to_string(),
            schema_version: "v1".to_string(),
            input_meta: InputMeta {
                image: None,
                image_width: None,
                image_height: None,
                mask_width: None,
                mask_height: None,
            },
            classification: ClassificationV1 { label, confidence },
            mask_source: None,
            facts: FactsV1 {
                volume_cm2: 0.0,
                affected_lobes: Vec::new(),
                irregularity: 0.0,
            },
            genetics: None,
            explanation: String::new(),
            treatment: TreatmentPlanV1 {
                severity_score: 0.0,
                action: "None".to_string(),
                follow_up: "Routine checkup".to_string(),
                protocol: Vec::new(),
            },
            artifacts: Artifacts {
                refined_mask: None,
                attention_overlay: None,
                mask_overlay: None,
            },
            warnings: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReportV1 {
    pub iou: f64,
    pub accuracy_pct: f64,
    pub feedback: Feedback,
    pub feedback_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactsReportV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub classification: ClassificationV1,
    pub facts: FactsV1,
    pub genetics: Option<GeneticMarkers>,
    pub explanation: String,
    pub treatment: TreatmentPlanV1,
}
