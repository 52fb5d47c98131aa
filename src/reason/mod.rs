//! Deterministic clinical reasoning over extracted facts.
//!
//! Both entry points are pure functions: identical facts and markers always
//! produce byte-identical output.

use crate::facts::ClinicalFacts;
use crate::schema::v1::{GeneticMarkers, IdhStatus, MgmtStatus, TumorClass};

pub const GLIOMA_BASE_SEVERITY: f64 = 75.0;
pub const IDH_WILDTYPE_SEVERITY_STEP: f64 = 15.0;
pub const SEVERITY_VOLUME_WEIGHT: f64 = 0.5;
pub const SEVERITY_CEILING: f64 = 99.0;

/// Volume cutoffs that flip the meningioma and pituitary branches.
pub const MENINGIOMA_SURGERY_VOLUME_CM2: f64 = 3.0;
pub const PITUITARY_CONSULT_VOLUME_CM2: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TreatmentPlan {
    pub severity_score: f64,
    pub action: String,
    pub follow_up: String,
    pub protocol: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct ClassProfile {
    pub origin: &'static str,
    pub etiology: &'static str,
    pub behavior: &'static str,
}

pub fn profile(class: TumorClass) -> ClassProfile {
    match class {
        TumorClass::Glioma => ClassProfile {
            origin: "Originates from glial cells.",
            etiology: "Linked to IDH mutations. Infiltrative behavior.",
            behavior: "Can be low-grade or high-grade (Glioblastoma).",
        },
        TumorClass::Meningioma => ClassProfile {
            origin: "Arises from the meninges.",
            etiology: "Linked to NF2 gene. Often benign.",
            behavior: "Compresses brain tissue.",
        },
        TumorClass::Pituitary => ClassProfile {
            origin: "Arises from pituitary gland.",
            etiology: "Hormonal imbalances.",
            behavior: "Visual field defects.",
        },
        TumorClass::NoLesion => ClassProfile {
            origin: "Normal tissue.",
            etiology: "N/A",
            behavior: "N/A",
        },
    }
}

/// Compose the diagnosis explanation: label and confidence always, volume
/// and behavior for positive findings, and a multi-modal section when
/// genetic markers are supplied.
pub fn explain(facts: &ClinicalFacts, genetics: Option<&GeneticMarkers>) -> String {
    let mut text = format!(
        "Diagnosis: {}. Confidence: {:.1}%. ",
        facts.class,
        facts.confidence * 100.0
    );

    if facts.class != TumorClass::NoLesion {
        text.push_str(&format!("Tumor volume is {} cm². ", facts.volume_cm2));
        text.push_str(profile(facts.class).behavior);
        text.push(' ');
    }

    if let Some(markers) = genetics {
        text.push_str("\n[Multi-modal Analysis]: ");
        if facts.class == TumorClass::Glioma {
            match markers.idh_status {
                IdhStatus::Mutant => text.push_str(
                    "Presence of IDH Mutation suggests a better prognosis and responsiveness to therapy (Low Grade Glioma). ",
                ),
                IdhStatus::Wildtype => {
                    text.push_str("IDH Wildtype suggests an aggressive course (Glioblastoma-like). ")
                }
                IdhStatus::Unknown => {}
            }
            match markers.mgmt_status {
                MgmtStatus::Methylated => text.push_str(
                    "MGMT Methylation indicates better response to Temozolomide chemotherapy.",
                ),
                MgmtStatus::Unmethylated => {
                    text.push_str("Unmethylated MGMT implies resistance to standard chemotherapy.")
                }
                MgmtStatus::Unknown => {}
            }
        } else {
            text.push_str(&format!(
                "Genetic markers ({}, {}) noted for clinical correlation.",
                markers.idh_status, markers.mgmt_status
            ));
        }
    }

    text
}

/// Map facts to a treatment recommendation via a fixed decision table.
pub fn treatment_plan(facts: &ClinicalFacts, genetics: Option<&GeneticMarkers>) -> TreatmentPlan {
    match facts.class {
        TumorClass::Glioma => glioma_plan(facts, genetics),
        TumorClass::Meningioma => {
            if facts.volume_cm2 < MENINGIOMA_SURGERY_VOLUME_CM2 {
                TreatmentPlan {
                    severity_score: 40.0,
                    action: "Active Surveillance".to_string(),
                    follow_up: "MRI in 6-12 months".to_string(),
                    protocol: vec!["Monitor growth".to_string()],
                }
            } else {
                TreatmentPlan {
                    severity_score: 65.0,
                    action: "Surgery".to_string(),
                    follow_up: "Post-op MRI in 3 months".to_string(),
                    protocol: vec!["Monitor growth".to_string()],
                }
            }
        }
        TumorClass::Pituitary => {
            if facts.volume_cm2 < PITUITARY_CONSULT_VOLUME_CM2 {
                TreatmentPlan {
                    severity_score: 30.0,
                    action: "Endocrine Eval".to_string(),
                    follow_up: "MRI + Labs in 6-12 months".to_string(),
                    protocol: vec!["Hormone testing".to_string()],
                }
            } else {
                TreatmentPlan {
                    severity_score: 60.0,
                    action: "Ophthalmology + Endocrine Consult".to_string(),
                    follow_up: "MRI in 3 months, Visual fields".to_string(),
                    protocol: vec!["Hormone testing".to_string()],
                }
            }
        }
        TumorClass::NoLesion => TreatmentPlan {
            severity_score: 0.0,
            action: "None".to_string(),
            follow_up: "Routine checkup".to_string(),
            protocol: Vec::new(),
        },
    }
}

fn glioma_plan(facts: &ClinicalFacts, genetics: Option<&GeneticMarkers>) -> TreatmentPlan {
    let wildtype = matches!(genetics, Some(m) if m.idh_status == IdhStatus::Wildtype);

    let (base, action, follow_up) = if wildtype {
        (
            GLIOMA_BASE_SEVERITY + IDH_WILDTYPE_SEVERITY_STEP,
            "Aggressive Resection + Radiation",
            "MRI every 2-3 months",
        )
    } else {
        (GLIOMA_BASE_SEVERITY, "Surgical Resection", "MRI every 3-6 months")
    };

    TreatmentPlan {
        severity_score: (base + facts.volume_cm2 * SEVERITY_VOLUME_WEIGHT).min(SEVERITY_CEILING),
        action: action.to_string(),
        follow_up: follow_up.to_string(),
        protocol: vec![
            "Maximal safe resection".to_string(),
            "Adjuvant Radiotherapy".to_string(),
        ],
    }
}
