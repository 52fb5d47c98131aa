use std::path::Path;

use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::schema::v1::{
    AnalysisReportV1, Artifacts, ClassificationV1, FactsV1, TreatmentPlanV1,
};

pub fn build_report(ctx: &Ctx) -> Result<AnalysisReportV1> {
    let facts = ctx.facts.as_ref().context("clinical facts missing")?;
    let explanation = ctx.explanation.as_ref().context("explanation missing")?;
    let treatment = ctx.treatment.as_ref().context("treatment plan missing")?;

    Ok(AnalysisReportV1 {
        tool: "neurosym".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schema_version: "v1".to_string(),
        input_meta: ctx.report.input_meta.clone(),
        classification: ClassificationV1 {
            label: ctx.label,
            confidence: ctx.confidence,
        },
        mask_source: ctx.refined.as_ref().map(|r| r.source),
        facts: FactsV1 {
            volume_cm2: facts.volume_cm2,
            affected_lobes: facts.affected_lobes.clone(),
            irregularity: facts.irregularity,
        },
        genetics: ctx.genetics,
        explanation: explanation.clone(),
        treatment: TreatmentPlanV1 {
            severity_score: treatment.severity_score,
            action: treatment.action.clone(),
            follow_up: treatment.follow_up.clone(),
            protocol: treatment.protocol.clone(),
        },
        artifacts: Artifacts {
            refined_mask: ctx.artifacts.refined_mask.clone(),
            attention_overlay: ctx.artifacts.attention_overlay.clone(),
            mask_overlay: ctx.artifacts.mask_overlay.clone(),
        },
        warnings: ctx.warnings.clone(),
    })
}

pub fn write_json(path: &Path, report: &AnalysisReportV1) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}
