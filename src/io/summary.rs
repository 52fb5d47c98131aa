use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::schema::v1::MaskSource;

pub fn format_summary(ctx: &Ctx) -> Result<String> {
    let version = env!("CARGO_PKG_VERSION");
    let facts = ctx.facts.as_ref().context("clinical facts missing")?;
    let treatment = ctx.treatment.as_ref().context("treatment plan missing")?;

    let mut out = String::new();
    out.push_str(&format!("neurosym v{}\n", version));
    out.push_str(&format!(
        "Diagnosis: {} ({:.1}% confidence)\n",
        facts.class,
        facts.confidence * 100.0
    ));

    if let Some(refined) = &ctx.refined {
        let source = match refined.source {
            MaskSource::Segmentation => "segmentation",
            MaskSource::AttentionFallback => "attention fallback",
        };
        out.push_str(&format!("Mask source: {}\n", source));
    }

    let lobes = if facts.affected_lobes.is_empty() {
        "none".to_string()
    } else {
        facts
            .affected_lobes
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    out.push_str(&format!(
        "Volume: {:.2} cm² | lobes: {} | irregularity: {:.2}\n",
        facts.volume_cm2, lobes, facts.irregularity
    ));
    out.push_str(&format!(
        "Severity: {:.1} | action: {} | follow-up: {}\n",
        treatment.severity_score, treatment.action, treatment.follow_up
    ));

    let artifacts: Vec<&String> = [
        ctx.artifacts.attention_overlay.as_ref(),
        ctx.artifacts.mask_overlay.as_ref(),
        ctx.artifacts.refined_mask.as_ref(),
    ]
    .into_iter()
    .flatten()
    .collect();
    if artifacts.is_empty() {
        out.push_str("Artifacts: none\n");
    } else {
        let names: Vec<&str> = artifacts.iter().map(|s| s.as_str()).collect();
        out.push_str(&format!("Artifacts: {}\n", names.join(", ")));
    }

    Ok(out)
}
