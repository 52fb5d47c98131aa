use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::render;
use crate::schema::v1::TumorClass;

pub struct Stage5Overlay;

impl Stage5Overlay {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5Overlay {
    fn name(&self) -> &'static str {
        "stage5_overlay"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if ctx.label == TumorClass::NoLesion {
            info!("no_lesion_predicted_overlays_skipped");
            return Ok(());
        }

        let image = ctx.source_image.as_ref().context("source image missing")?;
        let attention = ctx.attention.as_ref().context("attention map missing")?;
        let refined = ctx.refined.as_ref().context("refined mask missing")?;

        // Attention overlay failure loses one artifact, not the analysis.
        let overlay = render::attention_overlay(image, attention, ctx.alpha);
        match overlay.save(&ctx.output.attention_overlay_path) {
            Ok(()) => {
                info!(
                    path = %ctx.output.attention_overlay_path.display(),
                    "attention_overlay_written"
                );
                ctx.artifacts.attention_overlay =
                    Some(file_name(&ctx.output.attention_overlay_path));
            }
            Err(err) => {
                warn!(error = %err, "attention overlay write failed");
                ctx.warnings
                    .push(format!("attention overlay write failed: {}", err));
            }
        }

        // Colorized mask overlay failure degrades to the raw mask unblended.
        let overlay = render::mask_overlay(image, &refined.mask, ctx.alpha);
        match overlay.save(&ctx.output.mask_overlay_path) {
            Ok(()) => {
                info!(
                    path = %ctx.output.mask_overlay_path.display(),
                    "mask_overlay_written"
                );
            }
            Err(err) => {
                warn!(error = %err, "colorized mask overlay failed; writing raw mask");
                ctx.warnings
                    .push(format!("mask overlay fell back to the raw mask: {}", err));
                refined
                    .mask
                    .save(&ctx.output.mask_overlay_path)
                    .with_context(|| {
                        format!(
                            "failed to write fallback mask {}",
                            ctx.output.mask_overlay_path.display()
                        )
                    })?;
            }
        }
        ctx.artifacts.mask_overlay = Some(file_name(&ctx.output.mask_overlay_path));

        refined
            .mask
            .save(&ctx.output.refined_mask_path)
            .with_context(|| {
                format!(
                    "failed to write refined mask {}",
                    ctx.output.refined_mask_path.display()
                )
            })?;
        ctx.artifacts.refined_mask = Some(file_name(&ctx.output.refined_mask_path));

        Ok(())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
