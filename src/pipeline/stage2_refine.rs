use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::mask::refine;
use crate::math::geometry;
use crate::pipeline::Stage;
use crate::schema::v1::{MaskSource, TumorClass};

pub struct Stage2Refine;

impl Stage2Refine {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Refine {
    fn name(&self) -> &'static str {
        "stage2_refine"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if ctx.label == TumorClass::NoLesion {
            info!("no_lesion_predicted_refinement_skipped");
            return Ok(());
        }

        let segmentation = ctx.segmentation.as_ref().context("segmentation map missing")?;
        let attention = ctx.attention.as_ref().context("attention map missing")?;

        let refined = refine::refine(segmentation, attention, &ctx.refine_params);
        let source = match refined.source {
            MaskSource::Segmentation => "segmentation",
            MaskSource::AttentionFallback => "attention_fallback",
        };
        info!(
            source,
            foreground_px = geometry::count_foreground(&refined.mask),
            "mask_refined"
        );

        ctx.report.mask_source = Some(refined.source);
        ctx.refined = Some(refined);
        Ok(())
    }
}
