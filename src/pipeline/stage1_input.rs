use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::error::AnalysisError;
use crate::io::{floatmap, raster};
use crate::pipeline::Stage;
use crate::schema::v1::TumorClass;

pub struct Stage1Input;

impl Stage1Input {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Input {
    fn name(&self) -> &'static str {
        "stage1_input"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        // Without a decodable source image no clinical output can be derived.
        let image = raster::load_rgb(&ctx.image_path)
            .with_context(|| format!("source image {}", ctx.image_path.display()))?;
        info!(
            width = image.width(),
            height = image.height(),
            "source_image_loaded"
        );

        let attention = floatmap::load(&ctx.attention_path)
            .with_context(|| format!("attention map {}", ctx.attention_path.display()))?;
        info!(
            width = attention.width(),
            height = attention.height(),
            "attention_map_loaded"
        );

        if ctx.label != TumorClass::NoLesion {
            let seg_path = ctx.segmentation_path.as_ref().ok_or_else(|| {
                AnalysisError::Configuration(format!(
                    "label {} requires a segmentation map",
                    ctx.label
                ))
            })?;
            let segmentation = floatmap::load(seg_path)
                .with_context(|| format!("segmentation map {}", seg_path.display()))?;
            info!(
                width = segmentation.width(),
                height = segmentation.height(),
                max = f64::from(segmentation.max()),
                "segmentation_map_loaded"
            );
            ctx.report.input_meta.mask_width = Some(segmentation.width());
            ctx.report.input_meta.mask_height = Some(segmentation.height());
            ctx.segmentation = Some(segmentation);
        } else if ctx.segmentation_path.is_some() {
            warn!("segmentation map ignored for a no-lesion classification");
            ctx.warnings
                .push("segmentation map ignored for a no-lesion classification".to_string());
        }

        ctx.report.input_meta.image = Some(ctx.image_path.display().to_string());
        ctx.report.input_meta.image_width = Some(image.width());
        ctx.report.input_meta.image_height = Some(image.height());

        ctx.source_image = Some(image);
        ctx.attention = Some(attention);
        Ok(())
    }
}
