use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::facts::ClinicalFacts;
use crate::pipeline::Stage;

pub struct Stage3Facts;

impl Stage3Facts {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Facts {
    fn name(&self) -> &'static str {
        "stage3_facts"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        // An empty or absent mask is a valid negative finding, not an error:
        // it degrades to explicit zero-valued facts.
        let facts = match &ctx.refined {
            Some(refined) => ClinicalFacts::derive(ctx.label, ctx.confidence, &refined.mask),
            None => ClinicalFacts::negative(ctx.label, ctx.confidence),
        };

        info!(
            volume_cm2 = facts.volume_cm2,
            irregularity = facts.irregularity,
            lobes = facts.affected_lobes.len() as u64,
            "facts_extracted"
        );
        ctx.facts = Some(facts);
        Ok(())
    }
}
