use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::reason;

pub struct Stage4Reason;

impl Stage4Reason {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Reason {
    fn name(&self) -> &'static str {
        "stage4_reason"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let facts = ctx.facts.as_ref().context("clinical facts missing")?;

        let explanation = reason::explain(facts, ctx.genetics.as_ref());
        let treatment = reason::treatment_plan(facts, ctx.genetics.as_ref());
        info!(
            severity = treatment.severity_score,
            action = %treatment.action,
            "reasoning_complete"
        );

        ctx.explanation = Some(explanation);
        ctx.treatment = Some(treatment);
        Ok(())
    }
}
