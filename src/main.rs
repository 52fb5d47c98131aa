use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use neurosym::cli::{AnalyzeArgs, Cli, Commands, FactsArgs, IdhArg, LabelArg, MgmtArg, ScoreArgs};
use neurosym::ctx::Ctx;
use neurosym::facts::ClinicalFacts;
use neurosym::io::{floatmap, raster, summary};
use neurosym::pipeline::Pipeline;
use neurosym::reason;
use neurosym::schema::v1::{
    ClassificationV1, FactsReportV1, FactsV1, GeneticMarkers, IdhStatus, MgmtStatus, ScoreReportV1,
    TreatmentPlanV1, TumorClass,
};
use neurosym::scoring;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze(args) => run_analyze(args),
        Commands::Score(args) => run_score(args),
        Commands::Facts(args) => run_facts(args),
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let label = tumor_class(args.label);
    let genetics = markers_from_args(args.idh, args.mgmt);

    let mut ctx = Ctx::new(
        args.image,
        args.attention,
        args.segmentation,
        label,
        args.confidence,
        genetics,
        args.out,
        env!("CARGO_PKG_VERSION"),
    );
    ctx.alpha = args.alpha;
    ctx.refine_params.activation_floor = args.activation_floor;

    let pipeline = Pipeline::analysis();
    pipeline.run(&mut ctx)?;

    print!("{}", summary::format_summary(&ctx)?);
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
    Ok(())
}

fn run_score(args: ScoreArgs) -> Result<()> {
    let reference = raster::load_gray(&args.reference)?;
    let candidate = raster::load_gray(&args.candidate)?;
    let result = scoring::compare(&reference, &candidate);

    if args.json {
        let report = ScoreReportV1 {
            iou: result.iou,
            accuracy_pct: result.accuracy_pct,
            feedback: result.feedback,
            feedback_message: result.feedback.message().to_string(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("IoU: {:.4}", result.iou);
        println!("Accuracy: {:.1}%", result.accuracy_pct);
        println!("Feedback: {}", result.feedback.message());
    }
    Ok(())
}

fn run_facts(args: FactsArgs) -> Result<()> {
    let label = tumor_class(args.label);
    let genetics = markers_from_args(args.idh, args.mgmt);

    // Wholesale re-derivation: the caller replaces any previously computed
    // facts, explanation, and plan with this output.
    let map = floatmap::load(&args.mask)?;
    let facts = ClinicalFacts::derive_from_floats(label, args.confidence, &map);
    let explanation = reason::explain(&facts, genetics.as_ref());
    let treatment = reason::treatment_plan(&facts, genetics.as_ref());

    if args.json {
        let report = FactsReportV1 {
            tool: "neurosym".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            schema_version: "v1".to_string(),
            classification: ClassificationV1 {
                label,
                confidence: args.confidence,
            },
            facts: FactsV1 {
                volume_cm2: facts.volume_cm2,
                affected_lobes: facts.affected_lobes.clone(),
                irregularity: facts.irregularity,
            },
            genetics,
            explanation,
            treatment: TreatmentPlanV1 {
                severity_score: treatment.severity_score,
                action: treatment.action,
                follow_up: treatment.follow_up,
                protocol: treatment.protocol,
            },
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", explanation);
        println!(
            "Severity: {:.1} | action: {} | follow-up: {}",
            treatment.severity_score, treatment.action, treatment.follow_up
        );
    }
    Ok(())
}

fn tumor_class(label: LabelArg) -> TumorClass {
    match label {
        LabelArg::Glioma => TumorClass::Glioma,
        LabelArg::Meningioma => TumorClass::Meningioma,
        LabelArg::Pituitary => TumorClass::Pituitary,
        LabelArg::NoLesion => TumorClass::NoLesion,
    }
}

fn markers_from_args(idh: Option<IdhArg>, mgmt: Option<MgmtArg>) -> Option<GeneticMarkers> {
    if idh.is_none() && mgmt.is_none() {
        return None;
    }
    let idh_status = match idh {
        Some(IdhArg::Mutant) => IdhStatus::Mutant,
        Some(IdhArg::Wildtype) => IdhStatus::Wildtype,
        Some(IdhArg::Unknown) | None => IdhStatus::Unknown,
    };
    let mgmt_status = match mgmt {
        Some(MgmtArg::Methylated) => MgmtStatus::Methylated,
        Some(MgmtArg::Unmethylated) => MgmtStatus::Unmethylated,
        Some(MgmtArg::Unknown) | None => MgmtStatus::Unknown,
    };
    Some(GeneticMarkers {
        idh_status,
        mgmt_status,
    })
}
