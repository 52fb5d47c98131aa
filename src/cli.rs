use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "neurosym", version, about = "Neurosymbolic lesion analysis CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Analyze(AnalyzeArgs),
    Score(ScoreArgs),
    Facts(FactsArgs),
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    #[arg(long, help = "Source image (any raster format)")]
    pub image: PathBuf,

    #[arg(long, help = "Attention map (.fmap, .fmap.gz, or grayscale raster)")]
    pub attention: PathBuf,

    #[arg(long, help = "Raw segmentation map (required unless --label no-lesion)")]
    pub segmentation: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub label: LabelArg,

    #[arg(long, help = "Classifier confidence in [0,1]")]
    pub confidence: f64,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, value_enum, help = "IDH mutation status, if profiled")]
    pub idh: Option<IdhArg>,

    #[arg(long, value_enum, help = "MGMT methylation status, if profiled")]
    pub mgmt: Option<MgmtArg>,

    #[arg(long, default_value_t = 0.5, help = "Overlay blend factor")]
    pub alpha: f32,

    #[arg(
        long,
        default_value_t = 0.01,
        help = "Segmentation activation floor below which the attention fallback is used"
    )]
    pub activation_floor: f32,
}

#[derive(Debug, Args)]
pub struct ScoreArgs {
    #[arg(long, help = "Reference mask raster")]
    pub reference: PathBuf,

    #[arg(long, help = "Candidate mask raster (e.g. a learner's drawing)")]
    pub candidate: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct FactsArgs {
    #[arg(long, help = "Mask to re-derive facts from (.fmap, .fmap.gz, or raster)")]
    pub mask: PathBuf,

    #[arg(long, value_enum)]
    pub label: LabelArg,

    #[arg(long, help = "Classifier confidence in [0,1]")]
    pub confidence: f64,

    #[arg(long, value_enum)]
    pub idh: Option<IdhArg>,

    #[arg(long, value_enum)]
    pub mgmt: Option<MgmtArg>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LabelArg {
    Glioma,
    Meningioma,
    Pituitary,
    NoLesion,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum IdhArg {
    Mutant,
    Wildtype,
    Unknown,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MgmtArg {
    Methylated,
    Unmethylated,
    Unknown,
}
