//! Command-line parsing.
//!
//! Argument parsing and command dispatch stay separate from the
//! modeling code: this module only defines the clap surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::model::bundle::{DEFAULT_ROWS, DEFAULT_SEED};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "esg", version, about = "ESG project scoring and decision tooling")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score one project: ESG score, credibility, risk tier, recommendation.
    Analyze(AnalyzeArgs),
    /// Generate the synthetic decision dataset (CSV + meta JSON).
    Generate(GenerateArgs),
    /// Augment an existing dataset with noise and label flips.
    Augment(AugmentArgs),
    /// Train the decision classifier and write model + metrics artifacts.
    Train(TrainArgs),
    /// Batch-predict decisions for JSON records read from stdin.
    Predict(PredictArgs),
}

/// Options for one-shot project scoring.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// Project description (free text, minimum 5 characters).
    #[arg(long)]
    pub description: String,

    /// Project budget (must be > 0).
    #[arg(long)]
    pub budget: f64,

    /// Sector label. Sectors unseen at training time are allowed.
    #[arg(long)]
    pub sector: String,

    /// Evaluation criteria as JSON, e.g. '[{"note": 8, "respected": true}]'.
    #[arg(long)]
    pub criteria: Option<String>,

    /// Seed for the training corpus.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Training corpus size.
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    pub rows: usize,

    /// Emit the response as JSON instead of a formatted report.
    #[arg(long)]
    pub json: bool,
}

/// Options for dataset generation.
#[derive(Debug, Parser)]
pub struct GenerateArgs {
    /// Number of rows to generate.
    #[arg(long, default_value_t = 5000)]
    pub rows: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output CSV path.
    #[arg(long, default_value = "data/synthetic.csv")]
    pub out: PathBuf,

    /// Output meta JSON path.
    #[arg(long = "meta-out", default_value = "data/synthetic_meta.json")]
    pub meta_out: PathBuf,
}

/// Options for dataset augmentation.
#[derive(Debug, Parser)]
pub struct AugmentArgs {
    /// Input CSV path.
    #[arg(long = "in")]
    pub input: PathBuf,

    /// Output CSV path.
    #[arg(long)]
    pub out: PathBuf,

    /// Gaussian noise magnitude as a fraction of each column's std.
    #[arg(long, default_value_t = 0.05)]
    pub noise: f64,

    /// Probability of flipping a decision label.
    #[arg(long, default_value_t = 0.02)]
    pub flip: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Options for classifier training.
#[derive(Debug, Parser)]
pub struct TrainArgs {
    /// Input dataset CSV path.
    #[arg(long = "in")]
    pub input: PathBuf,

    /// Output path for the model artifact JSON.
    #[arg(long = "model-out", default_value = "models/decision_model.json")]
    pub model_out: PathBuf,

    /// Output path for the metrics report JSON.
    #[arg(long = "report-out", default_value = "reports/metrics.json")]
    pub report_out: PathBuf,

    /// Random seed (train/test split).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Options for batch prediction.
#[derive(Debug, Parser)]
pub struct PredictArgs {
    /// Model artifact JSON produced by `esg train`.
    #[arg(long)]
    pub model: PathBuf,
}
