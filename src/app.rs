//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main"
//! that parses CLI arguments and dispatches to the pipeline, dataset
//! tooling, training, and batch prediction.

use clap::Parser;

use crate::cli::{AnalyzeArgs, AugmentArgs, Command, GenerateArgs, PredictArgs, TrainArgs};
use crate::data::decision::{self, AugmentOptions, CATEGORICAL_COLUMNS, NUMERIC_COLUMNS};
use crate::domain::{Criterion, ProjectInput};
use crate::error::AppError;
use crate::io::artifact::{read_model_json, write_model_json, ModelArtifact};
use crate::io::batch;
use crate::io::dataset::{read_dataset_csv, write_dataset_csv, write_meta_json};
use crate::model::classifier::{evaluate, train_test_split, DecisionClassifier};
use crate::model::ModelBundle;

pub mod pipeline;

/// Entry point for the `esg` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Generate(args) => handle_generate(args),
        Command::Augment(args) => handle_augment(args),
        Command::Train(args) => handle_train(args),
        Command::Predict(args) => handle_predict(args),
    }
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let criteria: Vec<Criterion> = match &args.criteria {
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| AppError::usage(format!("Invalid criteria JSON: {e}")))?,
        None => Vec::new(),
    };
    let input = ProjectInput {
        description: args.description.clone(),
        budget: args.budget,
        sector: args.sector.clone(),
        criteria,
    };
    pipeline::validate_input(&input)?;

    // Built once per process; a failure here is fatal by design.
    let bundle = ModelBundle::build(args.seed, args.rows)?;
    let scored = pipeline::score_project(&bundle, &input);

    if args.json {
        let body = crate::report::analysis_json(
            &scored.prediction,
            scored.risk,
            scored.recommendation,
        );
        println!("{body}");
    } else {
        print!(
            "{}",
            crate::report::format_analysis(
                &input,
                &scored.prediction,
                scored.risk,
                scored.recommendation,
            )
        );
    }

    Ok(())
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    let rows = decision::generate_decision_dataset(args.seed, args.rows)?;
    write_dataset_csv(&args.out, &rows)?;
    write_meta_json(&args.meta_out, args.rows, args.seed)?;
    println!("Generated {} rows -> {}", rows.len(), args.out.display());
    Ok(())
}

fn handle_augment(args: AugmentArgs) -> Result<(), AppError> {
    let rows = read_dataset_csv(&args.input)?;
    let out = decision::augment(
        &rows,
        AugmentOptions {
            noise: args.noise,
            flip: args.flip,
            seed: args.seed,
        },
    )?;
    write_dataset_csv(&args.out, &out)?;
    println!("Augmented {} rows -> {}", out.len(), args.out.display());
    Ok(())
}

fn handle_train(args: TrainArgs) -> Result<(), AppError> {
    let rows = read_dataset_csv(&args.input)?;
    let (train_idx, test_idx) = train_test_split(rows.len(), 0.2, args.seed);

    let train: Vec<_> = train_idx.iter().map(|&i| rows[i].clone()).collect();
    let classifier = DecisionClassifier::fit(&train)?;

    let y_true: Vec<String> = test_idx.iter().map(|&i| rows[i].decision.clone()).collect();
    let y_pred: Vec<String> = test_idx
        .iter()
        .map(|&i| classifier.predict_row(&rows[i]).0)
        .collect();
    let eval = evaluate(&y_true, &y_pred)?;

    let artifact = ModelArtifact::new(classifier, args.seed);
    write_model_json(&args.model_out, &artifact)?;

    let report = crate::report::metrics_report(
        &eval,
        &artifact.feature_columns,
        &artifact.categorical_columns,
        &artifact.numeric_columns,
    );
    crate::report::write_json_report(&args.report_out, &report)?;

    println!("Model saved -> {}", args.model_out.display());
    println!("Metrics saved -> {}", args.report_out.display());
    println!("Accuracy: {:.4} (n_test={})", eval.accuracy, y_true.len());
    Ok(())
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let mut stdin = std::io::stdin().lock();
    let Some(records) = batch::read_records(&mut stdin)? else {
        // Structured response, not a crash: scripted callers match on it.
        println!("{}", serde_json::json!({ "error": "empty input" }));
        return Ok(());
    };

    let artifact = read_model_json(&args.model)?;

    let mut predictions = Vec::with_capacity(records.len());
    let mut confidence = Vec::with_capacity(records.len());
    let mut recommendations = Vec::with_capacity(records.len());

    for record in &records {
        let cats: Vec<&str> = CATEGORICAL_COLUMNS
            .iter()
            .map(|col| batch::get_str(record, col))
            .collect();
        let nums: Vec<f64> = NUMERIC_COLUMNS
            .iter()
            .map(|col| batch::get_f64(record, col))
            .collect();

        let (label, conf) = artifact.classifier.predict(&cats, &nums);
        recommendations.push(crate::report::build_recommendation(record, &label, conf));
        predictions.push(label);
        confidence.push(conf);
    }

    let out = serde_json::json!({
        "predictions": predictions,
        "confidence": confidence,
        "recommendations": recommendations,
    });
    println!("{out}");
    Ok(())
}
