//! Reporting: formatted terminal output, the metrics report JSON, and the
//! rule-based batch recommendations.
//!
//! Formatting lives in one place so the modeling code stays clean and
//! output changes are localized.

use std::fs::File;
use std::path::Path;

use serde::Serialize;
use serde_json::{json, Value};

use crate::domain::{PredictionResult, ProjectInput, RiskTier};
use crate::error::AppError;
use crate::io::batch::{get_f64, Record};
use crate::io::dataset::create_parent_dirs;
use crate::model::classifier::EvalReport;

/// Format the single-project analysis for the terminal.
pub fn format_analysis(
    input: &ProjectInput,
    prediction: &PredictionResult,
    risk: RiskTier,
    recommendation: &str,
) -> String {
    let mut out = String::new();

    out.push_str("=== esg - Project Scoring ===\n");
    out.push_str(&format!("Sector: {}\n", input.sector));
    out.push_str(&format!("Budget: {:.2}\n", input.budget));
    out.push_str(&format!("Criteria: n={}\n", input.criteria.len()));
    out.push('\n');
    out.push_str(&format!("ESG score   : {:>3} / 100\n", prediction.esg_score));
    out.push_str(&format!("Credibility : {:>3} / 100\n", prediction.credibility));
    out.push_str(&format!("Risk tier   : {risk}\n"));
    out.push('\n');
    out.push_str(&format!("Recommendation: {recommendation}\n"));

    out
}

/// JSON response body for `analyze --json`.
pub fn analysis_json(
    prediction: &PredictionResult,
    risk: RiskTier,
    recommendation: &str,
) -> Value {
    json!({
        "predicted_esg_score": prediction.esg_score,
        "credibility_score": prediction.credibility,
        "carbon_risk": risk.display_name(),
        "recommendations": recommendation,
    })
}

/// Build the training metrics report.
///
/// The shape is a downstream contract: `accuracy`, a per-class
/// `classification_report` (with `accuracy`, `macro avg`, `weighted avg`
/// entries alongside the class keys), and the three column lists.
pub fn metrics_report(
    eval: &EvalReport,
    feature_columns: &[String],
    categorical_columns: &[String],
    numeric_columns: &[String],
) -> Value {
    let mut classification = serde_json::Map::new();
    for (class, metrics) in &eval.per_class {
        classification.insert(class.clone(), to_value(metrics));
    }
    classification.insert("accuracy".to_string(), json!(eval.accuracy));
    classification.insert("macro avg".to_string(), to_value(&eval.macro_avg));
    classification.insert("weighted avg".to_string(), to_value(&eval.weighted_avg));

    json!({
        "accuracy": eval.accuracy,
        "classification_report": Value::Object(classification),
        "feature_columns": feature_columns,
        "categorical_columns": categorical_columns,
        "numeric_columns": numeric_columns,
    })
}

/// Write a JSON report to disk, creating parent directories.
pub fn write_json_report(path: &Path, value: &Value) -> Result<(), AppError> {
    create_parent_dirs(path)?;
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create report '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, value)
        .map_err(|e| AppError::usage(format!("Failed to write report: {e}")))?;
    Ok(())
}

/// One batch-prediction recommendation: a summary plus ordered actions.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub summary: String,
    pub actions: Vec<String>,
}

/// Build the per-row recommendation for the batch `predict` CLI.
///
/// Actions fire on fixed aggregate thresholds, in order; when none fire
/// the single fallback action is emitted.
pub fn build_recommendation(record: &Record, prediction: &str, confidence: f64) -> Recommendation {
    let mut actions = Vec::new();

    if get_f64(record, "compliance_rate") < 0.75 {
        actions.push("Strengthen compliance on critical criteria (target >= 75%).".to_string());
    }
    if get_f64(record, "min_note") < 5.0 {
        actions.push("Fix weak criteria (note < 5) with a targeted action plan.".to_string());
    }
    if get_f64(record, "avg_note") < 6.5 {
        actions.push("Raise average criteria performance (target >= 6.5).".to_string());
    }
    if get_f64(record, "total_tco2") > 4_000.0 {
        actions.push("Reduce total emissions (process and energy optimization).".to_string());
    }
    if get_f64(record, "target_reduction_pct") < 15.0 {
        actions.push("Increase the reduction target (>= 15%).".to_string());
    }

    if actions.is_empty() {
        actions.push("Maintain good practices and document impact evidence.".to_string());
    }

    Recommendation {
        summary: format!("ML decision: {prediction} (confidence {confidence:.2})"),
        actions,
    }
}

fn to_value(metrics: &crate::model::classifier::ClassMetrics) -> Value {
    serde_json::to_value(metrics).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::classifier::evaluate;

    fn record(pairs: &[(&str, f64)]) -> Record {
        let mut map = Record::new();
        for (k, v) in pairs {
            map.insert(k.to_string(), json!(v));
        }
        map
    }

    #[test]
    fn metrics_report_shape() {
        let truth: Vec<String> = ["APPROVE", "REJECT", "APPROVE"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let eval = evaluate(&truth, &truth).unwrap();
        let feature = vec!["sector".to_string(), "avg_note".to_string()];
        let cat = vec!["sector".to_string()];
        let num = vec!["avg_note".to_string()];

        let report = metrics_report(&eval, &feature, &cat, &num);
        assert_eq!(report["accuracy"], json!(1.0));

        let cr = &report["classification_report"];
        assert!(cr["APPROVE"]["precision"].is_number());
        assert!(cr["APPROVE"]["f1-score"].is_number());
        assert!(cr["APPROVE"]["support"].is_number());
        assert!(cr["accuracy"].is_number());
        assert!(cr["macro avg"]["recall"].is_number());
        assert!(cr["weighted avg"]["f1-score"].is_number());
        assert_eq!(report["categorical_columns"], json!(["sector"]));
    }

    #[test]
    fn recommendation_thresholds_fire_in_order() {
        let rec = build_recommendation(
            &record(&[
                ("compliance_rate", 0.5),
                ("min_note", 3.0),
                ("avg_note", 5.0),
                ("total_tco2", 5000.0),
                ("target_reduction_pct", 10.0),
            ]),
            "REJECT",
            0.91,
        );
        assert_eq!(rec.actions.len(), 5);
        assert!(rec.actions[0].starts_with("Strengthen compliance"));
        assert!(rec.actions[4].starts_with("Increase the reduction target"));
        assert_eq!(rec.summary, "ML decision: REJECT (confidence 0.91)");
    }

    #[test]
    fn clean_record_gets_fallback_action() {
        let rec = build_recommendation(
            &record(&[
                ("compliance_rate", 0.9),
                ("min_note", 7.0),
                ("avg_note", 8.0),
                ("total_tco2", 2000.0),
                ("target_reduction_pct", 30.0),
            ]),
            "APPROVE",
            0.75,
        );
        assert_eq!(rec.actions.len(), 1);
        assert!(rec.actions[0].starts_with("Maintain good practices"));
    }

    #[test]
    fn analysis_formats_scores() {
        let input = ProjectInput {
            description: "solar audit scope".to_string(),
            budget: 250_000.0,
            sector: "Energy".to_string(),
            criteria: vec![],
        };
        let prediction = PredictionResult {
            esg_score: 82,
            credibility: 77,
        };
        let text = format_analysis(&input, &prediction, RiskTier::Low, "Keep it up.");
        assert!(text.contains("ESG score   :  82 / 100"));
        assert!(text.contains("Risk tier   : Low"));
        assert!(text.contains("Keep it up."));
    }
}
