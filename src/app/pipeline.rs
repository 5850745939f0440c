//! Shared scoring pipeline used by the CLI front-end.
//!
//! Validation, bundle construction and the predict -> risk -> recommend
//! sequence live here so presentation code (text vs JSON output) stays a
//! thin layer on top.

use crate::domain::{PredictionResult, ProjectInput, RiskTier};
use crate::error::AppError;
use crate::model::ModelBundle;

/// All computed outputs for one analyzed project.
#[derive(Debug, Clone)]
pub struct ScoredProject {
    pub prediction: PredictionResult,
    pub risk: RiskTier,
    pub recommendation: &'static str,
}

/// Validate an input the way the request layer would.
///
/// The model itself is permissive (it scores anything); these bounds are
/// the contract with callers, so they are enforced before the model runs.
pub fn validate_input(input: &ProjectInput) -> Result<(), AppError> {
    if input.description.trim().chars().count() < 5 {
        return Err(AppError::usage("Description must be at least 5 characters."));
    }
    if !(input.budget.is_finite() && input.budget > 0.0) {
        return Err(AppError::usage("Budget must be a positive number."));
    }
    if input.sector.trim().chars().count() < 2 {
        return Err(AppError::usage("Sector must be at least 2 characters."));
    }
    Ok(())
}

/// Score one validated project against a built bundle.
pub fn score_project(bundle: &ModelBundle, input: &ProjectInput) -> ScoredProject {
    let prediction = bundle.predict(
        &input.description,
        input.budget,
        &input.sector,
        &input.criteria,
    );
    let risk = bundle.estimate_risk(prediction.esg_score, input.budget);
    let recommendation = bundle.recommend(prediction.esg_score, &input.description);

    ScoredProject {
        prediction,
        risk,
        recommendation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Criterion;

    fn input(description: &str, budget: f64, sector: &str) -> ProjectInput {
        ProjectInput {
            description: description.to_string(),
            budget,
            sector: sector.to_string(),
            criteria: vec![Criterion::new(7.0, true)],
        }
    }

    #[test]
    fn validation_bounds() {
        assert!(validate_input(&input("ok?", 1000.0, "Energy")).is_err());
        assert!(validate_input(&input("long enough", -5.0, "Energy")).is_err());
        assert!(validate_input(&input("long enough", 1000.0, "E")).is_err());
        assert!(validate_input(&input("long enough", 1000.0, "Energy")).is_ok());
    }

    #[test]
    fn score_project_is_consistent_with_bundle_parts() {
        let bundle = ModelBundle::build(42, 200).unwrap();
        let project = input("Energy tracks emissions audit scope", 250_000.0, "Energy");

        let scored = score_project(&bundle, &project);
        assert_eq!(
            scored.risk,
            bundle.estimate_risk(scored.prediction.esg_score, project.budget)
        );
        assert_eq!(
            scored.recommendation,
            bundle.recommend(scored.prediction.esg_score, &project.description)
        );
    }
}
