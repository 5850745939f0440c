//! Shared domain types.
//!
//! These types are intentionally lightweight and (where they cross a file
//! or process boundary) serializable, so they can be:
//!
//! - used in-memory during fitting and prediction
//! - read from JSON request payloads / stdin batches
//! - exported to CSV/JSON artifacts

use serde::{Deserialize, Serialize};

/// A single evaluator-submitted criterion.
///
/// Both fields are optional on purpose: upstream payloads routinely omit
/// them, and the summarizer degrades to permissive defaults instead of
/// rejecting the entry (`note` -> 0.0, `respected` -> true).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    #[serde(default)]
    pub note: Option<f64>,
    #[serde(default)]
    pub respected: Option<bool>,
}

impl Criterion {
    pub fn new(note: f64, respected: bool) -> Self {
        Self {
            note: Some(note),
            respected: Some(respected),
        }
    }
}

/// One project to score. Transient, constructed per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInput {
    pub description: String,
    pub budget: f64,
    pub sector: String,
    #[serde(default)]
    pub criteria: Vec<Criterion>,
}

/// Fixed-size numeric summary of a criteria list.
///
/// Derived deterministically from `ProjectInput::criteria`; when the list
/// is empty the documented defaults apply (avg=min=max=6.0, rate=0.7,
/// count=0) so incomplete submissions are not skewed toward zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriteriaSummary {
    pub avg_note: f64,
    pub min_note: f64,
    pub max_note: f64,
    pub compliance_rate: f64,
    pub criteria_count: usize,
}

/// One synthetic training example: project fields plus the two labels.
///
/// Lives only between corpus generation and the fit step.
#[derive(Debug, Clone)]
pub struct TrainingRow {
    pub description: String,
    pub budget: f64,
    pub sector: String,
    pub summary: CriteriaSummary,
    pub esg_score: f64,
    pub credibility: f64,
}

/// Rounded, range-clamped output of the dual regressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub esg_score: i32,
    pub credibility: i32,
}

/// Risk tier derived from (esg_score, budget) by fixed rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Human-readable label for terminal output and JSON responses.
    pub fn display_name(self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Clamp a value into `[low, high]`.
pub fn clamp(value: f64, low: f64, high: f64) -> f64 {
    value.max(low).min(high)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn criterion_deserializes_with_missing_fields() {
        let c: Criterion = serde_json::from_str("{}").unwrap();
        assert_eq!(c.note, None);
        assert_eq!(c.respected, None);

        let c: Criterion = serde_json::from_str(r#"{"note": 7.5}"#).unwrap();
        assert_eq!(c.note, Some(7.5));
        assert_eq!(c.respected, None);
    }

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp(120.0, 0.0, 100.0), 100.0);
        assert_eq!(clamp(-3.0, 0.0, 100.0), 0.0);
        assert_eq!(clamp(55.5, 0.0, 100.0), 55.5);
    }
}
