//! The composed, trained scoring artifact.
//!
//! `ModelBundle` owns one fitted feature union and the two ridge heads
//! fit on it. It is built exactly once by the factory (`build`), before
//! any prediction is served, and is immutable afterwards: prediction
//! takes `&self`, holds no interior mutability, and may be shared across
//! threads freely. A failure inside `build` (degenerate corpus, singular
//! system) is fatal to startup by design, not recoverable per request.

use nalgebra::{DMatrix, DVector};

use crate::data::synthetic::{generate, BAD_KEYWORDS, GOOD_KEYWORDS};
use crate::domain::{clamp, Criterion, PredictionResult, RiskTier};
use crate::error::AppError;
use crate::features::{summarize, FeatureUnion, UnionInput};
use crate::model::ridge::{fit_ridge, RidgeModel};
use crate::model::rules;

/// Default corpus seed (kept stable so default builds are reproducible).
pub const DEFAULT_SEED: u64 = 42;
/// Default corpus size.
pub const DEFAULT_ROWS: usize = 800;

/// TF-IDF vocabulary cap.
const MAX_FEATURES: usize = 300;
/// Regularization strengths. The two heads intentionally differ; what
/// must be identical is the fitted transform they share, not alpha.
const ESG_ALPHA: f64 = 1.2;
const CREDIBILITY_ALPHA: f64 = 1.0;

pub struct ModelBundle {
    union: FeatureUnion,
    esg_head: RidgeModel,
    credibility_head: RidgeModel,
}

impl ModelBundle {
    /// Run the full generate -> fit pipeline and return the frozen bundle.
    pub fn build(seed: u64, rows: usize) -> Result<Self, AppError> {
        let corpus = generate(seed, rows)?;

        let keywords: Vec<&str> = GOOD_KEYWORDS
            .iter()
            .chain(BAD_KEYWORDS.iter())
            .copied()
            .collect();
        let union = FeatureUnion::fit(&corpus, &keywords, MAX_FEATURES)?;

        let feature_rows = union.transform_rows(&corpus);
        let n = feature_rows.len();
        let p = union.width();
        let x = DMatrix::from_fn(n, p, |i, j| feature_rows[i][j]);
        let y_esg = DVector::from_iterator(n, corpus.iter().map(|r| r.esg_score));
        let y_credibility = DVector::from_iterator(n, corpus.iter().map(|r| r.credibility));

        // Two heads, one fitted transform: both fits consume the same X.
        let esg_head = fit_ridge(&x, &y_esg, ESG_ALPHA)?;
        let credibility_head = fit_ridge(&x, &y_credibility, CREDIBILITY_ALPHA)?;

        Ok(Self {
            union,
            esg_head,
            credibility_head,
        })
    }

    /// Score one project. Raw regression outputs are rounded and clamped
    /// to [0, 100] here; the range clamp is a business rule, not part of
    /// the statistical estimate.
    pub fn predict(
        &self,
        description: &str,
        budget: f64,
        sector: &str,
        criteria: &[Criterion],
    ) -> PredictionResult {
        let summary = summarize(criteria);
        let features = self.union.transform(&UnionInput {
            description,
            budget,
            sector,
            summary,
        });

        let esg_raw = self.esg_head.predict(&features);
        let credibility_raw = self.credibility_head.predict(&features);

        PredictionResult {
            esg_score: round_score(esg_raw),
            credibility: round_score(credibility_raw),
        }
    }

    /// Risk tier for an already-predicted score.
    pub fn estimate_risk(&self, esg_score: i32, budget: f64) -> RiskTier {
        rules::estimate_risk(esg_score, budget)
    }

    /// Recommendation text for an already-predicted score.
    pub fn recommend(&self, esg_score: i32, description: &str) -> &'static str {
        rules::recommend(esg_score, description)
    }

    /// Feature width frozen at build time (diagnostics only).
    pub fn feature_width(&self) -> usize {
        self.union.width()
    }
}

fn round_score(raw: f64) -> i32 {
    clamp(raw, 0.0, 100.0).round() as i32
}
