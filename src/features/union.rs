//! Feature union: the single fitted transform shared by both heads.
//!
//! Sub-transforms are concatenated in a fixed order:
//!
//! 1. TF-IDF bag of 1–2-grams over the description
//! 2. lexical stats `[count, keyword_ratio, unique_ratio]` (unscaled)
//! 3. standardized numeric block
//!    `[log1p(budget), avg_note, min_note, max_note, compliance_rate,
//!      criteria_count]`
//! 4. one-hot sector (unknown sector -> all zeros)
//!
//! `fit` freezes the vocabulary, the numeric means/standard deviations and
//! the sector category list **together**. Both regression heads must see
//! identical feature geometry, so there is exactly one fitted union per
//! bundle — this is a design invariant, not an implementation detail.
//!
//! `transform` never errors: values the union does not recognize (new
//! sectors, new words) contribute zero. A best-effort score beats a
//! rejected request for this service.

use std::collections::HashSet;

use rayon::prelude::*;

use crate::domain::{CriteriaSummary, TrainingRow};
use crate::error::AppError;
use crate::features::text::{select_tokenizer, LexicalStats, TfidfVectorizer, Tokenizer};

/// Number of standardized numeric features.
const NUMERIC_WIDTH: usize = 6;

/// One row of raw inputs to `transform`.
#[derive(Debug, Clone)]
pub struct UnionInput<'a> {
    pub description: &'a str,
    pub budget: f64,
    pub sector: &'a str,
    pub summary: CriteriaSummary,
}

impl<'a> From<&'a TrainingRow> for UnionInput<'a> {
    fn from(row: &'a TrainingRow) -> Self {
        Self {
            description: &row.description,
            budget: row.budget,
            sector: &row.sector,
            summary: row.summary,
        }
    }
}

/// Fitted feature union (frozen state + pure transform).
pub struct FeatureUnion {
    tokenizer: Box<dyn Tokenizer>,
    keywords: HashSet<String>,
    vectorizer: TfidfVectorizer,
    numeric_mean: [f64; NUMERIC_WIDTH],
    numeric_std: [f64; NUMERIC_WIDTH],
    sectors: Vec<String>,
}

impl FeatureUnion {
    /// Fit the union over the training corpus.
    ///
    /// Freezes: TF-IDF vocabulary + IDF, numeric means/stds, sector list.
    pub fn fit(
        rows: &[TrainingRow],
        keywords: &[&str],
        max_features: usize,
    ) -> Result<Self, AppError> {
        if rows.is_empty() {
            return Err(AppError::data("Cannot fit feature union on an empty corpus."));
        }

        let tokenizer = select_tokenizer();
        let docs: Vec<Vec<String>> = rows
            .par_iter()
            .map(|r| tokenizer.tokenize(&r.description))
            .collect();
        let vectorizer = TfidfVectorizer::fit(&docs, max_features);

        // Numeric block statistics (population std, zero-variance guard).
        let numeric: Vec<[f64; NUMERIC_WIDTH]> = rows
            .iter()
            .map(|r| numeric_row(r.budget, &r.summary))
            .collect();
        let n = numeric.len() as f64;
        let mut numeric_mean = [0.0; NUMERIC_WIDTH];
        for row in &numeric {
            for (m, v) in numeric_mean.iter_mut().zip(row.iter()) {
                *m += v;
            }
        }
        for m in &mut numeric_mean {
            *m /= n;
        }
        let mut numeric_std = [0.0; NUMERIC_WIDTH];
        for row in &numeric {
            for ((s, v), m) in numeric_std.iter_mut().zip(row.iter()).zip(numeric_mean.iter()) {
                let d = v - m;
                *s += d * d;
            }
        }
        for s in &mut numeric_std {
            *s = (*s / n).sqrt();
            if *s <= 1e-12 {
                *s = 1.0;
            }
        }

        // Sorted unique sector list defines the one-hot column order.
        let mut sectors: Vec<String> = rows.iter().map(|r| r.sector.clone()).collect();
        sectors.sort();
        sectors.dedup();

        let keywords: HashSet<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

        Ok(Self {
            tokenizer,
            keywords,
            vectorizer,
            numeric_mean,
            numeric_std,
            sectors,
        })
    }

    /// Total feature-vector width (frozen at fit time).
    pub fn width(&self) -> usize {
        self.vectorizer.width() + 3 + NUMERIC_WIDTH + self.sectors.len()
    }

    /// Sector categories frozen at fit time (one-hot column order).
    pub fn sectors(&self) -> &[String] {
        &self.sectors
    }

    /// Transform one input row into the fixed-width feature vector.
    pub fn transform(&self, input: &UnionInput<'_>) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.width());

        let tokens = self.tokenizer.tokenize(input.description);
        out.extend(self.vectorizer.transform(&tokens));

        let stats = LexicalStats::compute(&tokens, &self.keywords);
        out.push(stats.count as f64);
        out.push(stats.keyword_ratio);
        out.push(stats.unique_ratio);

        let numeric = numeric_row(input.budget, &input.summary);
        for ((v, m), s) in numeric
            .iter()
            .zip(self.numeric_mean.iter())
            .zip(self.numeric_std.iter())
        {
            out.push((v - m) / s);
        }

        for sector in &self.sectors {
            out.push(if sector == input.sector { 1.0 } else { 0.0 });
        }

        out
    }

    /// Transform a whole corpus (rows in parallel, order preserved).
    pub fn transform_rows(&self, rows: &[TrainingRow]) -> Vec<Vec<f64>> {
        rows.par_iter()
            .map(|r| self.transform(&UnionInput::from(r)))
            .collect()
    }
}

fn numeric_row(budget: f64, summary: &CriteriaSummary) -> [f64; NUMERIC_WIDTH] {
    [
        budget.max(0.0).ln_1p(),
        summary.avg_note,
        summary.min_note,
        summary.max_note,
        summary.compliance_rate,
        summary.criteria_count as f64,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::criteria::DEFAULT_SUMMARY;

    fn row(description: &str, budget: f64, sector: &str) -> TrainingRow {
        TrainingRow {
            description: description.to_string(),
            budget,
            sector: sector.to_string(),
            summary: DEFAULT_SUMMARY,
            esg_score: 50.0,
            credibility: 50.0,
        }
    }

    fn corpus() -> Vec<TrainingRow> {
        vec![
            row("Energy improves emissions renewable audit scope", 100_000.0, "Energy"),
            row("Transport reduces waste diesel coal leak", 900_000.0, "Transport"),
            row("Tech tracks efficiency co2 offset report", 250_000.0, "Tech"),
        ]
    }

    #[test]
    fn fit_on_empty_corpus_fails() {
        assert!(FeatureUnion::fit(&[], &["audit"], 300).is_err());
    }

    #[test]
    fn width_is_frozen_and_consistent() {
        let union = FeatureUnion::fit(&corpus(), &["audit", "co2"], 300).unwrap();
        let input = UnionInput {
            description: "new project text",
            budget: 1234.0,
            sector: "Energy",
            summary: DEFAULT_SUMMARY,
        };
        assert_eq!(union.transform(&input).len(), union.width());
        assert_eq!(union.sectors(), &["Energy", "Tech", "Transport"]);
    }

    #[test]
    fn unknown_sector_maps_to_zero_block() {
        let union = FeatureUnion::fit(&corpus(), &["audit"], 300).unwrap();
        let input = UnionInput {
            description: "solar plant",
            budget: 1000.0,
            sector: "Shipping",
            summary: DEFAULT_SUMMARY,
        };
        let v = union.transform(&input);
        let onehot = &v[v.len() - union.sectors().len()..];
        assert!(onehot.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn known_sector_sets_single_one() {
        let union = FeatureUnion::fit(&corpus(), &["audit"], 300).unwrap();
        let input = UnionInput {
            description: "solar plant",
            budget: 1000.0,
            sector: "Tech",
            summary: DEFAULT_SUMMARY,
        };
        let v = union.transform(&input);
        let onehot = &v[v.len() - union.sectors().len()..];
        assert_eq!(onehot, &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn transform_rows_matches_single_transform() {
        let rows = corpus();
        let union = FeatureUnion::fit(&rows, &["audit"], 300).unwrap();
        let batch = union.transform_rows(&rows);
        for (r, expected) in rows.iter().zip(batch.iter()) {
            assert_eq!(&union.transform(&UnionInput::from(r)), expected);
        }
    }
}
