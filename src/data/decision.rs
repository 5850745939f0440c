//! Synthetic decision dataset for the batch classifier.
//!
//! This is the training input for the `train`/`predict` CLIs: one row per
//! project with profile categoricals, criteria aggregates, emissions
//! metrics, and derived `score` / `risk_level` / `decision` labels. The
//! distributions and label formulas are calibration constants carried
//! over unchanged.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::domain::clamp;
use crate::error::AppError;

pub const SECTORS: [&str; 5] = ["energy", "industry", "building", "transport", "agri"];
pub const REGIONS: [&str; 5] = ["EU", "NA", "AF", "APAC", "MEA"];
pub const SIZES: [&str; 4] = ["MICRO", "SMALL", "MEDIUM", "LARGE"];
const SIZE_WEIGHTS: [f64; 4] = [0.2, 0.35, 0.3, 0.15];

/// Categorical feature columns, in schema order.
pub const CATEGORICAL_COLUMNS: [&str; 3] = ["sector", "region", "size"];

/// Numeric feature columns, in schema order.
pub const NUMERIC_COLUMNS: [&str; 12] = [
    "baseline_emissions_tco2",
    "target_reduction_pct",
    "avg_note",
    "min_note",
    "compliance_rate",
    "blocking_criteria",
    "scope1_tco2",
    "scope2_tco2",
    "scope3_tco2",
    "total_tco2",
    "scenario_delta",
    "score",
];

/// One dataset row. `decision` is the training target; `risk_level` is a
/// derived label excluded from the feature set alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRow {
    pub sector: String,
    pub region: String,
    pub size: String,
    pub baseline_emissions_tco2: f64,
    pub target_reduction_pct: f64,
    pub avg_note: f64,
    pub min_note: f64,
    pub compliance_rate: f64,
    pub blocking_criteria: u8,
    pub scope1_tco2: f64,
    pub scope2_tco2: f64,
    pub scope3_tco2: f64,
    pub total_tco2: f64,
    pub scenario_delta: f64,
    pub score: f64,
    pub risk_level: String,
    pub decision: String,
}

impl DecisionRow {
    /// Numeric feature values in [`NUMERIC_COLUMNS`] order.
    pub fn numeric_values(&self) -> [f64; 12] {
        [
            self.baseline_emissions_tco2,
            self.target_reduction_pct,
            self.avg_note,
            self.min_note,
            self.compliance_rate,
            self.blocking_criteria as f64,
            self.scope1_tco2,
            self.scope2_tco2,
            self.scope3_tco2,
            self.total_tco2,
            self.scenario_delta,
            self.score,
        ]
    }

    /// Categorical feature values in [`CATEGORICAL_COLUMNS`] order.
    pub fn categorical_values(&self) -> [&str; 3] {
        [&self.sector, &self.region, &self.size]
    }
}

fn risk_level(score: f64) -> &'static str {
    if score >= 7.5 {
        "LOW"
    } else if score >= 5.5 {
        "MEDIUM"
    } else if score >= 3.5 {
        "HIGH"
    } else {
        "CRITICAL"
    }
}

fn decision(score: f64, blocking: u8) -> &'static str {
    if blocking == 1 {
        "REJECT"
    } else if score >= 7.0 {
        "APPROVE"
    } else if score >= 5.0 {
        "REVIEW"
    } else {
        "REJECT"
    }
}

/// Generate the decision dataset, fully determined by `seed`.
pub fn generate_decision_dataset(seed: u64, rows: usize) -> Result<Vec<DecisionRow>, AppError> {
    if rows == 0 {
        return Err(AppError::data("Dataset row count must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let baseline_dist = normal(5_000.0, 1_200.0)?;
    let avg_note_dist = normal(6.5, 1.4)?;
    let scope1_dist = normal(1_200.0, 300.0)?;
    let scope2_dist = normal(900.0, 250.0)?;
    let scope3_dist = normal(1_500.0, 600.0)?;
    let scenario_dist = normal(0.0, 0.6)?;

    // First pass: draw features. The score formula normalizes total
    // emissions by the corpus maximum, so labels need a second pass.
    let mut partial = Vec::with_capacity(rows);
    let mut total_max = f64::MIN;
    for _ in 0..rows {
        let sector = SECTORS[rng.gen_range(0..SECTORS.len())].to_string();
        let region = REGIONS[rng.gen_range(0..REGIONS.len())].to_string();
        let size = weighted_choice(&mut rng, &SIZES, &SIZE_WEIGHTS).to_string();

        let baseline = clamp(baseline_dist.sample(&mut rng), 200.0, 20_000.0);
        let target_pct = rng.gen_range(5.0..=50.0);

        let avg_note = clamp(avg_note_dist.sample(&mut rng), 1.0, 10.0);
        let min_note = clamp(avg_note - rng.gen_range(0.0..=3.0), 1.0, 10.0);
        let compliance_rate = rng.gen_range(0.5..=1.0);
        let blocking = u8::from(rng.r#gen::<f64>() < 0.08);

        let scope1 = clamp(scope1_dist.sample(&mut rng), 50.0, 5_000.0);
        let scope2 = clamp(scope2_dist.sample(&mut rng), 50.0, 4_000.0);
        let scope3 = clamp(scope3_dist.sample(&mut rng), 80.0, 8_000.0);
        let total = scope1 + scope2 + scope3;
        total_max = total_max.max(total);

        let scenario_delta = scenario_dist.sample(&mut rng);

        partial.push(DecisionRow {
            sector,
            region,
            size,
            baseline_emissions_tco2: baseline,
            target_reduction_pct: target_pct,
            avg_note,
            min_note,
            compliance_rate,
            blocking_criteria: blocking,
            scope1_tco2: scope1,
            scope2_tco2: scope2,
            scope3_tco2: scope3,
            total_tco2: total,
            scenario_delta,
            score: 0.0,
            risk_level: String::new(),
            decision: String::new(),
        });
    }

    for row in &mut partial {
        let score = clamp(
            0.55 * row.avg_note
                + 0.25 * (row.compliance_rate * 10.0)
                + 0.15 * (1.0 - row.total_tco2 / total_max) * 10.0
                + 0.05 * (row.target_reduction_pct / 10.0),
            0.0,
            10.0,
        );
        row.score = score;
        row.risk_level = risk_level(score).to_string();
        row.decision = decision(score, row.blocking_criteria).to_string();
    }

    Ok(partial)
}

/// Augmentation options (noise magnitude, label-flip probability).
#[derive(Debug, Clone, Copy)]
pub struct AugmentOptions {
    pub noise: f64,
    pub flip: f64,
    pub seed: u64,
}

/// Add per-column Gaussian noise and random label flips.
///
/// Noise sigma is `column_std * noise`; bounded columns are re-clamped
/// afterwards. Flips simulate labeling error: APPROVE and REJECT swap,
/// REVIEW degrades to REJECT.
pub fn augment(rows: &[DecisionRow], opts: AugmentOptions) -> Result<Vec<DecisionRow>, AppError> {
    if rows.is_empty() {
        return Err(AppError::data("Cannot augment an empty dataset."));
    }
    if !(opts.noise.is_finite() && opts.noise >= 0.0) || !(0.0..=1.0).contains(&opts.flip) {
        return Err(AppError::usage("Invalid augmentation settings."));
    }

    let mut rng = StdRng::seed_from_u64(opts.seed);

    // Column stds over the numeric block (blocking_criteria excluded; it
    // is a flag, not a measurement).
    let n = rows.len() as f64;
    let values: Vec<[f64; 12]> = rows.iter().map(|r| r.numeric_values()).collect();
    let mut means = [0.0; 12];
    for v in &values {
        for (m, x) in means.iter_mut().zip(v.iter()) {
            *m += x / n;
        }
    }
    let mut stds = [0.0; 12];
    for v in &values {
        for ((s, x), m) in stds.iter_mut().zip(v.iter()).zip(means.iter()) {
            *s += (x - m) * (x - m) / n;
        }
    }
    for s in &mut stds {
        *s = s.sqrt();
    }

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let mut r = row.clone();
        r.baseline_emissions_tco2 += noise_for(&mut rng, stds[0], opts.noise)?;
        r.target_reduction_pct =
            clamp(r.target_reduction_pct + noise_for(&mut rng, stds[1], opts.noise)?, 0.0, 100.0);
        r.avg_note = clamp(r.avg_note + noise_for(&mut rng, stds[2], opts.noise)?, 1.0, 10.0);
        r.min_note = clamp(r.min_note + noise_for(&mut rng, stds[3], opts.noise)?, 1.0, 10.0);
        r.compliance_rate =
            clamp(r.compliance_rate + noise_for(&mut rng, stds[4], opts.noise)?, 0.0, 1.0);
        r.scope1_tco2 += noise_for(&mut rng, stds[6], opts.noise)?;
        r.scope2_tco2 += noise_for(&mut rng, stds[7], opts.noise)?;
        r.scope3_tco2 += noise_for(&mut rng, stds[8], opts.noise)?;
        r.total_tco2 += noise_for(&mut rng, stds[9], opts.noise)?;
        r.scenario_delta += noise_for(&mut rng, stds[10], opts.noise)?;
        r.score += noise_for(&mut rng, stds[11], opts.noise)?;

        if rng.r#gen::<f64>() < opts.flip {
            r.decision = match r.decision.as_str() {
                "APPROVE" => "REJECT".to_string(),
                "REJECT" => "APPROVE".to_string(),
                "REVIEW" => "REJECT".to_string(),
                other => other.to_string(),
            };
        }
        out.push(r);
    }

    Ok(out)
}

fn noise_for(rng: &mut StdRng, std: f64, noise: f64) -> Result<f64, AppError> {
    let sigma = std * noise;
    if sigma <= 0.0 {
        return Ok(0.0);
    }
    Ok(normal(0.0, sigma)?.sample(rng))
}

fn normal(mean: f64, std: f64) -> Result<Normal<f64>, AppError> {
    Normal::new(mean, std).map_err(|e| AppError::numeric(format!("Noise distribution error: {e}")))
}

fn weighted_choice<'a>(rng: &mut StdRng, items: &[&'a str], weights: &[f64]) -> &'a str {
    let total: f64 = weights.iter().sum();
    let mut roll = rng.r#gen::<f64>() * total;
    for (item, w) in items.iter().zip(weights.iter()) {
        if roll < *w {
            return item;
        }
        roll -= w;
    }
    items[items.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic() {
        let a = generate_decision_dataset(42, 100).unwrap();
        let b = generate_decision_dataset(42, 100).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rows_respect_bounds_and_labels() {
        let rows = generate_decision_dataset(5, 300).unwrap();
        for r in &rows {
            assert!((1.0..=10.0).contains(&r.avg_note));
            assert!(r.min_note <= r.avg_note);
            assert!((0.5..=1.0).contains(&r.compliance_rate));
            assert!((0.0..=10.0).contains(&r.score));
            assert!(["LOW", "MEDIUM", "HIGH", "CRITICAL"].contains(&r.risk_level.as_str()));
            assert!(["APPROVE", "REVIEW", "REJECT"].contains(&r.decision.as_str()));
            assert!(
                (r.total_tco2 - (r.scope1_tco2 + r.scope2_tco2 + r.scope3_tco2)).abs() < 1e-9
            );
        }
    }

    #[test]
    fn blocking_criteria_forces_reject() {
        let rows = generate_decision_dataset(11, 500).unwrap();
        for r in rows.iter().filter(|r| r.blocking_criteria == 1) {
            assert_eq!(r.decision, "REJECT");
        }
    }

    #[test]
    fn augment_keeps_bounds_and_is_deterministic() {
        let rows = generate_decision_dataset(42, 100).unwrap();
        let opts = AugmentOptions {
            noise: 0.05,
            flip: 0.1,
            seed: 7,
        };
        let a = augment(&rows, opts).unwrap();
        let b = augment(&rows, opts).unwrap();
        assert_eq!(a, b);
        for r in &a {
            assert!((1.0..=10.0).contains(&r.avg_note));
            assert!((0.0..=1.0).contains(&r.compliance_rate));
            assert!((0.0..=100.0).contains(&r.target_reduction_pct));
        }
    }

    #[test]
    fn augment_flips_only_to_known_labels() {
        let rows = generate_decision_dataset(42, 200).unwrap();
        let out = augment(
            &rows,
            AugmentOptions {
                noise: 0.0,
                flip: 1.0,
                seed: 1,
            },
        )
        .unwrap();
        for (orig, aug) in rows.iter().zip(out.iter()) {
            match orig.decision.as_str() {
                "APPROVE" => assert_eq!(aug.decision, "REJECT"),
                "REJECT" => assert_eq!(aug.decision, "APPROVE"),
                "REVIEW" => assert_eq!(aug.decision, "REJECT"),
                _ => unreachable!(),
            }
        }
    }
}
