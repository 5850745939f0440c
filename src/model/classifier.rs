//! Linear decision classifier for the batch CLIs.
//!
//! One-vs-rest over the sorted class list: each class gets a ridge head
//! fit against its indicator target, and prediction takes the argmax of
//! the class scores with a softmax turning them into a confidence value.
//! The encoding (one-hot categoricals + standardized numerics) is frozen
//! at fit time exactly like the scoring bundle's feature union; unseen
//! categories contribute zero.
//!
//! The whole fitted state serializes to JSON so `train` can persist it
//! and `predict` can reload it.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::data::decision::{DecisionRow, CATEGORICAL_COLUMNS, NUMERIC_COLUMNS};
use crate::error::AppError;
use crate::model::ridge::fit_ridge;

/// Regularization strength for the indicator regressions.
const CLASSIFIER_ALPHA: f64 = 1.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionClassifier {
    /// Sorted class labels; argmax ties resolve to the first, so class
    /// order is part of the model.
    pub classes: Vec<String>,
    /// Frozen category list per categorical column.
    pub categories: Vec<Vec<String>>,
    pub numeric_mean: Vec<f64>,
    pub numeric_std: Vec<f64>,
    /// Per-class weight vectors over the encoded feature width.
    pub weights: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl DecisionClassifier {
    /// Fit on training rows.
    pub fn fit(rows: &[DecisionRow]) -> Result<Self, AppError> {
        if rows.is_empty() {
            return Err(AppError::data("Cannot train on an empty dataset."));
        }

        let mut classes: Vec<String> = rows.iter().map(|r| r.decision.clone()).collect();
        classes.sort();
        classes.dedup();
        if classes.len() < 2 {
            return Err(AppError::data(
                "Training data must contain at least two decision classes.",
            ));
        }

        let mut categories: Vec<Vec<String>> = Vec::with_capacity(CATEGORICAL_COLUMNS.len());
        for col in 0..CATEGORICAL_COLUMNS.len() {
            let mut values: Vec<String> = rows
                .iter()
                .map(|r| r.categorical_values()[col].to_string())
                .collect();
            values.sort();
            values.dedup();
            categories.push(values);
        }

        let n = rows.len() as f64;
        let mut numeric_mean = vec![0.0; NUMERIC_COLUMNS.len()];
        for r in rows {
            for (m, v) in numeric_mean.iter_mut().zip(r.numeric_values().iter()) {
                *m += v / n;
            }
        }
        let mut numeric_std = vec![0.0; NUMERIC_COLUMNS.len()];
        for r in rows {
            for ((s, v), m) in numeric_std
                .iter_mut()
                .zip(r.numeric_values().iter())
                .zip(numeric_mean.iter())
            {
                *s += (v - m) * (v - m) / n;
            }
        }
        for s in &mut numeric_std {
            *s = s.sqrt();
            if *s <= 1e-12 {
                *s = 1.0;
            }
        }

        let mut model = Self {
            classes,
            categories,
            numeric_mean,
            numeric_std,
            weights: Vec::new(),
            intercepts: Vec::new(),
        };

        let encoded: Vec<Vec<f64>> = rows
            .iter()
            .map(|r| {
                let cats = r.categorical_values();
                model.encode(&cats, &r.numeric_values())
            })
            .collect();
        let p = model.encoded_width();
        let x = DMatrix::from_fn(encoded.len(), p, |i, j| encoded[i][j]);

        let classes = model.classes.clone();
        for class in &classes {
            let y = DVector::from_iterator(
                rows.len(),
                rows.iter()
                    .map(|r| if &r.decision == class { 1.0 } else { 0.0 }),
            );
            let head = fit_ridge(&x, &y, CLASSIFIER_ALPHA)?;
            model.weights.push(head.weights().to_vec());
            model.intercepts.push(head.intercept());
        }

        Ok(model)
    }

    /// Encoded feature-vector width (frozen at fit time).
    pub fn encoded_width(&self) -> usize {
        self.categories.iter().map(|c| c.len()).sum::<usize>() + self.numeric_mean.len()
    }

    /// Encode one observation: one-hot categoricals then standardized
    /// numerics. Unknown categories map to an all-zero block.
    pub fn encode(&self, cats: &[&str], nums: &[f64]) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.encoded_width());
        for (values, cat) in self.categories.iter().zip(cats.iter()) {
            for v in values {
                out.push(if v == cat { 1.0 } else { 0.0 });
            }
        }
        for ((v, m), s) in nums
            .iter()
            .zip(self.numeric_mean.iter())
            .zip(self.numeric_std.iter())
        {
            out.push((v - m) / s);
        }
        out
    }

    /// Predict a class label and a softmax confidence for one observation.
    pub fn predict(&self, cats: &[&str], nums: &[f64]) -> (String, f64) {
        let x = self.encode(cats, nums);
        let scores: Vec<f64> = self
            .weights
            .iter()
            .zip(self.intercepts.iter())
            .map(|(w, b)| w.iter().zip(x.iter()).map(|(wi, xi)| wi * xi).sum::<f64>() + b)
            .collect();

        let mut best = 0;
        for (i, s) in scores.iter().enumerate() {
            if *s > scores[best] {
                best = i;
            }
        }

        let max = scores[best];
        let exp_sum: f64 = scores.iter().map(|s| (s - max).exp()).sum();
        let confidence = if exp_sum > 0.0 && exp_sum.is_finite() {
            1.0 / exp_sum
        } else {
            0.0
        };

        (self.classes[best].clone(), confidence)
    }

    /// Predict directly from a dataset row (evaluation path).
    pub fn predict_row(&self, row: &DecisionRow) -> (String, f64) {
        let cats = row.categorical_values();
        self.predict(&cats, &row.numeric_values())
    }
}

/// Seeded shuffle split: returns (train, test) index sets.
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut idx: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    idx.shuffle(&mut rng);

    let n_test = ((n as f64 * test_fraction).round() as usize).clamp(1, n.saturating_sub(1).max(1));
    let test = idx[..n_test].to_vec();
    let train = idx[n_test..].to_vec();
    (train, test)
}

/// Per-class precision / recall / f1 / support.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    #[serde(rename = "f1-score")]
    pub f1_score: f64,
    pub support: usize,
}

/// Evaluation summary over a held-out set.
#[derive(Debug, Clone)]
pub struct EvalReport {
    pub accuracy: f64,
    pub per_class: Vec<(String, ClassMetrics)>,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

/// Compute accuracy and per-class metrics from label pairs.
pub fn evaluate(y_true: &[String], y_pred: &[String]) -> Result<EvalReport, AppError> {
    if y_true.is_empty() || y_true.len() != y_pred.len() {
        return Err(AppError::data("Evaluation label vectors are empty or mismatched."));
    }

    let mut classes: Vec<String> = y_true.iter().chain(y_pred.iter()).cloned().collect();
    classes.sort();
    classes.dedup();

    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    let accuracy = correct as f64 / y_true.len() as f64;

    let mut per_class = Vec::with_capacity(classes.len());
    for class in &classes {
        let tp = y_true
            .iter()
            .zip(y_pred.iter())
            .filter(|(t, p)| *t == class && *p == class)
            .count() as f64;
        let pred_pos = y_pred.iter().filter(|p| *p == class).count() as f64;
        let support = y_true.iter().filter(|t| *t == class).count();

        let precision = if pred_pos > 0.0 { tp / pred_pos } else { 0.0 };
        let recall = if support > 0 { tp / support as f64 } else { 0.0 };
        let f1_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        per_class.push((
            class.clone(),
            ClassMetrics {
                precision,
                recall,
                f1_score,
                support,
            },
        ));
    }

    let k = per_class.len() as f64;
    let macro_avg = ClassMetrics {
        precision: per_class.iter().map(|(_, m)| m.precision).sum::<f64>() / k,
        recall: per_class.iter().map(|(_, m)| m.recall).sum::<f64>() / k,
        f1_score: per_class.iter().map(|(_, m)| m.f1_score).sum::<f64>() / k,
        support: y_true.len(),
    };

    let total = y_true.len() as f64;
    let weighted_avg = ClassMetrics {
        precision: per_class
            .iter()
            .map(|(_, m)| m.precision * m.support as f64)
            .sum::<f64>()
            / total,
        recall: per_class
            .iter()
            .map(|(_, m)| m.recall * m.support as f64)
            .sum::<f64>()
            / total,
        f1_score: per_class
            .iter()
            .map(|(_, m)| m.f1_score * m.support as f64)
            .sum::<f64>()
            / total,
        support: y_true.len(),
    };

    Ok(EvalReport {
        accuracy,
        per_class,
        macro_avg,
        weighted_avg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::decision::generate_decision_dataset;

    #[test]
    fn fit_and_predict_known_classes() {
        let rows = generate_decision_dataset(42, 400).unwrap();
        let model = DecisionClassifier::fit(&rows).unwrap();

        for r in rows.iter().take(50) {
            let (pred, conf) = model.predict_row(r);
            assert!(model.classes.contains(&pred));
            assert!((0.0..=1.0).contains(&conf));
        }
    }

    #[test]
    fn classifier_beats_majority_class_on_train() {
        let rows = generate_decision_dataset(42, 600).unwrap();
        let model = DecisionClassifier::fit(&rows).unwrap();

        let preds: Vec<String> = rows.iter().map(|r| model.predict_row(r).0).collect();
        let truth: Vec<String> = rows.iter().map(|r| r.decision.clone()).collect();
        let report = evaluate(&truth, &preds).unwrap();

        let majority = model
            .classes
            .iter()
            .map(|c| truth.iter().filter(|t| *t == c).count())
            .max()
            .unwrap() as f64
            / truth.len() as f64;
        assert!(
            report.accuracy > majority,
            "accuracy {} <= majority baseline {}",
            report.accuracy,
            majority
        );
    }

    #[test]
    fn unknown_category_encodes_to_zero_block() {
        let rows = generate_decision_dataset(42, 200).unwrap();
        let model = DecisionClassifier::fit(&rows).unwrap();

        let nums = rows[0].numeric_values();
        let x = model.encode(&["hydrogen", "MOON", "HUGE"], &nums);
        let cat_width: usize = model.categories.iter().map(|c| c.len()).sum();
        assert!(x[..cat_width].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn serializes_round_trip() {
        let rows = generate_decision_dataset(42, 200).unwrap();
        let model = DecisionClassifier::fit(&rows).unwrap();
        let json = serde_json::to_string(&model).unwrap();
        let back: DecisionClassifier = serde_json::from_str(&json).unwrap();

        let (a, ca) = model.predict_row(&rows[0]);
        let (b, cb) = back.predict_row(&rows[0]);
        assert_eq!(a, b);
        assert!((ca - cb).abs() < 1e-12);
    }

    #[test]
    fn split_is_seeded_and_disjoint() {
        let (train_a, test_a) = train_test_split(100, 0.2, 42);
        let (train_b, test_b) = train_test_split(100, 0.2, 42);
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
        assert_eq!(test_a.len(), 20);
        assert_eq!(train_a.len(), 80);
        for i in &test_a {
            assert!(!train_a.contains(i));
        }
    }

    #[test]
    fn evaluate_perfect_predictions() {
        let labels: Vec<String> = ["A", "B", "A", "B"].iter().map(|s| s.to_string()).collect();
        let report = evaluate(&labels, &labels).unwrap();
        assert_eq!(report.accuracy, 1.0);
        for (_, m) in &report.per_class {
            assert_eq!(m.precision, 1.0);
            assert_eq!(m.recall, 1.0);
            assert_eq!(m.f1_score, 1.0);
        }
        assert_eq!(report.macro_avg.support, 4);
    }

    #[test]
    fn evaluate_counts_supports() {
        let truth: Vec<String> = ["A", "A", "B"].iter().map(|s| s.to_string()).collect();
        let pred: Vec<String> = ["A", "B", "B"].iter().map(|s| s.to_string()).collect();
        let report = evaluate(&truth, &pred).unwrap();
        assert!((report.accuracy - 2.0 / 3.0).abs() < 1e-12);
        let a = &report.per_class[0].1;
        assert_eq!(a.support, 2);
        assert_eq!(a.precision, 1.0);
        assert!((a.recall - 0.5).abs() < 1e-12);
    }
}
