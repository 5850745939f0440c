//! Persisted model artifact (JSON).
//!
//! The artifact is the "portable" form of a trained decision classifier:
//! the frozen encoding + weights, plus the column lists downstream
//! tooling reads back. Schema changes here are breaking changes for that
//! tooling.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::decision::{CATEGORICAL_COLUMNS, NUMERIC_COLUMNS};
use crate::error::AppError;
use crate::io::dataset::create_parent_dirs;
use crate::model::classifier::DecisionClassifier;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub tool: String,
    pub seed: u64,
    pub feature_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub numeric_columns: Vec<String>,
    pub classifier: DecisionClassifier,
}

impl ModelArtifact {
    pub fn new(classifier: DecisionClassifier, seed: u64) -> Self {
        let categorical: Vec<String> = CATEGORICAL_COLUMNS.iter().map(|c| c.to_string()).collect();
        let numeric: Vec<String> = NUMERIC_COLUMNS.iter().map(|c| c.to_string()).collect();
        let mut feature_columns = categorical.clone();
        feature_columns.extend(numeric.clone());

        Self {
            tool: "esg".to_string(),
            seed,
            feature_columns,
            categorical_columns: categorical,
            numeric_columns: numeric,
            classifier,
        }
    }
}

/// Write a model artifact JSON file.
pub fn write_model_json(path: &Path, artifact: &ModelArtifact) -> Result<(), AppError> {
    create_parent_dirs(path)?;
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create model JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, artifact)
        .map_err(|e| AppError::usage(format!("Failed to write model JSON: {e}")))?;
    Ok(())
}

/// Read a model artifact JSON file.
pub fn read_model_json(path: &Path) -> Result<ModelArtifact, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::usage(format!("Failed to open model JSON '{}': {e}", path.display())))?;
    let artifact: ModelArtifact = serde_json::from_reader(file)
        .map_err(|e| AppError::usage(format!("Invalid model JSON: {e}")))?;
    Ok(artifact)
}
