//! Read/write the decision dataset as CSV.
//!
//! The column order is the dataset schema; `read_dataset_csv` tolerates
//! reordered columns by resolving positions from the header row. Fields
//! never contain commas or quotes, so no escaping is needed.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::data::decision::DecisionRow;
use crate::error::AppError;

/// Full column list, in write order.
pub const COLUMNS: [&str; 17] = [
    "sector",
    "region",
    "size",
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
    "risk_level",
    "decision",
];

/// Write the dataset (plus header) to a CSV file, creating parent
/// directories as needed.
pub fn write_dataset_csv(path: &Path, rows: &[DecisionRow]) -> Result<(), AppError> {
    create_parent_dirs(path)?;
    let mut file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create CSV '{}': {e}", path.display())))?;

    writeln!(file, "{}", COLUMNS.join(","))
        .map_err(|e| AppError::usage(format!("Failed to write CSV header: {e}")))?;

    for r in rows {
        writeln!(
            file,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            r.sector,
            r.region,
            r.size,
            r.baseline_emissions_tco2,
            r.target_reduction_pct,
            r.avg_note,
            r.min_note,
            r.compliance_rate,
            r.blocking_criteria,
            r.scope1_tco2,
            r.scope2_tco2,
            r.scope3_tco2,
            r.total_tco2,
            r.scenario_delta,
            r.score,
            r.risk_level,
            r.decision,
        )
        .map_err(|e| AppError::usage(format!("Failed to write CSV row: {e}")))?;
    }

    Ok(())
}

/// Read a dataset CSV produced by [`write_dataset_csv`] (or augmented
/// copies of it).
pub fn read_dataset_csv(path: &Path) -> Result<Vec<DecisionRow>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::usage(format!("Failed to open CSV '{}': {e}", path.display())))?;
    let mut lines = BufReader::new(file).lines();

    let header = lines
        .next()
        .ok_or_else(|| AppError::data(format!("CSV '{}' is empty.", path.display())))?
        .map_err(|e| AppError::usage(format!("Failed to read CSV header: {e}")))?;
    let names: Vec<&str> = header.split(',').map(str::trim).collect();

    let col = |name: &str| -> Result<usize, AppError> {
        names
            .iter()
            .position(|n| *n == name)
            .ok_or_else(|| AppError::data(format!("CSV '{}' is missing column '{name}'.", path.display())))
    };
    let idx: Vec<usize> = COLUMNS.iter().map(|c| col(c)).collect::<Result<_, _>>()?;

    let mut rows = Vec::new();
    for (line_no, line) in lines.enumerate() {
        let line = line.map_err(|e| AppError::usage(format!("Failed to read CSV line: {e}")))?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < names.len() {
            return Err(AppError::data(format!(
                "CSV line {} has {} fields, expected {}.",
                line_no + 2,
                fields.len(),
                names.len()
            )));
        }

        let f = |i: usize| -> Result<f64, AppError> {
            fields[idx[i]].parse::<f64>().map_err(|_| {
                AppError::data(format!(
                    "CSV line {}: '{}' is not a number in column '{}'.",
                    line_no + 2,
                    fields[idx[i]],
                    COLUMNS[i]
                ))
            })
        };

        rows.push(DecisionRow {
            sector: fields[idx[0]].to_string(),
            region: fields[idx[1]].to_string(),
            size: fields[idx[2]].to_string(),
            baseline_emissions_tco2: f(3)?,
            target_reduction_pct: f(4)?,
            avg_note: f(5)?,
            min_note: f(6)?,
            compliance_rate: f(7)?,
            blocking_criteria: f(8)? as u8,
            scope1_tco2: f(9)?,
            scope2_tco2: f(10)?,
            scope3_tco2: f(11)?,
            total_tco2: f(12)?,
            scenario_delta: f(13)?,
            score: f(14)?,
            risk_level: fields[idx[15]].to_string(),
            decision: fields[idx[16]].to_string(),
        });
    }

    if rows.is_empty() {
        return Err(AppError::data(format!("CSV '{}' has no data rows.", path.display())));
    }
    Ok(rows)
}

/// Write the generation meta JSON (rows, seed, column list).
pub fn write_meta_json(path: &Path, rows: usize, seed: u64) -> Result<(), AppError> {
    create_parent_dirs(path)?;
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create meta JSON '{}': {e}", path.display())))?;
    let meta = serde_json::json!({
        "rows": rows,
        "seed": seed,
        "columns": COLUMNS,
    });
    serde_json::to_writer_pretty(file, &meta)
        .map_err(|e| AppError::usage(format!("Failed to write meta JSON: {e}")))?;
    Ok(())
}

pub(crate) fn create_parent_dirs(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::usage(format!("Failed to create directory '{}': {e}", parent.display()))
            })?;
        }
    }
    Ok(())
}
