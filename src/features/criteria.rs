//! Criteria summarizer.
//!
//! Reduces a variable-length list of (note, respected) pairs into the
//! fixed-size `CriteriaSummary`. This is a total function: malformed or
//! empty input degrades to documented defaults instead of failing, so the
//! downstream feature pipeline never has to handle an error here.

use crate::domain::{Criterion, CriteriaSummary};

/// Summary returned for an empty criteria list.
///
/// Neutral-leaning defaults: an incomplete submission should score like a
/// mid-range project, not like one that failed every criterion.
pub const DEFAULT_SUMMARY: CriteriaSummary = CriteriaSummary {
    avg_note: 6.0,
    min_note: 6.0,
    max_note: 6.0,
    compliance_rate: 0.7,
    criteria_count: 0,
};

/// Summarize a criteria list.
///
/// Rules:
/// - empty list -> [`DEFAULT_SUMMARY`]
/// - absent `note` counts as 0.0 and the entry is still counted
/// - absent `respected` counts as true
/// - `compliance_rate` = respected / max(1, entries)
pub fn summarize(criteria: &[Criterion]) -> CriteriaSummary {
    if criteria.is_empty() {
        return DEFAULT_SUMMARY;
    }

    let mut notes: Vec<f64> = criteria.iter().map(|c| c.note.unwrap_or(0.0)).collect();
    if notes.is_empty() {
        // Unreachable with the mapping above, but kept as a guard so the
        // aggregates below stay total if the filtering rules ever change.
        notes.push(0.0);
    }

    let sum: f64 = notes.iter().sum();
    let avg_note = sum / notes.len() as f64;
    let min_note = notes.iter().copied().fold(f64::INFINITY, f64::min);
    let max_note = notes.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let respected = criteria
        .iter()
        .filter(|c| c.respected.unwrap_or(true))
        .count();
    let compliance_rate = respected as f64 / criteria.len().max(1) as f64;

    CriteriaSummary {
        avg_note,
        min_note,
        max_note,
        compliance_rate,
        criteria_count: notes.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_yields_defaults() {
        let s = summarize(&[]);
        assert_eq!(s, DEFAULT_SUMMARY);
        assert_eq!(s.avg_note, 6.0);
        assert_eq!(s.compliance_rate, 0.7);
        assert_eq!(s.criteria_count, 0);
    }

    #[test]
    fn single_entry() {
        let s = summarize(&[Criterion::new(10.0, true)]);
        assert_eq!(s.avg_note, 10.0);
        assert_eq!(s.min_note, 10.0);
        assert_eq!(s.max_note, 10.0);
        assert_eq!(s.compliance_rate, 1.0);
        assert_eq!(s.criteria_count, 1);
    }

    #[test]
    fn missing_note_counts_as_zero() {
        let s = summarize(&[
            Criterion::new(8.0, true),
            Criterion {
                note: None,
                respected: Some(false),
            },
        ]);
        assert_eq!(s.criteria_count, 2);
        assert!((s.avg_note - 4.0).abs() < 1e-12);
        assert_eq!(s.min_note, 0.0);
        assert_eq!(s.max_note, 8.0);
        assert!((s.compliance_rate - 0.5).abs() < 1e-12);
    }

    #[test]
    fn missing_respected_counts_as_true() {
        let s = summarize(&[Criterion {
            note: Some(5.0),
            respected: None,
        }]);
        assert_eq!(s.compliance_rate, 1.0);
    }

    #[test]
    fn mixed_compliance_rate() {
        let list = vec![
            Criterion::new(6.0, true),
            Criterion::new(7.0, false),
            Criterion::new(8.0, true),
            Criterion::new(9.0, false),
        ];
        let s = summarize(&list);
        assert!((s.compliance_rate - 0.5).abs() < 1e-12);
        assert!((s.avg_note - 7.5).abs() < 1e-12);
    }
}
