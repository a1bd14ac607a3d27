use serde::{Deserialize, Serialize};

use crate::config::Thresholds;
use crate::types::{MetricScoreSet, RawValue};

/// Statistics over the applicable raw values of one metric.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PopulationStatistics {
    pub mean: f64,
    pub stddev: f64,
}

/// One class in the ranked index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub class: String,
    pub value: RawValue,
    pub diff: f64,
    pub defect: bool,
}

/// The aggregated, defect-annotated view of all classes for one metric.
/// Entries preserve skeleton order; they are never sorted by score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index {
    pub metric: String,
    pub score: f64,
    pub entries: Vec<IndexEntry>,
}

/// Project-wide index across all configured metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexReport {
    pub score: f64,
    pub metrics: Vec<Index>,
}

/// Population statistics over applicable values only. `None` when the
/// set has no applicable value at all.
pub fn statistics(set: &MetricScoreSet) -> Option<PopulationStatistics> {
    let values: Vec<f64> = set
        .scores
        .iter()
        .filter_map(|s| s.value.applicable())
        .collect();
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(PopulationStatistics {
        mean,
        stddev: variance.sqrt(),
    })
}

/// Normalized deviation of a raw value from the population center,
/// expressed as a percentage of the mean. Neutral (0) for NotApplicable
/// values, for an empty population, and for a zero mean.
pub fn diff(value: RawValue, stats: Option<&PopulationStatistics>) -> f64 {
    match (value, stats) {
        (RawValue::Applicable(v), Some(s)) if s.mean != 0.0 => {
            (v - s.mean) / s.mean.abs() * 100.0
        }
        _ => 0.0,
    }
}

/// Build the index for one metric. Pure and total: an empty score set
/// yields an empty index with a neutral score.
pub fn build(set: &MetricScoreSet, thresholds: &Thresholds) -> Index {
    let stats = statistics(set);
    let entries: Vec<IndexEntry> = set
        .scores
        .iter()
        .map(|score| {
            let d = diff(score.value, stats.as_ref());
            IndexEntry {
                class: score.class.clone(),
                value: score.value,
                diff: d,
                defect: d > thresholds.high || d < thresholds.low,
            }
        })
        .collect();
    let score = defect_free_score(&entries);
    Index {
        metric: set.metric.clone(),
        score,
        entries,
    }
}

/// Fraction of non-defective entries, on a 0..100 scale. Monotonic:
/// moving any class's value toward the mean can only shrink its diff,
/// never turning a clean entry into a defect.
fn defect_free_score(entries: &[IndexEntry]) -> f64 {
    if entries.is_empty() {
        return 100.0;
    }
    let clean = entries.iter().filter(|e| !e.defect).count();
    clean as f64 / entries.len() as f64 * 100.0
}

/// Aggregate every metric's index into the project-wide report. The
/// project score is the arithmetic mean of the per-metric scores.
pub fn build_report(sets: &[MetricScoreSet], thresholds: &Thresholds) -> IndexReport {
    let metrics: Vec<Index> = sets.iter().map(|set| build(set, thresholds)).collect();
    let score = if metrics.is_empty() {
        100.0
    } else {
        metrics.iter().map(|i| i.score).sum::<f64>() / metrics.len() as f64
    };
    IndexReport { score, metrics }
}
