use uuid::Uuid;

use crate::models::{
    AggregateIndex, LocationIndex, ParameterLimits, QualityCategory, ReadingRecord, RiskLevel,
};
use crate::parameters::{curve_for, CurveKind};

/// Linear interpolation between anchors `(a, score_a)` and `(b, score_b)`.
/// Equal anchors resolve to `score_b` instead of dividing by zero.
fn interpolate(value: f64, a: f64, score_a: f64, b: f64, score_b: f64) -> f64 {
    if a == b {
        return score_b;
    }
    let t = (value - a) / (b - a);
    score_a + t * (score_b - score_a)
}

/// Scores a single reading against its limit set, returning a value in
/// [0, 100] or `None` when the limit set is not fully configured.
///
/// Incomplete limits mean the parameter is silently excluded from the
/// aggregate rather than corrupting it with a fake zero.
pub fn score_parameter(parameter_code: &str, value: f64, limits: &ParameterLimits) -> Option<f64> {
    if !limits.is_complete() {
        return None;
    }

    let ParameterLimits {
        safe_limit: safe,
        moderate_limit: moderate,
        high_limit: high,
        critical_limit: critical,
    } = *limits;

    let score = match curve_for(parameter_code) {
        CurveKind::RangeBand => {
            // Safe zone is the inclusive [safe, moderate] band; outside it the
            // score decays in discrete steps with distance from the band.
            if value >= safe && value <= moderate {
                100.0
            } else {
                let distance = if value < safe { safe - value } else { value - moderate };
                if distance <= 0.5 {
                    85.0
                } else if distance <= 1.0 {
                    70.0
                } else if distance <= 1.5 {
                    50.0
                } else if distance <= 2.0 {
                    30.0
                } else {
                    0.0
                }
            }
        }
        CurveKind::DescendingThresholds => {
            if value >= safe {
                100.0
            } else if value >= moderate {
                interpolate(value, moderate, 75.0, safe, 100.0)
            } else if value >= high {
                interpolate(value, high, 50.0, moderate, 75.0)
            } else if value >= critical {
                interpolate(value, critical, 25.0, high, 50.0)
            } else {
                0.0
            }
        }
        CurveKind::AscendingThresholds => {
            if value <= safe {
                100.0
            } else if value <= moderate {
                interpolate(value, safe, 100.0, moderate, 75.0)
            } else if value <= high {
                interpolate(value, moderate, 75.0, high, 50.0)
            } else if value <= critical {
                interpolate(value, high, 50.0, critical, 25.0)
            } else {
                0.0
            }
        }
    };

    // Guards against misconfigured limit tables producing out-of-range scores.
    Some(score.clamp(0.0, 100.0))
}

pub fn category_for(score: f64) -> QualityCategory {
    if score >= 90.0 {
        QualityCategory::Excellent
    } else if score >= 70.0 {
        QualityCategory::Good
    } else if score >= 50.0 {
        QualityCategory::Fair
    } else if score >= 25.0 {
        QualityCategory::Poor
    } else {
        QualityCategory::Critical
    }
}

pub fn risk_level_for(score: f64) -> RiskLevel {
    if score >= 80.0 {
        RiskLevel::Low
    } else if score >= 60.0 {
        RiskLevel::Medium
    } else if score >= 40.0 {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

/// Running (sum, count) accumulator over per-reading scores.
///
/// Keeps incorporation of a new score O(1) instead of re-averaging a
/// materialized list.
#[derive(Debug, Default)]
pub struct ScoreAccumulator {
    sum: f64,
    count: usize,
}

impl ScoreAccumulator {
    pub fn add(&mut self, score: f64) {
        self.sum += score;
        self.count += 1;
    }

    pub fn finish(&self) -> AggregateIndex {
        if self.count == 0 {
            return AggregateIndex {
                score: None,
                category: None,
                risk_level: None,
                parameters_used: 0,
            };
        }
        let mean = self.sum / self.count as f64;
        let score = (mean * 100.0).round() / 100.0;
        AggregateIndex {
            score: Some(score),
            category: Some(category_for(score)),
            risk_level: Some(risk_level_for(score)),
            parameters_used: self.count,
        }
    }
}

/// Reduces a set of readings into one aggregate index.
///
/// Readings with non-finite values or incomplete limit sets do not
/// contribute and do not count toward `parameters_used`. An empty
/// contribution yields the all-`None` index, which is distinct from a
/// zero score.
pub fn classify(readings: &[ReadingRecord]) -> AggregateIndex {
    let mut acc = ScoreAccumulator::default();

    for reading in readings {
        if !reading.value.is_finite() {
            continue;
        }
        let Some(limits) = reading.limits() else {
            continue;
        };
        if let Some(score) = score_parameter(&reading.parameter_code, reading.value, &limits) {
            acc.add(score);
        }
    }

    acc.finish()
}

/// Groups readings by location and classifies each group, worst score first.
pub fn score_locations(readings: &[ReadingRecord]) -> Vec<LocationIndex> {
    let mut grouped: std::collections::HashMap<Uuid, (String, Vec<ReadingRecord>)> =
        std::collections::HashMap::new();

    for reading in readings.iter() {
        let entry = grouped
            .entry(reading.location_id)
            .or_insert_with(|| (reading.location_name.clone(), Vec::new()));
        entry.1.push(reading.clone());
    }

    let mut indexes: Vec<LocationIndex> = grouped
        .into_iter()
        .map(|(location_id, (location_name, group))| LocationIndex {
            location_id,
            location_name,
            index: classify(&group),
        })
        .collect();

    indexes.sort_by(|a, b| match (a.index.score, b.index.score) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.location_name.cmp(&b.location_name),
    });
    indexes
}
