use std::fmt::Write;

use crate::alerts;
use crate::models::ReadingRecord;
use crate::wqi;

pub fn build_report(location: Option<&str>, readings: &[ReadingRecord]) -> String {
    let indexes = wqi::score_locations(readings);
    let active_alerts = alerts::evaluate_all(readings);

    let mut output = String::new();
    let location_label = location.unwrap_or("all locations");

    let _ = writeln!(output, "# Water Quality Report");
    let _ = writeln!(output, "Generated for {} (latest readings)", location_label);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Water Quality Index");

    if indexes.is_empty() {
        let _ = writeln!(output, "No readings recorded.");
    } else {
        for entry in indexes.iter() {
            match (entry.index.score, entry.index.category, entry.index.risk_level) {
                (Some(score), Some(category), Some(risk_level)) => {
                    let _ = writeln!(
                        output,
                        "- {}: score {:.2} ({}, risk {}) across {} parameters",
                        entry.location_name,
                        score,
                        category,
                        risk_level,
                        entry.index.parameters_used
                    );
                }
                _ => {
                    let _ = writeln!(
                        output,
                        "- {}: no scoreable readings",
                        entry.location_name
                    );
                }
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Active Alerts");

    if active_alerts.is_empty() {
        let _ = writeln!(output, "No active alerts.");
    } else {
        for alert in active_alerts.iter() {
            let _ = writeln!(output, "- [{}] {}", alert.severity, alert.message);
        }
    }

    let mut latest = readings.to_vec();
    latest.sort_by(|a, b| b.measured_at.cmp(&a.measured_at));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Latest Readings");

    if latest.is_empty() {
        let _ = writeln!(output, "No readings recorded.");
    } else {
        for reading in latest.iter() {
            // Non-finite values are excluded from scoring, never shown as zero.
            let score = if reading.value.is_finite() {
                reading.limits().and_then(|limits| {
                    wqi::score_parameter(&reading.parameter_code, reading.value, &limits)
                })
            } else {
                None
            };
            let score_label = score
                .map(|score| format!("score {:.2}", score))
                .unwrap_or_else(|| "unscored".to_string());
            let _ = writeln!(
                output,
                "- {} {} {:.2} {} at {} ({})",
                reading.location_name,
                reading.parameter_code,
                reading.value,
                reading.unit,
                reading.measured_at,
                score_label
            );
        }
    }

    output
}
