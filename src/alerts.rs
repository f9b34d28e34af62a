//! Threshold breach evaluation for alert derivation.
//!
//! Decides whether a single reading should fire an alert and at what
//! severity, using the same limit tables and curve selection as the
//! scorer. A reading that cannot be scored cannot alert either.

use crate::models::{ParameterLimits, ReadingRecord};
use crate::parameters::{curve_for, CurveKind};

/// Breach severities, in ascending order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Advisory,
    Moderate,
    High,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Advisory => "advisory",
            AlertSeverity::Moderate => "moderate",
            AlertSeverity::High => "high",
            AlertSeverity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An alert derived from one reading breaching its thresholds.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Alert {
    pub location_name: String,
    pub parameter_code: String,
    pub severity: AlertSeverity,
    pub message: String,
}

/// Evaluates one reading against its limit set.
///
/// Returns `None` when the reading is inside its safe zone, when the
/// value is not finite, or when the limit set is incomplete.
pub fn evaluate_reading(reading: &ReadingRecord) -> Option<Alert> {
    if !reading.value.is_finite() {
        return None;
    }
    let limits = reading.limits().filter(ParameterLimits::is_complete)?;
    let curve = curve_for(&reading.parameter_code);
    let severity = breach_severity(curve, reading.value, &limits)?;

    Some(Alert {
        location_name: reading.location_name.clone(),
        parameter_code: reading.parameter_code.clone(),
        severity,
        message: breach_message(reading, curve, severity, &limits),
    })
}

/// Evaluates a reading set and returns the alerts, most severe first.
pub fn evaluate_all(readings: &[ReadingRecord]) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = readings.iter().filter_map(evaluate_reading).collect();
    alerts.sort_by(|a, b| b.severity.cmp(&a.severity));
    alerts
}

fn breach_severity(curve: CurveKind, value: f64, limits: &ParameterLimits) -> Option<AlertSeverity> {
    match curve {
        CurveKind::AscendingThresholds => {
            if value > limits.critical_limit {
                Some(AlertSeverity::Critical)
            } else if value > limits.high_limit {
                Some(AlertSeverity::High)
            } else if value > limits.moderate_limit {
                Some(AlertSeverity::Moderate)
            } else if value > limits.safe_limit {
                Some(AlertSeverity::Advisory)
            } else {
                None
            }
        }
        CurveKind::DescendingThresholds => {
            if value < limits.critical_limit {
                Some(AlertSeverity::Critical)
            } else if value < limits.high_limit {
                Some(AlertSeverity::High)
            } else if value < limits.moderate_limit {
                Some(AlertSeverity::Moderate)
            } else if value < limits.safe_limit {
                Some(AlertSeverity::Advisory)
            } else {
                None
            }
        }
        CurveKind::RangeBand => {
            if value >= limits.safe_limit && value <= limits.moderate_limit {
                return None;
            }
            // Same distance tiers as the scorer's step decay.
            let distance = band_distance(value, limits);
            if distance <= 0.5 {
                Some(AlertSeverity::Advisory)
            } else if distance <= 1.0 {
                Some(AlertSeverity::Moderate)
            } else if distance <= 1.5 {
                Some(AlertSeverity::High)
            } else {
                Some(AlertSeverity::Critical)
            }
        }
    }
}

fn band_distance(value: f64, limits: &ParameterLimits) -> f64 {
    if value < limits.safe_limit {
        limits.safe_limit - value
    } else {
        value - limits.moderate_limit
    }
}

fn breach_message(
    reading: &ReadingRecord,
    curve: CurveKind,
    severity: AlertSeverity,
    limits: &ParameterLimits,
) -> String {
    let unit = if reading.unit.is_empty() {
        String::new()
    } else {
        format!(" {}", reading.unit)
    };

    match curve {
        CurveKind::AscendingThresholds => {
            let (tier, limit) = breached_tier(severity, limits);
            format!(
                "{} {:.2}{} at {} exceeds the {} limit of {:.2}",
                reading.parameter_code, reading.value, unit, reading.location_name, tier, limit
            )
        }
        CurveKind::DescendingThresholds => {
            let (tier, limit) = breached_tier(severity, limits);
            format!(
                "{} {:.2}{} at {} fell below the {} limit of {:.2}",
                reading.parameter_code, reading.value, unit, reading.location_name, tier, limit
            )
        }
        CurveKind::RangeBand => format!(
            "{} {:.2}{} at {} is {:.2} outside the safe band {:.2} to {:.2}",
            reading.parameter_code,
            reading.value,
            unit,
            reading.location_name,
            band_distance(reading.value, limits),
            limits.safe_limit,
            limits.moderate_limit
        ),
    }
}

fn breached_tier(severity: AlertSeverity, limits: &ParameterLimits) -> (&'static str, f64) {
    match severity {
        AlertSeverity::Critical => ("critical", limits.critical_limit),
        AlertSeverity::High => ("high", limits.high_limit),
        AlertSeverity::Moderate => ("moderate", limits.moderate_limit),
        AlertSeverity::Advisory => ("safe", limits.safe_limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn reading(
        parameter_code: &str,
        value: f64,
        tiers: (f64, f64, f64, f64),
    ) -> ReadingRecord {
        ReadingRecord {
            location_id: Uuid::from_u128(1),
            location_name: "Riverside Intake".to_string(),
            parameter_code: parameter_code.to_string(),
            unit: "mg/L".to_string(),
            value,
            measured_at: NaiveDate::from_ymd_opt(2026, 3, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            safe_limit: Some(tiers.0),
            moderate_limit: Some(tiers.1),
            high_limit: Some(tiers.2),
            critical_limit: Some(tiers.3),
        }
    }

    const BOD: (f64, f64, f64, f64) = (3.0, 6.0, 10.0, 15.0);
    const DO: (f64, f64, f64, f64) = (6.0, 4.0, 2.0, 1.0);
    const PH: (f64, f64, f64, f64) = (6.5, 8.5, 9.5, 11.0);

    #[test]
    fn reading_within_safe_zone_fires_no_alert() {
        assert_eq!(evaluate_reading(&reading("BOD", 2.5, BOD)), None);
        assert_eq!(evaluate_reading(&reading("DO", 7.0, DO)), None);
        assert_eq!(evaluate_reading(&reading("pH", 7.2, PH)), None);
    }

    #[test]
    fn ascending_breaches_map_to_exceeded_tier() {
        let cases = [
            (4.0, AlertSeverity::Advisory),
            (8.0, AlertSeverity::Moderate),
            (12.0, AlertSeverity::High),
            (16.0, AlertSeverity::Critical),
        ];
        for (value, expected) in cases {
            let alert = evaluate_reading(&reading("BOD", value, BOD)).expect("should alert");
            assert_eq!(alert.severity, expected, "BOD value {value}");
        }
    }

    #[test]
    fn descending_breaches_map_to_undershot_tier() {
        let cases = [
            (5.0, AlertSeverity::Advisory),
            (3.5, AlertSeverity::Moderate),
            (1.5, AlertSeverity::High),
            (0.5, AlertSeverity::Critical),
        ];
        for (value, expected) in cases {
            let alert = evaluate_reading(&reading("DO", value, DO)).expect("should alert");
            assert_eq!(alert.severity, expected, "DO value {value}");
        }
    }

    #[test]
    fn range_band_breaches_follow_distance_tiers() {
        let cases = [
            (9.0, AlertSeverity::Advisory),
            (9.5, AlertSeverity::Moderate),
            (10.0, AlertSeverity::High),
            (11.0, AlertSeverity::Critical),
            (4.0, AlertSeverity::Critical),
        ];
        for (value, expected) in cases {
            let alert = evaluate_reading(&reading("pH", value, PH)).expect("should alert");
            assert_eq!(alert.severity, expected, "pH value {value}");
        }
    }

    #[test]
    fn incomplete_limits_or_bad_values_cannot_alert() {
        let mut missing = reading("BOD", 50.0, BOD);
        missing.critical_limit = None;
        assert_eq!(evaluate_reading(&missing), None);

        assert_eq!(evaluate_reading(&reading("BOD", f64::NAN, BOD)), None);
    }

    #[test]
    fn messages_name_the_breached_tier() {
        let alert = evaluate_reading(&reading("BOD", 12.0, BOD)).expect("should alert");
        assert_eq!(
            alert.message,
            "BOD 12.00 mg/L at Riverside Intake exceeds the high limit of 10.00"
        );

        let alert = evaluate_reading(&reading("DO", 1.5, DO)).expect("should alert");
        assert_eq!(
            alert.message,
            "DO 1.50 mg/L at Riverside Intake fell below the high limit of 2.00"
        );
    }

    #[test]
    fn evaluate_all_sorts_most_severe_first() {
        let readings = vec![
            reading("BOD", 4.0, BOD),  // advisory
            reading("DO", 0.5, DO),    // critical
            reading("BOD", 12.0, BOD), // high
        ];
        let alerts = evaluate_all(&readings);
        let severities: Vec<_> = alerts.iter().map(|a| a.severity).collect();
        assert_eq!(
            severities,
            vec![
                AlertSeverity::Critical,
                AlertSeverity::High,
                AlertSeverity::Advisory
            ]
        );
    }
}
