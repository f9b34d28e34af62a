use chrono::NaiveDateTime;
use uuid::Uuid;

/// Four-tier threshold table for one monitored parameter.
///
/// Tiers are monotonic in the direction appropriate to the parameter's
/// curve: ascending for lower-is-better parameters, descending for
/// higher-is-better ones, and a [safe, moderate] band for pH.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterLimits {
    pub safe_limit: f64,
    pub moderate_limit: f64,
    pub high_limit: f64,
    pub critical_limit: f64,
}

impl ParameterLimits {
    /// True when every tier is a finite number. Readings whose limit set
    /// fails this check are excluded from scoring rather than erroring.
    pub fn is_complete(&self) -> bool {
        self.safe_limit.is_finite()
            && self.moderate_limit.is_finite()
            && self.high_limit.is_finite()
            && self.critical_limit.is_finite()
    }
}

/// One measurement joined with its location and limit metadata, as
/// returned by `db::fetch_latest_readings`.
///
/// The limit fields are `Option` because the limits table is LEFT
/// JOINed: a reading for a parameter with no configured limits still
/// appears here, it just cannot contribute to the index.
#[derive(Debug, Clone)]
pub struct ReadingRecord {
    pub location_id: Uuid,
    pub location_name: String,
    pub parameter_code: String,
    pub unit: String,
    pub value: f64,
    pub measured_at: NaiveDateTime,
    pub safe_limit: Option<f64>,
    pub moderate_limit: Option<f64>,
    pub high_limit: Option<f64>,
    pub critical_limit: Option<f64>,
}

impl ReadingRecord {
    /// Assembles the limit set when all four tiers are configured.
    pub fn limits(&self) -> Option<ParameterLimits> {
        Some(ParameterLimits {
            safe_limit: self.safe_limit?,
            moderate_limit: self.moderate_limit?,
            high_limit: self.high_limit?,
            critical_limit: self.critical_limit?,
        })
    }
}

/// Five-band quality classification of an aggregate score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityCategory {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl QualityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityCategory::Excellent => "excellent",
            QualityCategory::Good => "good",
            QualityCategory::Fair => "fair",
            QualityCategory::Poor => "poor",
            QualityCategory::Critical => "critical",
        }
    }
}

impl std::fmt::Display for QualityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse risk classification used to drive alerting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The combined water quality index for one set of readings.
///
/// `category` and `risk_level` are present exactly when `score` is;
/// all three are `None` when no reading contributed.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AggregateIndex {
    pub score: Option<f64>,
    pub category: Option<QualityCategory>,
    pub risk_level: Option<RiskLevel>,
    pub parameters_used: usize,
}

/// One location's aggregate index, for listing and serialization.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LocationIndex {
    pub location_id: Uuid,
    pub location_name: String,
    #[serde(flatten)]
    pub index: AggregateIndex,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_require_all_four_tiers() {
        let record = ReadingRecord {
            location_id: Uuid::from_u128(1),
            location_name: "Riverside Intake".to_string(),
            parameter_code: "BOD".to_string(),
            unit: "mg/L".to_string(),
            value: 4.0,
            measured_at: chrono::NaiveDate::from_ymd_opt(2026, 3, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            safe_limit: Some(3.0),
            moderate_limit: Some(6.0),
            high_limit: None,
            critical_limit: Some(15.0),
        };
        assert!(record.limits().is_none());

        let mut complete = record.clone();
        complete.high_limit = Some(10.0);
        assert_eq!(
            complete.limits(),
            Some(ParameterLimits {
                safe_limit: 3.0,
                moderate_limit: 6.0,
                high_limit: 10.0,
                critical_limit: 15.0,
            })
        );
    }

    #[test]
    fn is_complete_rejects_non_finite_tiers() {
        let limits = ParameterLimits {
            safe_limit: 3.0,
            moderate_limit: f64::NAN,
            high_limit: 10.0,
            critical_limit: 15.0,
        };
        assert!(!limits.is_complete());
    }

    #[test]
    fn aggregate_index_serializes_with_reference_field_names() {
        let index = AggregateIndex {
            score: Some(75.0),
            category: Some(QualityCategory::Good),
            risk_level: Some(RiskLevel::Medium),
            parameters_used: 2,
        };
        let json = serde_json::to_value(&index).unwrap();
        assert_eq!(json["score"], 75.0);
        assert_eq!(json["category"], "good");
        assert_eq!(json["risk_level"], "medium");
        assert_eq!(json["parameters_used"], 2);
    }

    #[test]
    fn null_index_serializes_nulls_not_zeroes() {
        let index = AggregateIndex {
            score: None,
            category: None,
            risk_level: None,
            parameters_used: 0,
        };
        let json = serde_json::to_value(&index).unwrap();
        assert!(json["score"].is_null());
        assert!(json["category"].is_null());
        assert!(json["risk_level"].is_null());
    }
}
