//! Registry of monitored water quality parameters.
//!
//! Single source of truth for parameter codes, units, curve selection,
//! and the default limit tiers used by `db::seed`. Curve selection must
//! go through `curve_for` so a newly added higher-is-better parameter
//! only needs a registry entry, not new branching in the scorer.

use crate::models::ParameterLimits;

pub const PARAM_PH: &str = "pH";
pub const PARAM_DO: &str = "DO";

/// Scoring curve variants, keyed by parameter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    /// The safe zone is the inclusive [safe, moderate] band (pH).
    RangeBand,
    /// Higher values are better; tiers descend from safe to critical (DO).
    DescendingThresholds,
    /// Lower values are better; tiers ascend from safe to critical.
    AscendingThresholds,
}

/// Metadata for a single monitored parameter.
pub struct Parameter {
    pub code: &'static str,
    pub name: &'static str,
    pub unit: &'static str,
    pub curve: CurveKind,
    /// Default limit tiers, loaded into the limits table by `db::seed`.
    /// Operators may override them there; the registry values are a
    /// reasonable starting point for surface water monitoring.
    pub default_limits: ParameterLimits,
}

pub static PARAMETER_REGISTRY: &[Parameter] = &[
    Parameter {
        code: PARAM_PH,
        name: "pH",
        unit: "",
        curve: CurveKind::RangeBand,
        default_limits: ParameterLimits {
            safe_limit: 6.5,
            moderate_limit: 8.5,
            high_limit: 9.5,
            critical_limit: 11.0,
        },
    },
    Parameter {
        code: PARAM_DO,
        name: "Dissolved Oxygen",
        unit: "mg/L",
        curve: CurveKind::DescendingThresholds,
        default_limits: ParameterLimits {
            safe_limit: 6.0,
            moderate_limit: 4.0,
            high_limit: 2.0,
            critical_limit: 1.0,
        },
    },
    Parameter {
        code: "BOD",
        name: "Biochemical Oxygen Demand",
        unit: "mg/L",
        curve: CurveKind::AscendingThresholds,
        default_limits: ParameterLimits {
            safe_limit: 3.0,
            moderate_limit: 6.0,
            high_limit: 10.0,
            critical_limit: 15.0,
        },
    },
    Parameter {
        code: "TDS",
        name: "Total Dissolved Solids",
        unit: "mg/L",
        curve: CurveKind::AscendingThresholds,
        default_limits: ParameterLimits {
            safe_limit: 500.0,
            moderate_limit: 1000.0,
            high_limit: 1500.0,
            critical_limit: 2000.0,
        },
    },
    Parameter {
        code: "turbidity",
        name: "Turbidity",
        unit: "NTU",
        curve: CurveKind::AscendingThresholds,
        default_limits: ParameterLimits {
            safe_limit: 5.0,
            moderate_limit: 10.0,
            high_limit: 50.0,
            critical_limit: 100.0,
        },
    },
    Parameter {
        code: "nitrate",
        name: "Nitrate",
        unit: "mg/L",
        curve: CurveKind::AscendingThresholds,
        default_limits: ParameterLimits {
            safe_limit: 10.0,
            moderate_limit: 20.0,
            high_limit: 45.0,
            critical_limit: 100.0,
        },
    },
];

/// Looks up a parameter by code. Returns `None` if not registered.
pub fn find_parameter(code: &str) -> Option<&'static Parameter> {
    PARAMETER_REGISTRY.iter().find(|p| p.code == code)
}

/// Selects the scoring curve for a parameter code.
///
/// Unregistered parameters fall back to lower-is-better, the common
/// shape for pollutant concentrations.
pub fn curve_for(code: &str) -> CurveKind {
    find_parameter(code)
        .map(|p| p.curve)
        .unwrap_or(CurveKind::AscendingThresholds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_duplicate_parameter_codes() {
        let mut seen = std::collections::HashSet::new();
        for parameter in PARAMETER_REGISTRY {
            assert!(
                seen.insert(parameter.code),
                "duplicate parameter code '{}' in PARAMETER_REGISTRY",
                parameter.code
            );
        }
    }

    #[test]
    fn curve_selection_matches_reference_parameters() {
        assert_eq!(curve_for(PARAM_PH), CurveKind::RangeBand);
        assert_eq!(curve_for(PARAM_DO), CurveKind::DescendingThresholds);
        assert_eq!(curve_for("BOD"), CurveKind::AscendingThresholds);
    }

    #[test]
    fn unknown_parameters_default_to_lower_is_better() {
        assert_eq!(curve_for("coliform"), CurveKind::AscendingThresholds);
    }

    #[test]
    fn default_limits_are_ordered_for_their_curve() {
        // A tier ordering that disagrees with the curve direction would
        // make the scorer hand out wrong interpolation anchors.
        for parameter in PARAMETER_REGISTRY {
            let l = &parameter.default_limits;
            match parameter.curve {
                CurveKind::AscendingThresholds => {
                    assert!(
                        l.safe_limit < l.moderate_limit
                            && l.moderate_limit < l.high_limit
                            && l.high_limit < l.critical_limit,
                        "tiers for '{}' must ascend",
                        parameter.code
                    );
                }
                CurveKind::DescendingThresholds => {
                    assert!(
                        l.safe_limit > l.moderate_limit
                            && l.moderate_limit > l.high_limit
                            && l.high_limit > l.critical_limit,
                        "tiers for '{}' must descend",
                        parameter.code
                    );
                }
                CurveKind::RangeBand => {
                    assert!(
                        l.safe_limit < l.moderate_limit,
                        "band for '{}' must have safe below moderate",
                        parameter.code
                    );
                }
            }
        }
    }

    #[test]
    fn default_limits_are_finite() {
        for parameter in PARAMETER_REGISTRY {
            assert!(
                parameter.default_limits.is_complete(),
                "default limits for '{}' must be finite",
                parameter.code
            );
        }
    }

    #[test]
    fn find_parameter_returns_registered_entry() {
        let parameter = find_parameter("TDS").expect("TDS should be registered");
        assert_eq!(parameter.unit, "mg/L");
        assert!(find_parameter("unknown").is_none());
    }
}
