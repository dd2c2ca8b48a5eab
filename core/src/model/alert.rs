use crate::prelude::Timestamp;
use crate::registry::SensorKind;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const CRITICAL_RISK_THRESHOLD: f64 = 0.85;
pub const WARNING_RISK_THRESHOLD: f64 = 0.65;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    /// Thresholds are exclusive: a score sitting on a boundary takes the lower tier.
    pub fn from_risk(risk_score: f64) -> Self {
        if risk_score > CRITICAL_RISK_THRESHOLD {
            Severity::Critical
        } else if risk_score > WARNING_RISK_THRESHOLD {
            Severity::Warning
        } else {
            Severity::Info
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One alert per (anomaly, detecting sensor) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationAlert {
    pub id: String,
    pub anomaly_id: String,
    pub severity: Severity,
    pub message: String,
    pub sensor_id: String,
    pub sensor_type: SensorKind,
    pub timestamp: Timestamp,
    pub acknowledged: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_fall_to_lower_tier() {
        assert_eq!(Severity::from_risk(0.85), Severity::Warning);
        assert_eq!(Severity::from_risk(0.65), Severity::Info);
        assert_eq!(Severity::from_risk(0.850001), Severity::Critical);
        assert_eq!(Severity::from_risk(0.650001), Severity::Warning);
        assert_eq!(Severity::from_risk(0.5), Severity::Info);
    }

    #[test]
    fn severity_is_uppercase_on_the_wire() {
        assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), "\"CRITICAL\"");
    }
}
