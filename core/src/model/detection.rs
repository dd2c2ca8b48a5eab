use crate::prelude::Timestamp;
use crate::registry::SensorKind;
use serde::{Deserialize, Serialize};

/// Per-sensor analysis record carrying the computed risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub id: String,
    pub anomaly_id: String,
    pub sensor_id: String,
    pub sensor_type: SensorKind,
    pub timestamp: Timestamp,
    pub risk_score: f64,
    pub analysis: String,
}
