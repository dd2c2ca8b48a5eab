use crate::prelude::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VibrationPattern {
    Normal,
    Impact,
    Continuous,
    Irregular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThermalSignature {
    Human,
    Fire,
    Machine,
    Ambient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioPattern {
    Metallic,
    Impact,
    Grinding,
    Normal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VibrationReading {
    pub sensor_id: String,
    pub frequency: f64,
    pub amplitude: f64,
    pub pattern: VibrationPattern,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermalReading {
    pub sensor_id: String,
    pub max_temp: f64,
    pub avg_temp: f64,
    pub hotspot_area: f64,
    pub signature: ThermalSignature,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioReading {
    pub sensor_id: String,
    pub frequency: f64,
    pub amplitude: f64,
    pub pattern: AudioPattern,
    pub timestamp: Timestamp,
}

/// Append-only batch of synthetic telemetry, grouped by modality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingSet {
    pub vibration: Vec<VibrationReading>,
    pub thermal: Vec<ThermalReading>,
    pub audio: Vec<AudioReading>,
}

impl ReadingSet {
    pub fn extend(&mut self, other: ReadingSet) {
        self.vibration.extend(other.vibration);
        self.thermal.extend(other.thermal);
        self.audio.extend(other.audio);
    }

    pub fn len(&self) -> usize {
        self.vibration.len() + self.thermal.len() + self.audio.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.vibration.clear();
        self.thermal.clear();
        self.audio.clear();
    }
}
