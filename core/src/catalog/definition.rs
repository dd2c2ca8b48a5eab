use crate::catalog::input::{AnomalyInputValues, InputKey};
use crate::prelude::{SimError, SimResult};
use crate::registry::SensorKind;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyKind {
    Obstruction,
    Tampering,
    Thermal,
    Vibration,
}

impl AnomalyKind {
    pub const ALL: [AnomalyKind; 4] = [
        AnomalyKind::Obstruction,
        AnomalyKind::Tampering,
        AnomalyKind::Thermal,
        AnomalyKind::Vibration,
    ];

    pub fn definition(&self) -> &'static AnomalyDefinition {
        let index = match self {
            AnomalyKind::Obstruction => 0,
            AnomalyKind::Tampering => 1,
            AnomalyKind::Thermal => 2,
            AnomalyKind::Vibration => 3,
        };
        &ANOMALY_DEFINITIONS[index]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyKind::Obstruction => "OBSTRUCTION",
            AnomalyKind::Tampering => "TAMPERING",
            AnomalyKind::Thermal => "THERMAL",
            AnomalyKind::Vibration => "VIBRATION",
        }
    }
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric input exposed to the operator with its allowed range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InputField {
    pub key: InputKey,
    pub label: &'static str,
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl InputField {
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Static display and detection metadata for one anomaly kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyDefinition {
    pub kind: AnomalyKind,
    pub label: &'static str,
    pub description: &'static str,
    pub detected_by: &'static [SensorKind],
    pub color: &'static str,
    pub input_fields: &'static [InputField],
}

impl AnomalyDefinition {
    /// Every input field of this kind set to its default.
    pub fn default_inputs(&self) -> AnomalyInputValues {
        self.input_fields
            .iter()
            .fold(AnomalyInputValues::default(), |values, field| {
                values.with(field.key, field.default)
            })
    }

    pub fn field(&self, key: InputKey) -> Option<&'static InputField> {
        self.input_fields.iter().find(|f| f.key == key)
    }

    /// Rejects any present value that falls outside its field's range.
    /// Values for keys this kind does not declare are left alone.
    pub fn validate(&self, inputs: &AnomalyInputValues) -> SimResult<()> {
        for field in self.input_fields {
            if let Some(value) = inputs.get(field.key) {
                if !field.contains(value) {
                    return Err(SimError::InputOutOfRange {
                        field: field.key.as_str(),
                        value,
                        min: field.min,
                        max: field.max,
                    });
                }
            }
        }
        Ok(())
    }
}

const fn field(key: InputKey, label: &'static str, unit: &'static str, min: f64, max: f64, default: f64) -> InputField {
    InputField {
        key,
        label,
        unit,
        min,
        max,
        default,
    }
}

pub static ANOMALY_DEFINITIONS: [AnomalyDefinition; 4] = [
    AnomalyDefinition {
        kind: AnomalyKind::Obstruction,
        label: "Track Obstruction",
        description: "Rock, debris, or object blocking the track",
        detected_by: &[SensorKind::OfcNode],
        color: "#ef4444",
        input_fields: &[
            field(InputKey::Size, "Size", "m", 0.1, 2.0, 0.5),
            field(InputKey::Weight, "Weight", "kg", 1.0, 500.0, 50.0),
        ],
    },
    AnomalyDefinition {
        kind: AnomalyKind::Tampering,
        label: "Track Tampering",
        description: "Fishplate removal or rail displacement",
        detected_by: &[SensorKind::OfcNode],
        color: "#f59e0b",
        input_fields: &[
            field(InputKey::Frequency, "Vibration Freq", "Hz", 50.0, 200.0, 142.0),
            field(InputKey::Amplitude, "Amplitude", "mm", 1.0, 20.0, 8.0),
        ],
    },
    AnomalyDefinition {
        kind: AnomalyKind::Thermal,
        label: "Thermal Anomaly",
        description: "Fire, heat source, or human presence",
        detected_by: &[SensorKind::ThermalCam],
        color: "#dc2626",
        input_fields: &[
            field(InputKey::Temperature, "Temperature", "°C", 30.0, 200.0, 85.0),
            field(InputKey::Area, "Hotspot Area", "m²", 0.1, 10.0, 2.0),
        ],
    },
    AnomalyDefinition {
        kind: AnomalyKind::Vibration,
        label: "Vibration Pattern",
        description: "Unusual vibration or audio anomaly detected",
        detected_by: &[SensorKind::OfcNode],
        color: "#8b5cf6",
        input_fields: &[
            field(InputKey::Frequency, "Vibration Freq", "Hz", 20.0, 300.0, 85.0),
            field(InputKey::AudioFrequency, "Audio Freq", "Hz", 100.0, 5000.0, 1200.0),
        ],
    },
];
