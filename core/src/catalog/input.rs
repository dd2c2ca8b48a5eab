use serde::{Deserialize, Serialize};
use std::fmt;

/// Tunable operator input on an anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputKey {
    Size,
    Weight,
    Temperature,
    Area,
    Frequency,
    Amplitude,
    AudioFrequency,
}

impl InputKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKey::Size => "size",
            InputKey::Weight => "weight",
            InputKey::Temperature => "temperature",
            InputKey::Area => "area",
            InputKey::Frequency => "frequency",
            InputKey::Amplitude => "amplitude",
            InputKey::AudioFrequency => "audioFrequency",
        }
    }
}

impl fmt::Display for InputKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator-supplied values; which fields are set depends on the anomaly kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyInputValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amplitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_frequency: Option<f64>,
}

impl AnomalyInputValues {
    pub fn get(&self, key: InputKey) -> Option<f64> {
        match key {
            InputKey::Size => self.size,
            InputKey::Weight => self.weight,
            InputKey::Temperature => self.temperature,
            InputKey::Area => self.area,
            InputKey::Frequency => self.frequency,
            InputKey::Amplitude => self.amplitude,
            InputKey::AudioFrequency => self.audio_frequency,
        }
    }

    pub fn set(&mut self, key: InputKey, value: f64) {
        let slot = match key {
            InputKey::Size => &mut self.size,
            InputKey::Weight => &mut self.weight,
            InputKey::Temperature => &mut self.temperature,
            InputKey::Area => &mut self.area,
            InputKey::Frequency => &mut self.frequency,
            InputKey::Amplitude => &mut self.amplitude,
            InputKey::AudioFrequency => &mut self.audio_frequency,
        };
        *slot = Some(value);
    }

    pub fn with(mut self, key: InputKey, value: f64) -> Self {
        self.set(key, value);
        self
    }
}
