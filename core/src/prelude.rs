use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic coordinate, serialized as a `[lat, lng]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Planar distance in degree space. Only meaningful over a small area.
    pub fn planar_distance(&self, other: &LatLng) -> f64 {
        ((self.lat - other.lat).powi(2) + (self.lng - other.lng).powi(2)).sqrt()
    }

    /// Point at fraction `t` along the straight segment towards `other`.
    pub fn lerp(&self, other: &LatLng, t: f64) -> LatLng {
        LatLng {
            lat: self.lat + (other.lat - self.lat) * t,
            lng: self.lng + (other.lng - self.lng) * t,
        }
    }
}

impl From<[f64; 2]> for LatLng {
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(point: LatLng) -> Self {
        [point.lat, point.lng]
    }
}

/// Wall-clock timestamp used on every generated record.
pub type Timestamp = DateTime<Utc>;

pub fn now() -> Timestamp {
    Utc::now()
}

/// Short uppercase identifier suffix, e.g. `3F9A1C0B2D7E`.
pub(crate) fn short_id() -> String {
    let raw = uuid::Uuid::new_v4().simple().to_string();
    raw[..12].to_ascii_uppercase()
}

/// Common error type for the simulation core.
#[derive(thiserror::Error, Debug)]
pub enum SimError {
    #[error("input {field} = {value} outside [{min}, {max}]")]
    InputOutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("unknown station code: {0}")]
    UnknownStation(String),
    #[error("storage failure: {0}")]
    Storage(#[from] std::io::Error),
    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("backend failure: {0}")]
    Backend(String),
    #[error("analysis failure: {0}")]
    Analysis(String),
}

pub type SimResult<T> = Result<T, SimError>;
