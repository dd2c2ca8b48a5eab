use crate::catalog::{AnomalyInputValues, AnomalyKind};
use crate::prelude::{now, short_id, LatLng, SimResult, Timestamp};
use crate::registry::SensorKind;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Lower bound of the intensity drawn for a freshly placed anomaly.
pub const MIN_PLACED_INTENSITY: f64 = 0.7;

/// User-placed event instance. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedAnomaly {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    pub position: LatLng,
    pub intensity: f64,
    pub detected_by: Vec<SensorKind>,
    pub timestamp: Timestamp,
    pub description: String,
    pub resolved: bool,
    pub input_values: AnomalyInputValues,
}

impl SimulatedAnomaly {
    /// Validates `inputs` against the catalog and creates the anomaly with an
    /// intensity in `[0.7, 1.0)` drawn from `rng`.
    pub fn place<R: Rng + ?Sized>(
        kind: AnomalyKind,
        position: LatLng,
        inputs: AnomalyInputValues,
        rng: &mut R,
    ) -> SimResult<Self> {
        let definition = kind.definition();
        definition.validate(&inputs)?;
        let intensity = MIN_PLACED_INTENSITY + rng.gen::<f64>() * (1.0 - MIN_PLACED_INTENSITY);
        Ok(Self::with_intensity(kind, position, inputs, intensity))
    }

    /// Builds an anomaly with an explicit intensity. No input validation.
    pub fn with_intensity(
        kind: AnomalyKind,
        position: LatLng,
        inputs: AnomalyInputValues,
        intensity: f64,
    ) -> Self {
        let definition = kind.definition();
        Self {
            id: format!("AN-{}", short_id()),
            kind,
            position,
            intensity,
            detected_by: definition.detected_by.to_vec(),
            timestamp: now(),
            description: definition.description.to_string(),
            resolved: false,
            input_values: inputs,
        }
    }
}
