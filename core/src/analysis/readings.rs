use crate::catalog::AnomalyKind;
use crate::model::{
    AudioPattern, AudioReading, ReadingSet, SimulatedAnomaly, ThermalReading, ThermalSignature,
    VibrationPattern, VibrationReading,
};
use crate::prelude::now;
use crate::registry::{SensorKind, SensorNode};

const DEFAULT_FREQUENCY_HZ: f64 = 142.0;
const DEFAULT_AMPLITUDE_MM: f64 = 8.0;
const DEFAULT_TEMPERATURE_C: f64 = 85.0;
const DEFAULT_HOTSPOT_M2: f64 = 2.0;
const FIRE_THRESHOLD_C: f64 = 100.0;

/// Fabricates telemetry rows for the sensors that detected `anomaly`.
pub fn generate_readings(anomaly: &SimulatedAnomaly, sensors: &[SensorNode]) -> ReadingSet {
    let timestamp = now();
    let inputs = &anomaly.input_values;
    let mut readings = ReadingSet::default();

    for sensor in sensors {
        match (sensor.kind, anomaly.kind) {
            (SensorKind::OfcNode, AnomalyKind::Tampering | AnomalyKind::Vibration | AnomalyKind::Obstruction) => {
                readings.vibration.push(VibrationReading {
                    sensor_id: sensor.id.to_string(),
                    frequency: inputs.frequency.unwrap_or(DEFAULT_FREQUENCY_HZ),
                    amplitude: inputs.amplitude.unwrap_or(DEFAULT_AMPLITUDE_MM),
                    pattern: if anomaly.kind == AnomalyKind::Tampering {
                        VibrationPattern::Impact
                    } else {
                        VibrationPattern::Irregular
                    },
                    timestamp,
                });

                if let Some(audio_frequency) = inputs.audio_frequency {
                    readings.audio.push(AudioReading {
                        sensor_id: sensor.id.to_string(),
                        frequency: audio_frequency,
                        amplitude: anomaly.intensity * 10.0,
                        pattern: if anomaly.kind == AnomalyKind::Obstruction {
                            AudioPattern::Impact
                        } else {
                            AudioPattern::Metallic
                        },
                        timestamp,
                    });
                }
            }
            (SensorKind::ThermalCam, AnomalyKind::Thermal) => {
                let max_temp = inputs.temperature.unwrap_or(DEFAULT_TEMPERATURE_C);
                readings.thermal.push(ThermalReading {
                    sensor_id: sensor.id.to_string(),
                    max_temp,
                    avg_temp: max_temp * 0.7,
                    hotspot_area: inputs.area.unwrap_or(DEFAULT_HOTSPOT_M2),
                    signature: if max_temp > FIRE_THRESHOLD_C {
                        ThermalSignature::Fire
                    } else {
                        ThermalSignature::Human
                    },
                    timestamp,
                });
            }
            _ => {}
        }
    }

    readings
}
