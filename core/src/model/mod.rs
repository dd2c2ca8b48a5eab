pub mod alert;
pub mod anomaly;
pub mod detection;
pub mod reading;

pub use alert::{Severity, SimulationAlert};
pub use anomaly::SimulatedAnomaly;
pub use detection::Detection;
pub use reading::{
    AudioPattern, AudioReading, ReadingSet, ThermalReading, ThermalSignature, VibrationPattern,
    VibrationReading,
};
