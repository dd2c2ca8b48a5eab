pub mod definition;
pub mod input;

pub use definition::{AnomalyDefinition, AnomalyKind, InputField, ANOMALY_DEFINITIONS};
pub use input::{AnomalyInputValues, InputKey};
