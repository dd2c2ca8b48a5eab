//! Mock analysis pipeline: sensor resolution, risk scoring, record synthesis.

pub mod messages;
pub mod readings;
pub mod scoring;
pub mod service;

pub use readings::generate_readings;
pub use scoring::risk_score;
pub use service::{AnalysisResponse, AnalysisService, MockAnalysisService, RouteSelection};
