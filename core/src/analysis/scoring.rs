use crate::model::Severity;

/// Maps intensity onto `[0.5, 1.0]`; a placed anomaly never scores below 0.5.
pub fn risk_score(intensity: f64) -> f64 {
    0.5 + intensity * 0.5
}

pub fn severity_for(intensity: f64) -> (f64, Severity) {
    let score = risk_score(intensity);
    (score, Severity::from_risk(score))
}
