use crate::workflow::runner::{PlacementOutcome, Runner};
use drishticore::analysis::{AnalysisResponse, RouteSelection};
use drishticore::catalog::{AnomalyInputValues, AnomalyKind};
use drishticore::model::SimulatedAnomaly;
use drishticore::notify::Notification;
use drishticore::store::{ApplyOutcome, SimulationState};
use drishticore::telemetry::MetricsSnapshot;
use drishticore::LatLng;
use serde::{Deserialize, Serialize};

/// Everything a dashboard needs to re-render, captured in one read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardModel {
    pub state: SimulationState,
    pub notifications: Vec<Notification>,
    pub metrics: MetricsSnapshot,
    pub pending_sync: usize,
}

impl DashboardModel {
    pub fn capture(runner: &Runner) -> Self {
        Self {
            state: runner.store().snapshot(),
            notifications: runner.notifications().notifications(),
            metrics: runner.metrics().snapshot(),
            pending_sync: runner.store().outbox().len(),
        }
    }
}

/// Body of `POST /anomalies`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRequest {
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    pub position: LatLng,
    #[serde(default)]
    pub input_values: Option<AnomalyInputValues>,
    #[serde(default)]
    pub route: Option<RouteSelection>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementView {
    pub anomaly: SimulatedAnomaly,
    pub analysis: Option<AnalysisResponse>,
    pub stale: bool,
}

impl From<PlacementOutcome> for PlacementView {
    fn from(outcome: PlacementOutcome) -> Self {
        Self {
            anomaly: outcome.anomaly,
            analysis: outcome.response,
            stale: matches!(outcome.applied, Some(ApplyOutcome::Stale)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_request_accepts_minimal_body() {
        let req: PlaceRequest =
            serde_json::from_str(r#"{"type":"THERMAL","position":[28.6,77.2]}"#).unwrap();
        assert_eq!(req.kind, AnomalyKind::Thermal);
        assert!(req.input_values.is_none());
        assert!(req.route.is_none());
    }
}
