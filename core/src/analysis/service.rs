use crate::analysis::messages::pick_message;
use crate::analysis::scoring::severity_for;
use crate::config::SimulationConfig;
use crate::model::{Detection, Severity, SimulatedAnomaly, SimulationAlert};
use crate::prelude::{now, short_id, SimResult};
use crate::registry::{SensorNode, SensorRegistry};
use crate::telemetry::LogManager;
use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;

/// Station pair the operator selected before placing anomalies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSelection {
    pub from: String,
    pub to: String,
}

impl RouteSelection {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Outcome of analysing one anomaly. Empty sensor lists are a valid result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub anomaly_id: String,
    pub severity: Severity,
    pub risk_score: f64,
    pub detecting_sensors: Vec<String>,
    pub analysis: String,
    pub alerts: Vec<SimulationAlert>,
    pub detections: Vec<Detection>,
}

#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(
        &self,
        anomaly: &SimulatedAnomaly,
        route: Option<&RouteSelection>,
    ) -> SimResult<AnalysisResponse>;

    /// Registry used to resolve sensor ids in a response.
    fn registry(&self) -> &SensorRegistry;
}

/// Client-side stand-in for the analysis backend.
pub struct MockAnalysisService {
    registry: SensorRegistry,
    rng: Mutex<StdRng>,
    delay_ms: (u64, u64),
    max_sensors: usize,
    logger: LogManager,
}

impl MockAnalysisService {
    pub fn new(config: &SimulationConfig, registry: SensorRegistry) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            registry,
            rng: Mutex::new(rng),
            delay_ms: config.analysis_delay_bounds(),
            max_sensors: config.max_detecting_sensors,
            logger: LogManager::new(LogManager::ANALYSIS),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut guard = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    /// Route sensors take precedence; otherwise the nearest sensor of each
    /// detecting kind. Truncated to the configured cap.
    pub fn resolve_sensors(
        &self,
        anomaly: &SimulatedAnomaly,
        route: Option<&RouteSelection>,
    ) -> Vec<SensorNode> {
        let mut resolved: Vec<SensorNode> = match route {
            Some(route) => self
                .registry
                .sensors_by_track(&route.from, &route.to)
                .into_iter()
                .filter(|s| s.is_active())
                .copied()
                .collect(),
            None => Vec::new(),
        };

        if resolved.is_empty() {
            for kind in &anomaly.detected_by {
                if let Some(nearest) = self.registry.find_nearest(anomaly.position, Some(*kind)) {
                    if !resolved.iter().any(|s| s.id == nearest.id) {
                        resolved.push(*nearest);
                    }
                }
            }
        }

        resolved.truncate(self.max_sensors);
        resolved
    }

    /// Builds the response without the artificial latency.
    pub fn compose(
        &self,
        anomaly: &SimulatedAnomaly,
        route: Option<&RouteSelection>,
    ) -> AnalysisResponse {
        let sensors = self.resolve_sensors(anomaly, route);
        let (risk_score, severity) = severity_for(anomaly.intensity);
        let analysis = self.with_rng(|rng| pick_message(anomaly.kind, rng)).to_string();
        let timestamp = now();
        let batch = short_id();

        let alerts = sensors
            .iter()
            .map(|sensor| SimulationAlert {
                id: format!("ALT-{}-{}", batch, sensor.id),
                anomaly_id: anomaly.id.clone(),
                severity,
                message: format!("{} - {}", analysis, sensor.details),
                sensor_id: sensor.id.to_string(),
                sensor_type: sensor.kind,
                timestamp,
                acknowledged: false,
            })
            .collect();

        let detections = sensors
            .iter()
            .map(|sensor| Detection {
                id: format!("DET-{}-{}", batch, sensor.id),
                anomaly_id: anomaly.id.clone(),
                sensor_id: sensor.id.to_string(),
                sensor_type: sensor.kind,
                timestamp,
                risk_score,
                analysis: analysis.clone(),
            })
            .collect();

        AnalysisResponse {
            anomaly_id: anomaly.id.clone(),
            severity,
            risk_score,
            detecting_sensors: sensors.iter().map(|s| s.id.to_string()).collect(),
            analysis,
            alerts,
            detections,
        }
    }
}

#[async_trait]
impl AnalysisService for MockAnalysisService {
    async fn analyze(
        &self,
        anomaly: &SimulatedAnomaly,
        route: Option<&RouteSelection>,
    ) -> SimResult<AnalysisResponse> {
        let (min, max) = self.delay_ms;
        let delay = if max == 0 {
            0
        } else {
            self.with_rng(|rng| rng.gen_range(min..=max))
        };
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let response = self.compose(anomaly, route);
        self.logger.record(&format!(
            "anomaly {} ({}) -> {} sensor(s), risk {:.3}, {}",
            anomaly.id,
            anomaly.kind,
            response.detecting_sensors.len(),
            response.risk_score,
            response.severity
        ));
        Ok(response)
    }

    fn registry(&self) -> &SensorRegistry {
        &self.registry
    }
}
