use crate::generator::profile::PlacementPlan;
use anyhow::Context;
use drishticore::analysis::{
    generate_readings, AnalysisResponse, AnalysisService, MockAnalysisService, RouteSelection,
};
use drishticore::catalog::{AnomalyInputValues, AnomalyKind, InputKey};
use drishticore::model::SimulatedAnomaly;
use drishticore::notify::{NotificationConnector, NotificationStore};
use drishticore::registry::{station_by_code, SensorNode, SensorRegistry};
use drishticore::store::{
    ApplyOutcome, BackendSync, FileStorage, FlushReport, HttpBackend, MemoryStorage, NullBackend,
    SimulationStore, SnapshotStorage, SyncOutbox,
};
use drishticore::telemetry::{LogManager, MetricsRecorder};
use drishticore::{LatLng, SimError, SimulationConfig};
use rand::{rngs::StdRng, SeedableRng};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Anomaly kind and inputs the operator has staged but not yet placed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPlacement {
    pub kind: AnomalyKind,
    pub inputs: AnomalyInputValues,
}

/// What happened to one placement.
#[derive(Debug, Clone)]
pub struct PlacementOutcome {
    pub anomaly: SimulatedAnomaly,
    /// `None` when analysis failed.
    pub response: Option<AnalysisResponse>,
    pub applied: Option<ApplyOutcome>,
}

/// Orchestrates placement -> analysis -> store for one simulation session.
pub struct Runner {
    store: Arc<SimulationStore>,
    analysis: Arc<dyn AnalysisService>,
    notifications: NotificationStore,
    backend: Arc<dyn BackendSync>,
    metrics: Arc<MetricsRecorder>,
    sync_interval: Duration,
    rng: Mutex<StdRng>,
    pending: Mutex<Option<PendingPlacement>>,
    logger: LogManager,
}

impl Runner {
    /// Wires the default components for `config`. `offline` swaps the HTTP
    /// backend for one that discards sync tasks.
    pub fn from_config(config: &SimulationConfig, offline: bool) -> anyhow::Result<Self> {
        let storage: Arc<dyn SnapshotStorage> = match &config.storage_dir {
            Some(dir) => Arc::new(FileStorage::new(dir)),
            None => Arc::new(MemoryStorage::new()),
        };
        let store = Arc::new(SimulationStore::load(storage, Arc::new(SyncOutbox::new())));
        let analysis = Arc::new(MockAnalysisService::new(config, SensorRegistry::builtin()));
        let backend: Arc<dyn BackendSync> = if offline {
            Arc::new(NullBackend)
        } else {
            Arc::new(HttpBackend::new(config).context("building backend client")?)
        };
        Ok(Self::new(
            config,
            store,
            analysis,
            NotificationStore::new(config),
            backend,
        ))
    }

    pub fn new(
        config: &SimulationConfig,
        store: Arc<SimulationStore>,
        analysis: Arc<dyn AnalysisService>,
        notifications: NotificationStore,
        backend: Arc<dyn BackendSync>,
    ) -> Self {
        NotificationConnector::attach(&store, notifications.clone());
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };
        Self {
            store,
            analysis,
            notifications,
            backend,
            metrics: Arc::new(MetricsRecorder::new()),
            sync_interval: config.sync_interval(),
            rng: Mutex::new(rng),
            pending: Mutex::new(None),
            logger: LogManager::new(LogManager::ANALYSIS),
        }
    }

    fn pending_slot(&self) -> MutexGuard<'_, Option<PendingPlacement>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Stages `kind` with its catalog defaults.
    pub fn select_kind(&self, kind: AnomalyKind) {
        *self.pending_slot() = Some(PendingPlacement {
            kind,
            inputs: kind.definition().default_inputs(),
        });
    }

    pub fn clear_selection(&self) {
        *self.pending_slot() = None;
    }

    pub fn pending(&self) -> Option<PendingPlacement> {
        self.pending_slot().clone()
    }

    /// Edits one staged input. The key must belong to the staged kind.
    pub fn set_input(&self, key: InputKey, value: f64) -> anyhow::Result<()> {
        let mut slot = self.pending_slot();
        let pending = slot.as_mut().context("no anomaly kind selected")?;
        let definition = pending.kind.definition();
        if definition.field(key).is_none() {
            anyhow::bail!("{} has no input {}", pending.kind, key);
        }
        pending.inputs.set(key, value);
        Ok(())
    }

    fn validate_route(route: Option<&RouteSelection>) -> Result<(), SimError> {
        if let Some(route) = route {
            station_by_code(&route.from)?;
            station_by_code(&route.to)?;
        }
        Ok(())
    }

    fn resolve(&self, ids: &[String]) -> Vec<SensorNode> {
        let registry = self.analysis.registry();
        ids.iter()
            .filter_map(|id| registry.sensor_by_id(id).copied())
            .collect()
    }

    /// Places the staged anomaly at `position`. Returns `Ok(None)` when
    /// nothing is staged. The selection is consumed up front, so it is reset
    /// whether the placement succeeds, is rejected, or fails analysis.
    pub async fn place_at(
        &self,
        position: LatLng,
        route: Option<&RouteSelection>,
    ) -> anyhow::Result<Option<PlacementOutcome>> {
        let Some(pending) = self.pending_slot().take() else {
            return Ok(None);
        };
        self.place_pending(pending, position, route).await.map(Some)
    }

    /// Places one planned anomaly without touching the staged selection.
    pub async fn place(
        &self,
        plan: &PlacementPlan,
        route: Option<&RouteSelection>,
    ) -> anyhow::Result<PlacementOutcome> {
        let pending = PendingPlacement {
            kind: plan.kind,
            inputs: plan.inputs,
        };
        self.place_pending(pending, plan.position, route).await
    }

    /// A failed analysis emits no alerts or detections.
    async fn place_pending(
        &self,
        pending: PendingPlacement,
        position: LatLng,
        route: Option<&RouteSelection>,
    ) -> anyhow::Result<PlacementOutcome> {
        Self::validate_route(route).context("validating route selection")?;

        let anomaly = {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            let placed = SimulatedAnomaly::place(pending.kind, position, pending.inputs, &mut *rng);
            placed
        }
        .context("placing anomaly")?;

        let epoch = self.store.add_anomaly(anomaly.clone());

        let outcome = match self.analysis.analyze(&anomaly, route).await {
            Ok(response) => {
                let sensors = self.resolve(&response.detecting_sensors);
                let readings = generate_readings(&anomaly, &sensors);
                let applied = self.store.apply_analysis(epoch, response.clone(), readings);
                match applied {
                    ApplyOutcome::Applied { alerts, .. } => self.metrics.record_analysis(alerts),
                    ApplyOutcome::Stale => self.metrics.record_stale(),
                }
                PlacementOutcome {
                    anomaly,
                    response: Some(response),
                    applied: Some(applied),
                }
            }
            Err(err) => {
                self.logger
                    .failure(&format!("analysis failed for {}: {}", anomaly.id, err));
                self.metrics.record_analysis_error();
                PlacementOutcome {
                    anomaly,
                    response: None,
                    applied: None,
                }
            }
        };
        Ok(outcome)
    }

    pub fn clear_all(&self) {
        self.store.clear_all();
    }

    pub async fn flush(&self) -> FlushReport {
        self.store
            .outbox()
            .flush(self.backend.as_ref(), &self.metrics)
            .await
    }

    pub fn store(&self) -> &Arc<SimulationStore> {
        &self.store
    }

    pub fn notifications(&self) -> &NotificationStore {
        &self.notifications
    }

    pub fn metrics(&self) -> &Arc<MetricsRecorder> {
        &self.metrics
    }

    pub fn registry(&self) -> &SensorRegistry {
        self.analysis.registry()
    }

    pub fn sync_interval(&self) -> Duration {
        self.sync_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use drishticore::model::VibrationPattern;
    use drishticore::SimResult;

    struct FailingAnalysis {
        registry: SensorRegistry,
    }

    #[async_trait]
    impl AnalysisService for FailingAnalysis {
        async fn analyze(
            &self,
            _anomaly: &SimulatedAnomaly,
            _route: Option<&RouteSelection>,
        ) -> SimResult<AnalysisResponse> {
            Err(SimError::Analysis("backend unavailable".into()))
        }

        fn registry(&self) -> &SensorRegistry {
            &self.registry
        }
    }

    fn offline_runner() -> Runner {
        let config = SimulationConfig {
            seed: Some(17),
            ..SimulationConfig::default().without_delay()
        };
        Runner::from_config(&config, true).unwrap()
    }

    #[tokio::test]
    async fn placing_without_selection_is_a_no_op() {
        let runner = offline_runner();
        let outcome = runner.place_at(LatLng::new(28.63, 77.24), None).await.unwrap();
        assert!(outcome.is_none());
        assert!(runner.store().anomalies().is_empty());
    }

    #[tokio::test]
    async fn tampering_near_tilak_bridge_yields_single_pair() {
        let runner = offline_runner();
        runner.select_kind(AnomalyKind::Tampering);
        runner.set_input(InputKey::Frequency, 142.0).unwrap();
        runner.set_input(InputKey::Amplitude, 8.0).unwrap();

        let outcome = runner
            .place_at(LatLng::new(28.6357, 77.2431), None)
            .await
            .unwrap()
            .unwrap();

        let alerts = runner.store().alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].sensor_id, "SN-015");
        assert_eq!(runner.store().detections().len(), 1);
        let readings = runner.store().readings();
        assert_eq!(readings.vibration.len(), 1);
        assert_eq!(readings.vibration[0].pattern, VibrationPattern::Impact);
        assert!(outcome.response.is_some());
        assert!(runner.pending().is_none());
        assert_eq!(runner.notifications().len(), 1);
    }

    #[tokio::test]
    async fn failed_analysis_resets_selection_and_emits_nothing() {
        let config = SimulationConfig::default().without_delay();
        let store = Arc::new(SimulationStore::new(
            Arc::new(MemoryStorage::new()),
            Arc::new(SyncOutbox::new()),
        ));
        let runner = Runner::new(
            &config,
            store,
            Arc::new(FailingAnalysis {
                registry: SensorRegistry::builtin(),
            }),
            NotificationStore::new(&config),
            Arc::new(NullBackend),
        );

        runner.select_kind(AnomalyKind::Thermal);
        let outcome = runner
            .place_at(LatLng::new(28.60, 77.23), None)
            .await
            .unwrap()
            .unwrap();

        assert!(outcome.response.is_none());
        assert!(runner.pending().is_none());
        assert_eq!(runner.store().anomalies().len(), 1);
        assert!(runner.store().alerts().is_empty());
        assert!(runner.store().detections().is_empty());
        assert_eq!(runner.metrics().snapshot().analysis_errors, 1);
    }

    #[tokio::test]
    async fn unknown_route_station_is_rejected() {
        let runner = offline_runner();
        runner.select_kind(AnomalyKind::Obstruction);
        let route = RouteSelection::new("NDLS", "XXX");
        let result = runner.place_at(LatLng::new(28.6, 77.2), Some(&route)).await;
        assert!(result.is_err());
        assert!(runner.pending().is_none());
        assert!(runner.store().anomalies().is_empty());
    }

    #[tokio::test]
    async fn planned_placement_keeps_staged_selection() {
        let runner = offline_runner();
        runner.select_kind(AnomalyKind::Thermal);
        let plan = PlacementPlan {
            kind: AnomalyKind::Obstruction,
            position: LatLng::new(28.6442, 77.2167),
            inputs: AnomalyKind::Obstruction.definition().default_inputs(),
        };

        let outcome = runner.place(&plan, None).await.unwrap();

        assert_eq!(outcome.anomaly.kind, AnomalyKind::Obstruction);
        assert_eq!(runner.pending().unwrap().kind, AnomalyKind::Thermal);
    }

    #[test]
    fn set_input_requires_declared_field() {
        let runner = offline_runner();
        assert!(runner.set_input(InputKey::Size, 1.0).is_err());
        runner.select_kind(AnomalyKind::Thermal);
        assert!(runner.set_input(InputKey::Size, 1.0).is_err());
        runner.set_input(InputKey::Temperature, 120.0).unwrap();
        assert_eq!(runner.pending().unwrap().inputs.temperature, Some(120.0));
    }

    #[tokio::test]
    async fn flush_drains_outbox_offline() {
        let runner = offline_runner();
        runner.select_kind(AnomalyKind::Vibration);
        runner.place_at(LatLng::new(28.6442, 77.2167), None).await.unwrap();
        assert!(!runner.store().outbox().is_empty());
        let report = runner.flush().await;
        assert_eq!(report.failed, 0);
        assert!(report.sent >= 2);
        assert!(runner.store().outbox().is_empty());
    }
}
