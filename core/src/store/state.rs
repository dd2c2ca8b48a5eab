use crate::analysis::AnalysisResponse;
use crate::model::{Detection, ReadingSet, SimulatedAnomaly, SimulationAlert};
use crate::prelude::SimError;
use crate::store::outbox::{SyncOutbox, SyncTask};
use crate::store::storage::{PersistedSnapshot, SnapshotStorage, STORAGE_KEY};
use crate::telemetry::LogManager;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Invoked once per newly added alert.
pub type AlertCallback = Arc<dyn Fn(&SimulationAlert) + Send + Sync>;

/// Collections owned by the store. Alerts are most-recent-first; everything
/// else is in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationState {
    pub anomalies: Vec<SimulatedAnomaly>,
    pub alerts: Vec<SimulationAlert>,
    pub detections: Vec<Detection>,
    #[serde(default)]
    pub readings: ReadingSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied { alerts: usize, detections: usize },
    /// The store was cleared after the analysis was dispatched.
    Stale,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotView<'a> {
    anomalies: &'a [SimulatedAnomaly],
    alerts: &'a [SimulationAlert],
    detections: &'a [Detection],
    timestamp: i64,
}

struct Inner {
    state: SimulationState,
    /// Advanced by every `clear_all`.
    epoch: u64,
}

/// Single authoritative holder of the session's simulation state.
///
/// Every mutation is a transition applied under one write lock, followed by a
/// snapshot write. Remote mirroring goes through the outbox and the
/// notification callback always runs after the lock is released.
pub struct SimulationStore {
    inner: RwLock<Inner>,
    callback: RwLock<Option<AlertCallback>>,
    storage: Arc<dyn SnapshotStorage>,
    outbox: Arc<SyncOutbox>,
    logger: LogManager,
}

impl SimulationStore {
    /// Empty store that does not look at existing snapshots.
    pub fn new(storage: Arc<dyn SnapshotStorage>, outbox: Arc<SyncOutbox>) -> Self {
        Self::with_state(SimulationState::default(), storage, outbox)
    }

    /// Restores the persisted snapshot. Missing or unreadable snapshots yield
    /// an empty store.
    pub fn load(storage: Arc<dyn SnapshotStorage>, outbox: Arc<SyncOutbox>) -> Self {
        let logger = LogManager::new(LogManager::STORE);
        let state = match storage.load(STORAGE_KEY) {
            Ok(Some(raw)) => match PersistedSnapshot::decode(&raw) {
                Ok(snapshot) => {
                    logger.record(&format!(
                        "restored {} anomalies, {} alerts, {} detections",
                        snapshot.anomalies.len(),
                        snapshot.alerts.len(),
                        snapshot.detections.len()
                    ));
                    SimulationState {
                        anomalies: snapshot.anomalies,
                        alerts: snapshot.alerts,
                        detections: snapshot.detections,
                        readings: ReadingSet::default(),
                    }
                }
                Err(err) => {
                    logger.trace(&format!("ignoring unreadable snapshot: {}", err));
                    SimulationState::default()
                }
            },
            Ok(None) => SimulationState::default(),
            Err(err) => {
                logger.failure(&format!("snapshot load failed: {}", err));
                SimulationState::default()
            }
        };
        Self::with_state(state, storage, outbox)
    }

    fn with_state(
        state: SimulationState,
        storage: Arc<dyn SnapshotStorage>,
        outbox: Arc<SyncOutbox>,
    ) -> Self {
        Self {
            inner: RwLock::new(Inner { state, epoch: 0 }),
            callback: RwLock::new(None),
            storage,
            outbox,
            logger: LogManager::new(LogManager::STORE),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Applies `update` and persists the result while still holding the lock,
    /// so snapshot writes land in mutation order.
    fn transition<T>(&self, update: impl FnOnce(&mut SimulationState) -> T) -> T {
        let mut inner = self.write();
        let out = update(&mut inner.state);
        self.persist(&inner.state);
        out
    }

    fn persist(&self, state: &SimulationState) {
        let view = SnapshotView {
            anomalies: &state.anomalies,
            alerts: &state.alerts,
            detections: &state.detections,
            timestamp: Utc::now().timestamp_millis(),
        };
        let result = serde_json::to_string(&view)
            .map_err(SimError::from)
            .and_then(|raw| self.storage.save(STORAGE_KEY, &raw));
        if let Err(err) = result {
            self.logger.failure(&format!("snapshot write failed: {}", err));
        }
    }

    fn notify(&self, alert: &SimulationAlert) {
        let callback = self
            .callback
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        if let Some(callback) = callback {
            callback(alert);
        }
    }

    /// Appends the anomaly and returns the epoch it was recorded under. Pass
    /// that epoch to [`apply_analysis`](Self::apply_analysis) so a clear that
    /// lands in between discards the result.
    pub fn add_anomaly(&self, anomaly: SimulatedAnomaly) -> u64 {
        self.outbox.enqueue(SyncTask::PostAnomaly(anomaly.clone()));
        let mut inner = self.write();
        inner.state.anomalies.push(anomaly);
        self.persist(&inner.state);
        inner.epoch
    }

    /// Prepends the alert and fires the notification callback once.
    pub fn add_alert(&self, alert: SimulationAlert) {
        self.outbox.enqueue(SyncTask::PostAlert(alert.clone()));
        self.transition(|state| state.alerts.insert(0, alert.clone()));
        self.notify(&alert);
    }

    pub fn add_detection(&self, detection: Detection) {
        self.transition(|state| state.detections.push(detection));
    }

    /// Readings are held in memory only.
    pub fn add_readings(&self, readings: ReadingSet) {
        self.write().state.readings.extend(readings);
    }

    /// Marks the alert acknowledged. Returns whether an alert with `id` exists.
    pub fn acknowledge_alert(&self, id: &str) -> bool {
        self.outbox.enqueue(SyncTask::AcknowledgeAlert(id.to_string()));
        self.transition(|state| {
            let mut found = false;
            for alert in state.alerts.iter_mut().filter(|a| a.id == id) {
                alert.acknowledged = true;
                found = true;
            }
            found
        })
    }

    /// Empties every collection and deletes the persisted snapshot. Any
    /// analysis dispatched before this call becomes stale.
    pub fn clear_all(&self) {
        {
            let mut inner = self.write();
            inner.state = SimulationState::default();
            inner.epoch += 1;
            if let Err(err) = self.storage.remove(STORAGE_KEY) {
                self.logger.failure(&format!("snapshot removal failed: {}", err));
            }
        }
        self.outbox.enqueue(SyncTask::ClearAll);
        self.logger.record("simulation state cleared");
    }

    /// Last write wins; `None` unregisters.
    pub fn set_notification_callback(&self, callback: Option<AlertCallback>) {
        *self
            .callback
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = callback;
    }

    pub fn epoch(&self) -> u64 {
        self.read().epoch
    }

    /// Lands an analysis result in a single transition, unless the store was
    /// cleared since `epoch` was captured.
    pub fn apply_analysis(
        &self,
        epoch: u64,
        response: AnalysisResponse,
        readings: ReadingSet,
    ) -> ApplyOutcome {
        let AnalysisResponse {
            anomaly_id,
            alerts,
            detections,
            ..
        } = response;

        {
            let mut inner = self.write();
            if inner.epoch != epoch {
                self.logger.record(&format!(
                    "discarding stale analysis for {} (epoch {} != {})",
                    anomaly_id, epoch, inner.epoch
                ));
                return ApplyOutcome::Stale;
            }
            let state = &mut inner.state;
            for alert in &alerts {
                state.alerts.insert(0, alert.clone());
            }
            state.detections.extend(detections.iter().cloned());
            state.readings.extend(readings);
            self.persist(&inner.state);
        }

        for alert in &alerts {
            self.outbox.enqueue(SyncTask::PostAlert(alert.clone()));
            self.notify(alert);
        }

        ApplyOutcome::Applied {
            alerts: alerts.len(),
            detections: detections.len(),
        }
    }

    pub fn snapshot(&self) -> SimulationState {
        self.read().state.clone()
    }

    pub fn anomalies(&self) -> Vec<SimulatedAnomaly> {
        self.read().state.anomalies.clone()
    }

    pub fn alerts(&self) -> Vec<SimulationAlert> {
        self.read().state.alerts.clone()
    }

    pub fn detections(&self) -> Vec<Detection> {
        self.read().state.detections.clone()
    }

    pub fn readings(&self) -> ReadingSet {
        self.read().state.readings.clone()
    }

    pub fn outbox(&self) -> &Arc<SyncOutbox> {
        &self.outbox
    }
}
