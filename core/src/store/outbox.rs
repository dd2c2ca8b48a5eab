use crate::model::{SimulatedAnomaly, SimulationAlert};
use crate::store::backend::BackendSync;
use crate::telemetry::{LogManager, MetricsRecorder};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// Pending best-effort mirror of a local mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncTask {
    PostAnomaly(SimulatedAnomaly),
    PostAlert(SimulationAlert),
    AcknowledgeAlert(String),
    ClearAll,
}

impl SyncTask {
    pub fn label(&self) -> String {
        match self {
            SyncTask::PostAnomaly(anomaly) => format!("post anomaly {}", anomaly.id),
            SyncTask::PostAlert(alert) => format!("post alert {}", alert.id),
            SyncTask::AcknowledgeAlert(id) => format!("acknowledge alert {}", id),
            SyncTask::ClearAll => "clear all anomalies".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub sent: usize,
    pub failed: usize,
}

/// FIFO of sync tasks. Mutations enqueue; a flusher drains and sends.
#[derive(Debug, Default)]
pub struct SyncOutbox {
    queue: Mutex<VecDeque<SyncTask>>,
}

impl SyncOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    fn queue(&self) -> MutexGuard<'_, VecDeque<SyncTask>> {
        self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn enqueue(&self, task: SyncTask) {
        self.queue().push_back(task);
    }

    pub fn len(&self) -> usize {
        self.queue().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue().is_empty()
    }

    /// Takes every pending task, oldest first.
    pub fn drain(&self) -> Vec<SyncTask> {
        self.queue().drain(..).collect()
    }

    /// Sends every pending task once. Failures are logged and dropped.
    pub async fn flush(&self, backend: &dyn BackendSync, metrics: &MetricsRecorder) -> FlushReport {
        let logger = LogManager::new(LogManager::SYNC);
        let mut report = FlushReport::default();
        for task in self.drain() {
            match backend.send(&task).await {
                Ok(()) => {
                    report.sent += 1;
                    logger.trace(&format!("synced: {}", task.label()));
                }
                Err(err) => {
                    report.failed += 1;
                    logger.failure(&format!("sync failed ({}): {}", task.label(), err));
                }
            }
        }
        metrics.record_sync(report.sent, report.failed);
        report
    }
}
