use serde::Serialize;
use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub analyses: usize,
    pub analysis_errors: usize,
    pub alerts: usize,
    pub stale_discarded: usize,
    pub sync_sent: usize,
    pub sync_failed: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    fn bump(&self, apply: impl FnOnce(&mut MetricsSnapshot)) {
        if let Ok(mut metrics) = self.inner.lock() {
            apply(&mut metrics);
        }
    }

    pub fn record_analysis(&self, alerts: usize) {
        self.bump(|m| {
            m.analyses += 1;
            m.alerts += alerts;
        });
    }

    pub fn record_analysis_error(&self) {
        self.bump(|m| m.analysis_errors += 1);
    }

    pub fn record_stale(&self) {
        self.bump(|m| m.stale_discarded += 1);
    }

    pub fn record_sync(&self, sent: usize, failed: usize) {
        self.bump(|m| {
            m.sync_sent += sent;
            m.sync_failed += failed;
        });
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
