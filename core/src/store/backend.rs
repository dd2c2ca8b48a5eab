use crate::config::SimulationConfig;
use crate::prelude::{SimError, SimResult};
use crate::store::outbox::SyncTask;
use async_trait::async_trait;
use std::time::Duration;

/// Remote mirror of the local simulation state.
#[async_trait]
pub trait BackendSync: Send + Sync {
    async fn send(&self, task: &SyncTask) -> SimResult<()>;
}

/// Accepts every task without doing anything; used when running offline.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

#[async_trait]
impl BackendSync for NullBackend {
    async fn send(&self, _task: &SyncTask) -> SimResult<()> {
        Ok(())
    }
}

/// REST client for the anomaly/alert endpoints of the analysis backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &SimulationConfig) -> SimResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SimError::Backend(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Method and URL for a task, without sending anything.
    pub fn route(&self, task: &SyncTask) -> (reqwest::Method, String) {
        let base = &self.base_url;
        match task {
            SyncTask::PostAnomaly(_) => (reqwest::Method::POST, format!("{}/anomalies", base)),
            SyncTask::PostAlert(_) => (reqwest::Method::POST, format!("{}/anomalies/alerts", base)),
            SyncTask::AcknowledgeAlert(id) => (
                reqwest::Method::PATCH,
                format!("{}/anomalies/alerts/{}/acknowledge", base, id),
            ),
            SyncTask::ClearAll => (reqwest::Method::DELETE, format!("{}/anomalies", base)),
        }
    }
}

#[async_trait]
impl BackendSync for HttpBackend {
    async fn send(&self, task: &SyncTask) -> SimResult<()> {
        let (method, url) = self.route(task);
        let request = self.client.request(method, url);
        let request = match task {
            SyncTask::PostAnomaly(anomaly) => request.json(anomaly),
            SyncTask::PostAlert(alert) => request.json(alert),
            SyncTask::AcknowledgeAlert(_) | SyncTask::ClearAll => request,
        };
        let response = request
            .send()
            .await
            .map_err(|e| SimError::Backend(e.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(SimError::Backend(format!("{}: {}", status, text)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_follow_anomaly_api_layout() {
        let config = SimulationConfig {
            api_base_url: "http://backend:8000/api/v1/".into(),
            ..Default::default()
        };
        let backend = HttpBackend::new(&config).unwrap();
        assert_eq!(backend.base_url(), "http://backend:8000/api/v1");

        let (method, url) = backend.route(&SyncTask::AcknowledgeAlert("ALT-9".into()));
        assert_eq!(method, reqwest::Method::PATCH);
        assert_eq!(url, "http://backend:8000/api/v1/anomalies/alerts/ALT-9/acknowledge");

        let (method, url) = backend.route(&SyncTask::ClearAll);
        assert_eq!(method, reqwest::Method::DELETE);
        assert_eq!(url, "http://backend:8000/api/v1/anomalies");
    }

    #[tokio::test]
    async fn unreachable_backend_reports_error() {
        let config = SimulationConfig {
            api_base_url: "http://127.0.0.1:9/api/v1".into(),
            ..Default::default()
        };
        let backend = HttpBackend::new(&config).unwrap();
        let result = backend.send(&SyncTask::ClearAll).await;
        assert!(matches!(result, Err(SimError::Backend(_))));
    }
}
