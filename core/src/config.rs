use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";
pub const API_URL_ENV: &str = "DRISHTI_API_URL";

/// Runtime knobs shared by the store, analysis service and notification layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub api_base_url: String,
    /// Directory for the persisted snapshot; in-memory storage when absent.
    pub storage_dir: Option<PathBuf>,
    pub analysis_delay_min_ms: u64,
    pub analysis_delay_max_ms: u64,
    pub seed: Option<u64>,
    pub max_detecting_sensors: usize,
    pub notification_ttl_ms: u64,
    pub notification_capacity: usize,
    pub sync_interval_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            storage_dir: None,
            analysis_delay_min_ms: 500,
            analysis_delay_max_ms: 1000,
            seed: None,
            max_detecting_sensors: 3,
            notification_ttl_ms: 5000,
            notification_capacity: 10,
            sync_interval_ms: 2000,
        }
    }
}

impl SimulationConfig {
    /// Defaults with the backend origin taken from `DRISHTI_API_URL` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_base_url = url;
            }
        }
        config
    }

    /// No artificial latency; used by tests and offline batch runs.
    pub fn without_delay(mut self) -> Self {
        self.analysis_delay_min_ms = 0;
        self.analysis_delay_max_ms = 0;
        self
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_millis(self.sync_interval_ms.max(1))
    }

    /// Delay bounds with min <= max regardless of how they were configured.
    pub fn analysis_delay_bounds(&self) -> (u64, u64) {
        let min = self.analysis_delay_min_ms.min(self.analysis_delay_max_ms);
        let max = self.analysis_delay_min_ms.max(self.analysis_delay_max_ms);
        (min, max)
    }
}
