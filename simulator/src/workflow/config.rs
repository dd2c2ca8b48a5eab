use crate::generator::profile::ScenarioConfig;
use anyhow::Context;
use drishticore::config::SimulationConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub simulation: SimulationConfig,
    pub scenario: ScenarioConfig,
}

/// Command-line values that take precedence over the YAML file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub seed: Option<u64>,
    pub storage_dir: Option<PathBuf>,
    pub placements: Option<usize>,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Defaults, with the backend origin picked up from the environment.
    pub fn from_env() -> Self {
        Self {
            simulation: SimulationConfig::from_env(),
            scenario: ScenarioConfig::default(),
        }
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(url) = overrides.api_url {
            self.simulation.api_base_url = url;
        }
        if let Some(seed) = overrides.seed {
            self.simulation.seed = Some(seed);
            self.scenario.seed = seed;
        }
        if let Some(dir) = overrides.storage_dir {
            self.simulation.storage_dir = Some(dir);
        }
        if let Some(count) = overrides.placements {
            self.scenario.placements = count;
        }
        self
    }

    pub fn to_simulation_config(&self) -> SimulationConfig {
        self.simulation.clone()
    }
}
