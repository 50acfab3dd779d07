//! Construction options for an initial design.

use serde::{Deserialize, Serialize};
use std::path::Path;
use ws_types::{Configuration, WarmstartResult};

use crate::strategy::DesignKind;

/// Default multiplier applied to the number of hyperparameters.
pub const DEFAULT_CONFIGS_PER_HYPERPARAMETER: usize = 10;

fn default_n_configs_per_hyperparameter() -> Option<usize> {
    Some(DEFAULT_CONFIGS_PER_HYPERPARAMETER)
}

/// Options recognised when building an [`InitialDesign`](crate::InitialDesign).
///
/// `init_budget`, `configs` and `n_configs_per_hyperparameter` are budget
/// sources in that order of precedence. Setting
/// `n_configs_per_hyperparameter` to `null` removes the default heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialDesignConfig {
    /// Seed for the design's private generator.
    #[serde(default)]
    pub seed: u64,

    /// Run limit of the optimization; the budget may never exceed it.
    pub n_runs: usize,

    /// Configurations evaluated verbatim.
    #[serde(default)]
    pub configs: Option<Vec<Configuration>>,

    /// Explicit budget override.
    #[serde(default)]
    pub init_budget: Option<usize>,

    #[serde(default = "default_n_configs_per_hyperparameter")]
    pub n_configs_per_hyperparameter: Option<usize>,

    /// Hard cap on the budget as a fraction of `n_runs`.
    #[serde(default)]
    pub max_config_ratio: Option<f64>,

    /// Strategy used when no explicit configurations are given.
    #[serde(default)]
    pub design: Option<DesignKind>,
}

impl InitialDesignConfig {
    pub fn new(n_runs: usize) -> Self {
        Self {
            seed: 0,
            n_runs,
            configs: None,
            init_budget: None,
            n_configs_per_hyperparameter: default_n_configs_per_hyperparameter(),
            max_config_ratio: None,
            design: None,
        }
    }

    pub fn from_json_str(json: &str) -> WarmstartResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> WarmstartResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_configs(mut self, configs: Vec<Configuration>) -> Self {
        self.configs = Some(configs);
        self
    }

    pub fn with_init_budget(mut self, init_budget: usize) -> Self {
        self.init_budget = Some(init_budget);
        self
    }

    pub fn with_n_configs_per_hyperparameter(mut self, n: Option<usize>) -> Self {
        self.n_configs_per_hyperparameter = n;
        self
    }

    pub fn with_max_config_ratio(mut self, ratio: f64) -> Self {
        self.max_config_ratio = Some(ratio);
        self
    }

    pub fn with_design(mut self, design: DesignKind) -> Self {
        self.design = Some(design);
        self
    }
}
