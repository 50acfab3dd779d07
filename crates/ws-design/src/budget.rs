//! Initial budget resolution.
//!
//! The budget comes from exactly one source, picked by a fixed precedence:
//! an explicit `init_budget`, then the length of an explicit configuration
//! list, then `n_configs_per_hyperparameter` times the number of
//! hyperparameters. The result is validated against the run limit and the
//! optional ratio cap.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ws_types::{invalid_option, Configuration, DesignError};

/// Relative slack applied to `max_config_ratio * n_runs` before flooring.
const RATIO_TOLERANCE: f64 = 1e-9;

/// Which input determined the resolved budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetSource {
    InitBudget,
    Configs,
    PerHyperparameter,
}

impl std::fmt::Display for BudgetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::InitBudget => "init_budget",
            Self::Configs => "configs",
            Self::PerHyperparameter => "n_configs_per_hyperparameter",
        };
        f.write_str(name)
    }
}

/// A validated initial budget and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedBudget {
    pub budget: usize,
    pub source: BudgetSource,
}

type SourceCheck = fn(&BudgetResolver<'_>) -> Option<Result<usize, DesignError>>;

/// Budget sources in precedence order; the first one that applies wins.
const PRECEDENCE: [(BudgetSource, SourceCheck); 3] = [
    (BudgetSource::InitBudget, from_init_budget),
    (BudgetSource::Configs, from_configs),
    (BudgetSource::PerHyperparameter, from_per_hyperparameter),
];

/// Inputs to budget resolution.
#[derive(Debug, Clone)]
pub struct BudgetResolver<'a> {
    run_limit: usize,
    n_hyperparameters: usize,
    init_budget: Option<usize>,
    configs: Option<&'a [Configuration]>,
    n_configs_per_hyperparameter: Option<usize>,
    max_config_ratio: Option<f64>,
}

impl<'a> BudgetResolver<'a> {
    pub fn new(run_limit: usize, n_hyperparameters: usize) -> Self {
        Self {
            run_limit,
            n_hyperparameters,
            init_budget: None,
            configs: None,
            n_configs_per_hyperparameter: None,
            max_config_ratio: None,
        }
    }

    pub fn with_init_budget(mut self, init_budget: Option<usize>) -> Self {
        self.init_budget = init_budget;
        self
    }

    pub fn with_configs(mut self, configs: Option<&'a [Configuration]>) -> Self {
        self.configs = configs;
        self
    }

    pub fn with_n_configs_per_hyperparameter(mut self, n: Option<usize>) -> Self {
        self.n_configs_per_hyperparameter = n;
        self
    }

    pub fn with_max_config_ratio(mut self, ratio: Option<f64>) -> Self {
        self.max_config_ratio = ratio;
        self
    }

    /// Resolve and validate the initial budget.
    pub fn resolve(&self) -> Result<ResolvedBudget, DesignError> {
        self.check_options()?;

        let (source, budget) = PRECEDENCE
            .iter()
            .find_map(|(source, check)| check(self).map(|result| result.map(|b| (*source, b))))
            .ok_or(DesignError::MissingBudgetSource)??;

        self.check_limits(budget)?;
        debug!(budget, %source, run_limit = self.run_limit, "resolved initial budget");
        Ok(ResolvedBudget { budget, source })
    }

    fn check_options(&self) -> Result<(), DesignError> {
        if self.run_limit == 0 {
            return Err(invalid_option!("n_runs", "must be at least 1"));
        }
        if let Some(ratio) = self.max_config_ratio {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(invalid_option!(
                    "max_config_ratio",
                    "must be in (0, 1], got {ratio}"
                ));
            }
        }
        Ok(())
    }

    fn check_limits(&self, budget: usize) -> Result<(), DesignError> {
        if budget > self.run_limit {
            return Err(DesignError::BudgetExceedsRunLimit {
                budget,
                run_limit: self.run_limit,
            });
        }
        // An explicit list is evaluated whole, even under a smaller `init_budget`.
        if let Some(configs) = self.configs.filter(|c| c.len() > self.run_limit) {
            return Err(invalid_option!(
                "configs",
                "{} configurations cannot fit in the run limit {}",
                configs.len(),
                self.run_limit
            ));
        }
        if let Some(ratio) = self.max_config_ratio {
            // Absorb rounding in the product so 0.29 * 100 caps at 29, not 28.
            let cap = (ratio * self.run_limit as f64 * (1.0 + RATIO_TOLERANCE)).floor() as usize;
            if budget > cap {
                return Err(DesignError::BudgetExceedsRatioCap {
                    budget,
                    run_limit: self.run_limit,
                    max_config_ratio: ratio,
                    cap,
                });
            }
        }
        Ok(())
    }
}

fn from_init_budget(resolver: &BudgetResolver<'_>) -> Option<Result<usize, DesignError>> {
    resolver.init_budget.map(|budget| {
        if budget == 0 {
            Err(invalid_option!("init_budget", "must be at least 1"))
        } else {
            Ok(budget)
        }
    })
}

fn from_configs(resolver: &BudgetResolver<'_>) -> Option<Result<usize, DesignError>> {
    resolver.configs.map(|configs| {
        if configs.is_empty() {
            Err(invalid_option!("configs", "must contain at least one configuration"))
        } else {
            Ok(configs.len())
        }
    })
}

fn from_per_hyperparameter(resolver: &BudgetResolver<'_>) -> Option<Result<usize, DesignError>> {
    resolver.n_configs_per_hyperparameter.map(|n| {
        if n == 0 {
            Err(invalid_option!("n_configs_per_hyperparameter", "must be at least 1"))
        } else {
            // An empty space still gets one configuration.
            Ok(n.saturating_mul(resolver.n_hyperparameters).max(1))
        }
    })
}
