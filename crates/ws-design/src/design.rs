//! The initial design orchestrator.
//!
//! An [`InitialDesign`] resolves and validates its budget when it is built,
//! then hands the budget, the space and its own generator to the attached
//! [`SelectionStrategy`] when [`InitialDesign::select_configurations`] is
//! called. Every input error surfaces from [`InitialDesign::new`]; a design
//! that exists is always consistent.

use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ws_types::{Configuration, ConfigurationSpace, DesignError};

use crate::budget::{BudgetResolver, BudgetSource, ResolvedBudget};
use crate::config::InitialDesignConfig;
use crate::strategy::{DesignRng, ExplicitDesign, SelectionStrategy};

/// Lifecycle of an initial design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DesignState {
    /// Budget resolved, generator seeded, nothing selected yet.
    Constructed,
    /// `select_configurations` has produced a result; further calls repeat it.
    Queried,
}

/// Warm-start design: the configurations evaluated before the surrogate
/// model takes over.
#[derive(Debug)]
pub struct InitialDesign {
    space: ConfigurationSpace,
    seed: u64,
    n_runs: usize,
    resolved: ResolvedBudget,
    strategy: Option<Box<dyn SelectionStrategy>>,
    explicit: bool,
    rng: DesignRng,
    selected: Option<Vec<Configuration>>,
}

impl InitialDesign {
    /// Validate the space and any explicit configurations, resolve the
    /// budget and seed the generator.
    ///
    /// With explicit `configs` the explicit-list strategy is attached;
    /// otherwise `config.design` picks one, or none is attached and
    /// selection fails with [`DesignError::UnimplementedStrategy`] until
    /// [`InitialDesign::with_strategy`] supplies one.
    pub fn new(space: ConfigurationSpace, config: InitialDesignConfig) -> Result<Self, DesignError> {
        space.check()?;

        let configs = config
            .configs
            .map(|configs| {
                configs
                    .iter()
                    .enumerate()
                    .map(|(index, c)| {
                        c.revalidate(&space)
                            .map_err(|source| DesignError::InvalidConfiguration { index, source })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        let resolved = BudgetResolver::new(config.n_runs, space.len())
            .with_init_budget(config.init_budget)
            .with_configs(configs.as_deref())
            .with_n_configs_per_hyperparameter(config.n_configs_per_hyperparameter)
            .with_max_config_ratio(config.max_config_ratio)
            .resolve()?;

        let explicit = configs.is_some();
        let strategy: Option<Box<dyn SelectionStrategy>> = match configs {
            Some(configs) => Some(Box::new(ExplicitDesign::new(configs))),
            None => config.design.map(|kind| kind.strategy()),
        };

        info!(
            init_budget = resolved.budget,
            source = %resolved.source,
            n_runs = config.n_runs,
            seed = config.seed,
            strategy = strategy.as_ref().map(|s| s.name()).unwrap_or("none"),
            "initial design constructed"
        );

        Ok(Self {
            space,
            seed: config.seed,
            n_runs: config.n_runs,
            resolved,
            strategy,
            explicit,
            rng: DesignRng::seed_from_u64(config.seed),
            selected: None,
        })
    }

    /// Attach a selection strategy. Ignored when explicit configurations
    /// were supplied or a selection has already been made.
    pub fn with_strategy(mut self, strategy: impl SelectionStrategy + 'static) -> Self {
        if self.selected.is_some() {
            warn!(strategy = strategy.name(), "initial design already queried; strategy ignored");
            return self;
        }
        if self.explicit {
            warn!(strategy = strategy.name(), "explicit configurations take precedence; strategy ignored");
            return self;
        }
        self.strategy = Some(Box::new(strategy));
        self
    }

    /// The resolved initial budget.
    pub fn init_budget(&self) -> usize {
        self.resolved.budget
    }

    pub fn budget_source(&self) -> BudgetSource {
        self.resolved.source
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn n_runs(&self) -> usize {
        self.n_runs
    }

    pub fn space(&self) -> &ConfigurationSpace {
        &self.space
    }

    pub fn strategy_name(&self) -> Option<&str> {
        self.strategy.as_ref().map(|s| s.name())
    }

    pub fn state(&self) -> DesignState {
        if self.selected.is_some() {
            DesignState::Queried
        } else {
            DesignState::Constructed
        }
    }

    /// Produce the initial configurations.
    ///
    /// The first successful call runs the strategy; later calls return the
    /// same sequence. Each configuration without an origin is labelled with
    /// the producing strategy.
    pub fn select_configurations(&mut self) -> Result<Vec<Configuration>, DesignError> {
        if let Some(selected) = &self.selected {
            debug!(count = selected.len(), "returning cached initial design");
            return Ok(selected.clone());
        }

        let configs = self.run_strategy()?;
        let origin = format!("Initial design: {}", self.strategy_name().unwrap_or("none"));
        let configs: Vec<Configuration> = configs
            .into_iter()
            .map(|c| match c.origin() {
                Some(_) => c,
                None => c.with_origin(origin.clone()),
            })
            .collect();

        info!(
            count = configs.len(),
            init_budget = self.resolved.budget,
            strategy = self.strategy_name().unwrap_or("none"),
            "selected initial configurations"
        );
        self.selected = Some(configs.clone());
        Ok(configs)
    }

    /// The strategy dispatch point.
    fn run_strategy(&mut self) -> Result<Vec<Configuration>, DesignError> {
        let strategy = self
            .strategy
            .as_ref()
            .ok_or(DesignError::UnimplementedStrategy)?;
        strategy.select(self.resolved.budget, &self.space, &mut self.rng)
    }
}
