//! Selection strategies: how the initial configurations are produced once
//! the budget is known.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use ws_types::{
    invalid_option, Configuration, ConfigurationSpace, DesignError, ParameterValue, SpaceError,
    MAX_SAMPLING_ATTEMPTS,
};

use crate::sobol::{SobolSequence, MAX_DIMENSIONS};

/// Generator owned by each initial design instance.
pub type DesignRng = ChaCha8Rng;

/// Common trait for all selection strategies.
pub trait SelectionStrategy: fmt::Debug + Send + Sync {
    /// Produce the initial configurations for a resolved `budget`.
    fn select(
        &self,
        budget: usize,
        space: &ConfigurationSpace,
        rng: &mut DesignRng,
    ) -> Result<Vec<Configuration>, DesignError>;

    /// Human-readable strategy name.
    fn name(&self) -> &str;
}

/// The closed set of strategies that can be requested by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignKind {
    Default,
    Random,
    Sobol,
    LatinHypercube,
    Factorial,
}

impl DesignKind {
    pub fn strategy(self) -> Box<dyn SelectionStrategy> {
        match self {
            Self::Default => Box::new(DefaultDesign),
            Self::Random => Box::new(RandomDesign),
            Self::Sobol => Box::new(SobolDesign),
            Self::LatinHypercube => Box::new(LatinHypercubeDesign),
            Self::Factorial => Box::new(FactorialDesign),
        }
    }
}

// ---- Default configuration ----

/// Only the space's default configuration, regardless of the budget.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDesign;

impl SelectionStrategy for DefaultDesign {
    fn select(
        &self,
        _budget: usize,
        space: &ConfigurationSpace,
        _rng: &mut DesignRng,
    ) -> Result<Vec<Configuration>, DesignError> {
        Ok(vec![space.default_configuration()?])
    }

    fn name(&self) -> &str {
        "default"
    }
}

// ---- Explicit list ----

/// A caller-supplied list, returned as is.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplicitDesign {
    configs: Vec<Configuration>,
}

impl ExplicitDesign {
    pub fn new(configs: Vec<Configuration>) -> Self {
        Self { configs }
    }

    pub fn configs(&self) -> &[Configuration] {
        &self.configs
    }
}

impl SelectionStrategy for ExplicitDesign {
    fn select(
        &self,
        _budget: usize,
        _space: &ConfigurationSpace,
        _rng: &mut DesignRng,
    ) -> Result<Vec<Configuration>, DesignError> {
        Ok(self.configs.clone())
    }

    fn name(&self) -> &str {
        "explicit"
    }
}

// ---- Random ----

/// Independent uniform draws from the space.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDesign;

impl SelectionStrategy for RandomDesign {
    fn select(
        &self,
        budget: usize,
        space: &ConfigurationSpace,
        rng: &mut DesignRng,
    ) -> Result<Vec<Configuration>, DesignError> {
        (0..budget)
            .map(|_| space.sample_configuration(rng).map_err(DesignError::from))
            .collect()
    }

    fn name(&self) -> &str {
        "random"
    }
}

// ---- Sobol ----

/// Scrambled Sobol sequence mapped onto the space.
#[derive(Debug, Clone, Copy, Default)]
pub struct SobolDesign;

impl SelectionStrategy for SobolDesign {
    fn select(
        &self,
        budget: usize,
        space: &ConfigurationSpace,
        rng: &mut DesignRng,
    ) -> Result<Vec<Configuration>, DesignError> {
        let shift = (0..space.len()).map(|_| rng.next_u32()).collect();
        let sequence = SobolSequence::new(space.len())
            .and_then(|sequence| sequence.with_shift(shift))
            .ok_or_else(|| {
                invalid_option!(
                    "design",
                    "Sobol design supports at most {MAX_DIMENSIONS} hyperparameters, got {}",
                    space.len()
                )
            })?;
        let points: Vec<Vec<f64>> = sequence.take(budget).collect();
        configs_from_unit_points(space, points, rng)
    }

    fn name(&self) -> &str {
        "sobol"
    }
}

// ---- Latin hypercube ----

/// One sample per stratum in every dimension, strata permuted independently.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatinHypercubeDesign;

impl SelectionStrategy for LatinHypercubeDesign {
    fn select(
        &self,
        budget: usize,
        space: &ConfigurationSpace,
        rng: &mut DesignRng,
    ) -> Result<Vec<Configuration>, DesignError> {
        let ndim = space.len();
        let strata: Vec<Vec<usize>> = (0..ndim)
            .map(|_| {
                let mut perm: Vec<usize> = (0..budget).collect();
                perm.shuffle(rng);
                perm
            })
            .collect();

        let points: Vec<Vec<f64>> = (0..budget)
            .map(|i| {
                strata
                    .iter()
                    .map(|perm| {
                        let lower = perm[i] as f64 / budget as f64;
                        let upper = (perm[i] + 1) as f64 / budget as f64;
                        lower + rng.gen::<f64>() * (upper - lower)
                    })
                    .collect()
            })
            .collect();
        configs_from_unit_points(space, points, rng)
    }

    fn name(&self) -> &str {
        "latin_hypercube"
    }
}

// ---- Factorial ----

/// The centre of the space followed by the corners of the factorial grid
/// (numeric bounds, every categorical choice). Truncated to the budget;
/// topped up with random draws when the grid is smaller or when too many
/// corners are forbidden.
#[derive(Debug, Clone, Copy, Default)]
pub struct FactorialDesign;

impl FactorialDesign {
    fn candidates(
        space: &ConfigurationSpace,
    ) -> impl Iterator<Item = BTreeMap<String, ParameterValue>> + '_ {
        let (axes, centre): (Vec<_>, Vec<_>) = space
            .hyperparameters
            .iter()
            .map(|hp| hp.factorial_levels())
            .unzip();
        let names: Vec<String> = space.names().map(str::to_string).collect();
        let centre: BTreeMap<_, _> = names.iter().cloned().zip(centre).collect();

        // Mixed-radix walk of the cartesian product; first axis varies slowest.
        let total = axes
            .iter()
            .try_fold(1usize, |acc, axis| acc.checked_mul(axis.len()))
            .unwrap_or(usize::MAX);
        let corners = (0..total).map(move |idx| {
            let mut remaining = idx;
            let mut corner = BTreeMap::new();
            for (name, axis) in names.iter().zip(&axes).rev() {
                corner.insert(name.clone(), axis[remaining % axis.len()].clone());
                remaining /= axis.len();
            }
            corner
        });
        std::iter::once(centre).chain(corners)
    }
}

impl SelectionStrategy for FactorialDesign {
    fn select(
        &self,
        budget: usize,
        space: &ConfigurationSpace,
        rng: &mut DesignRng,
    ) -> Result<Vec<Configuration>, DesignError> {
        let mut configs = Vec::with_capacity(budget);
        let mut rejected = 0;
        for values in Self::candidates(space) {
            if configs.len() >= budget || rejected >= MAX_SAMPLING_ATTEMPTS {
                break;
            }
            match Configuration::new(space, values) {
                Ok(config) => configs.push(config),
                Err(SpaceError::Forbidden { .. }) => rejected += 1,
                Err(e) => return Err(e.into()),
            }
        }
        while configs.len() < budget {
            configs.push(space.sample_configuration(rng)?);
        }
        Ok(configs)
    }

    fn name(&self) -> &str {
        "factorial"
    }
}

/// Map unit-hypercube points onto configurations; points landing on a
/// forbidden combination are replaced by a random draw.
fn configs_from_unit_points(
    space: &ConfigurationSpace,
    points: Vec<Vec<f64>>,
    rng: &mut DesignRng,
) -> Result<Vec<Configuration>, DesignError> {
    points
        .iter()
        .map(|point| match space.from_unit(point) {
            Ok(config) => Ok(config),
            Err(SpaceError::Forbidden { .. }) => Ok(space.sample_configuration(rng)?),
            Err(e) => Err(e.into()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use ws_types::{ForbiddenClause, Hyperparameter};

    fn rng(seed: u64) -> DesignRng {
        DesignRng::seed_from_u64(seed)
    }

    fn sample_space() -> ConfigurationSpace {
        ConfigurationSpace::new()
            .add(Hyperparameter::float("x1", 1.0, 10.0).with_default(1.0))
            .add_int("n", 1, 8)
            .add_log_float("lr", 1e-4, 1e-1)
            .add_categorical("opt", vec![json!("sgd"), json!("adam")])
    }

    fn all_strategies() -> Vec<Box<dyn SelectionStrategy>> {
        [
            DesignKind::Random,
            DesignKind::Sobol,
            DesignKind::LatinHypercube,
            DesignKind::Factorial,
        ]
        .into_iter()
        .map(DesignKind::strategy)
        .collect()
    }

    #[test]
    fn default_design_returns_only_the_default() {
        let space = sample_space();
        for seed in [0, 1, 12345] {
            let configs = DefaultDesign.select(10, &space, &mut rng(seed)).unwrap();
            assert_eq!(configs, vec![space.default_configuration().unwrap()]);
        }
    }

    #[test]
    fn explicit_design_preserves_order() {
        let space = ConfigurationSpace::new().add_float("x1", 1.0, 10.0);
        let list = vec![
            Configuration::new(&space, [("x1", 4)]).unwrap(),
            Configuration::new(&space, [("x1", 2)]).unwrap(),
        ];
        let design = ExplicitDesign::new(list.clone());
        assert_eq!(design.select(2, &space, &mut rng(0)).unwrap(), list);
    }

    #[test]
    fn sampling_designs_fill_the_budget_with_valid_configs() {
        let space = sample_space();
        for strategy in all_strategies() {
            let configs = strategy.select(13, &space, &mut rng(3)).unwrap();
            assert_eq!(configs.len(), 13, "{}", strategy.name());
            for config in &configs {
                space.validate(config).unwrap();
            }
        }
    }

    #[test]
    fn sampling_designs_are_deterministic_per_seed() {
        let space = sample_space();
        for strategy in all_strategies() {
            let a = strategy.select(8, &space, &mut rng(42)).unwrap();
            let b = strategy.select(8, &space, &mut rng(42)).unwrap();
            assert_eq!(a, b, "{}", strategy.name());
        }
    }

    #[test]
    fn random_designs_differ_across_seeds() {
        let space = sample_space();
        for kind in [DesignKind::Random, DesignKind::Sobol, DesignKind::LatinHypercube] {
            let strategy = kind.strategy();
            let a = strategy.select(8, &space, &mut rng(1)).unwrap();
            let b = strategy.select(8, &space, &mut rng(2)).unwrap();
            assert_ne!(a, b, "{}", strategy.name());
        }
    }

    #[test]
    fn latin_hypercube_covers_every_stratum() {
        let space = ConfigurationSpace::new().add_float("x", 0.0, 1.0).add_float("y", 0.0, 1.0);
        let n = 8;
        let configs = LatinHypercubeDesign.select(n, &space, &mut rng(9)).unwrap();
        for name in ["x", "y"] {
            let mut strata: Vec<usize> = configs
                .iter()
                .map(|c| (c.get(name).and_then(ParameterValue::as_f64).unwrap() * n as f64) as usize)
                .collect();
            strata.sort_unstable();
            assert_eq!(strata, (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn sobol_rejects_wide_spaces() {
        let space = (0..=MAX_DIMENSIONS).fold(ConfigurationSpace::new(), |space, i| {
            space.add_float(format!("x{i}"), 0.0, 1.0)
        });
        let err = SobolDesign.select(4, &space, &mut rng(0)).unwrap_err();
        assert!(matches!(err, DesignError::InvalidOption { .. }));
    }

    #[test]
    fn factorial_starts_with_centre_then_corners() {
        let space = ConfigurationSpace::new().add_float("a", 0.0, 2.0).add_int("b", 0, 10);
        let configs = FactorialDesign.select(5, &space, &mut rng(0)).unwrap();
        let pairs: Vec<(f64, i64)> = configs
            .iter()
            .map(|c| {
                (
                    c.get("a").and_then(ParameterValue::as_f64).unwrap(),
                    c.get("b").and_then(ParameterValue::as_i64).unwrap(),
                )
            })
            .collect();
        assert_eq!(
            pairs,
            vec![(1.0, 5), (0.0, 0), (0.0, 10), (2.0, 0), (2.0, 10)]
        );
    }

    #[test]
    fn factorial_tops_up_small_grids() {
        let space = ConfigurationSpace::new().add_categorical("opt", vec![json!("sgd"), json!("adam")]);
        let configs = FactorialDesign.select(6, &space, &mut rng(0)).unwrap();
        assert_eq!(configs.len(), 6);
        assert_eq!(configs[0].get("opt"), Some(&ParameterValue::Json(json!("sgd"))));
        assert_eq!(configs[1].get("opt"), Some(&ParameterValue::Json(json!("sgd"))));
        assert_eq!(configs[2].get("opt"), Some(&ParameterValue::Json(json!("adam"))));
    }

    #[test]
    fn forbidden_points_are_replaced() {
        let space = ConfigurationSpace::new()
            .add_categorical("penalty", vec![json!("l1"), json!("l2")])
            .add_categorical("dual", vec![json!(true), json!(false)])
            .add_forbidden(ForbiddenClause::And(vec![
                ForbiddenClause::equals("penalty", "l2"),
                ForbiddenClause::equals("dual", false),
            ]));
        for strategy in all_strategies() {
            let configs = strategy.select(12, &space, &mut rng(5)).unwrap();
            assert_eq!(configs.len(), 12, "{}", strategy.name());
            for config in &configs {
                space.validate(config).unwrap();
            }
        }
    }

    #[test]
    fn factorial_gives_up_on_forbidden_corners() {
        // Every corner sits on a forbidden bound of `a`, the slowest axis.
        let space = (1..24)
            .fold(ConfigurationSpace::new().add_float("a", 0.0, 1.0), |space, i| {
                space.add_float(format!("x{i}"), 0.0, 1.0)
            })
            .add_forbidden(ForbiddenClause::equals("a", 0.0))
            .add_forbidden(ForbiddenClause::equals("a", 1.0));

        let configs = FactorialDesign.select(3, &space, &mut rng(11)).unwrap();
        assert_eq!(configs.len(), 3);
        assert_eq!(configs[0].get("a"), Some(&ParameterValue::Float(0.5)));
        for config in &configs {
            space.validate(config).unwrap();
        }
    }
}
