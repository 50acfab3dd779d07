//! # ws-design
//!
//! Initial design selection for model-based configuration search.
//!
//! Resolves how many configurations to evaluate before the surrogate model
//! takes over (explicit budget, explicit list, or a per-hyperparameter
//! heuristic), validates that budget against the run limit, and produces the
//! configurations with one of the selection strategies (default, explicit,
//! random, Sobol, Latin hypercube, factorial).

mod budget;
mod config;
mod design;
mod sobol;
mod strategy;

pub use budget::{BudgetResolver, BudgetSource, ResolvedBudget};
pub use config::{InitialDesignConfig, DEFAULT_CONFIGS_PER_HYPERPARAMETER};
pub use design::{DesignState, InitialDesign};
pub use sobol::{SobolSequence, MAX_DIMENSIONS as SOBOL_MAX_DIMENSIONS};
pub use strategy::{
    DefaultDesign, DesignKind, DesignRng, ExplicitDesign, FactorialDesign, LatinHypercubeDesign,
    RandomDesign, SelectionStrategy, SobolDesign,
};
