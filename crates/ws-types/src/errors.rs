use thiserror::Error;

/// Main error type for the warm-start system
#[derive(Error, Debug)]
pub enum WarmstartError {
    #[error("Space error: {0}")]
    Space(#[from] SpaceError),

    #[error("Design error: {0}")]
    Design(#[from] DesignError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-space errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpaceError {
    #[error("Unknown hyperparameter: {name}")]
    UnknownHyperparameter { name: String },

    #[error("Missing value for hyperparameter: {name}")]
    MissingValue { name: String },

    #[error("Value {value} is outside the domain of hyperparameter {name}")]
    OutOfDomain { name: String, value: String },

    #[error("Hyperparameter {name} expects a {expected} value, got {value}")]
    TypeMismatch {
        name: String,
        expected: String,
        value: String,
    },

    #[error("Configuration matches forbidden clause: {clause}")]
    Forbidden { clause: String },

    #[error("Invalid hyperparameter definition {name}: {message}")]
    InvalidDefinition { name: String, message: String },

    #[error("No valid configuration found after {attempts} sampling attempts")]
    SamplingExhausted { attempts: usize },
}

/// Initial-design errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DesignError {
    #[error(
        "Need to provide either argument `init_budget`, `configs` or `n_configs_per_hyperparameter`, but provided none of them."
    )]
    MissingBudgetSource,

    #[error("Initial budget {budget} cannot be higher than the run limit {run_limit}.")]
    BudgetExceedsRunLimit { budget: usize, run_limit: usize },

    #[error(
        "Initial budget {budget} exceeds the ratio cap {max_config_ratio} of the run limit {run_limit} (at most {cap} configurations)."
    )]
    BudgetExceedsRatioCap {
        budget: usize,
        run_limit: usize,
        max_config_ratio: f64,
        cap: usize,
    },

    #[error("Explicit configuration #{index} is invalid: {source}")]
    InvalidConfiguration {
        index: usize,
        #[source]
        source: SpaceError,
    },

    #[error("No selection strategy attached to the initial design")]
    UnimplementedStrategy,

    #[error("Invalid option {option}: {message}")]
    InvalidOption { option: String, message: String },

    #[error("Space error: {0}")]
    Space(#[from] SpaceError),
}

/// Result type alias for warm-start operations
pub type WarmstartResult<T> = Result<T, WarmstartError>;

/// Macro for creating invalid-option errors
#[macro_export]
macro_rules! invalid_option {
    ($option:expr, $($arg:tt)*) => {
        $crate::DesignError::InvalidOption {
            option: $option.to_string(),
            message: format!($($arg)*),
        }
    };
}
