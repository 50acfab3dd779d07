//! Configuration space definitions: hyperparameter domains, defaults and
//! forbidden clauses.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::configuration::Configuration;
use crate::errors::SpaceError;

/// Rejection-sampling attempts before giving up on a heavily forbidden space.
pub const MAX_SAMPLING_ATTEMPTS: usize = 1000;

/// A concrete hyperparameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Int(i64),
    Float(f64),
    Json(serde_json::Value),
}

impl ParameterValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Json(v) => v.as_f64(),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            Self::Float(_) => None,
            Self::Json(v) => v.as_i64(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Int(v) => serde_json::Value::from(*v),
            Self::Float(v) => serde_json::Value::from(*v),
            Self::Json(v) => v.clone(),
        }
    }

    /// Equality that treats `Int(4)` and `Float(4.0)` as the same number.
    pub fn loosely_eq(&self, other: &Self) -> bool {
        if self == other {
            return true;
        }
        match (self, other) {
            (Self::Json(a), Self::Json(b)) => a == b,
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => self.to_json() == other.to_json(),
            },
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Json(v) => write!(f, "{v}"),
        }
    }
}

impl From<f64> for ParameterValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for ParameterValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ParameterValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<bool> for ParameterValue {
    fn from(v: bool) -> Self {
        Self::Json(serde_json::Value::Bool(v))
    }
}

impl From<&str> for ParameterValue {
    fn from(v: &str) -> Self {
        Self::Json(serde_json::Value::String(v.to_string()))
    }
}

impl From<String> for ParameterValue {
    fn from(v: String) -> Self {
        Self::Json(serde_json::Value::String(v))
    }
}

impl From<serde_json::Value> for ParameterValue {
    fn from(v: serde_json::Value) -> Self {
        if let Some(i) = v.as_i64() {
            return Self::Int(i);
        }
        match v.as_f64() {
            Some(f) if v.is_number() => Self::Float(f),
            _ => Self::Json(v),
        }
    }
}

/// The domain of a single hyperparameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HyperparameterKind {
    /// Continuous range [low, high], optionally on a log scale.
    Float {
        low: f64,
        high: f64,
        #[serde(default)]
        log: bool,
    },
    /// Integer range [low, high] inclusive, optionally on a log scale.
    Int {
        low: i64,
        high: i64,
        #[serde(default)]
        log: bool,
    },
    /// Unordered choices.
    Categorical { choices: Vec<serde_json::Value> },
    /// A single fixed value.
    Constant { value: ParameterValue },
}

/// A named hyperparameter with an optional explicit default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameter {
    pub name: String,
    pub kind: HyperparameterKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ParameterValue>,
}

impl Hyperparameter {
    pub fn float(name: impl Into<String>, low: f64, high: f64) -> Self {
        Self::with_kind(name, HyperparameterKind::Float { low, high, log: false })
    }

    pub fn log_float(name: impl Into<String>, low: f64, high: f64) -> Self {
        Self::with_kind(name, HyperparameterKind::Float { low, high, log: true })
    }

    pub fn int(name: impl Into<String>, low: i64, high: i64) -> Self {
        Self::with_kind(name, HyperparameterKind::Int { low, high, log: false })
    }

    pub fn log_int(name: impl Into<String>, low: i64, high: i64) -> Self {
        Self::with_kind(name, HyperparameterKind::Int { low, high, log: true })
    }

    pub fn categorical(name: impl Into<String>, choices: Vec<serde_json::Value>) -> Self {
        Self::with_kind(name, HyperparameterKind::Categorical { choices })
    }

    pub fn constant(name: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        Self::with_kind(
            name,
            HyperparameterKind::Constant {
                value: value.into(),
            },
        )
    }

    fn with_kind(name: impl Into<String>, kind: HyperparameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<ParameterValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// The default value: the explicit default if set, otherwise the
    /// (geometric, for log ranges) midpoint of a numeric range or the first
    /// categorical choice.
    pub fn default_value(&self) -> ParameterValue {
        if let Some(default) = &self.default {
            return self.normalize(default).unwrap_or_else(|_| default.clone());
        }
        match &self.kind {
            HyperparameterKind::Float { low, high, log } => {
                if *log {
                    ParameterValue::Float((low.ln() + (high.ln() - low.ln()) / 2.0).exp())
                } else {
                    ParameterValue::Float(float_midpoint(*low, *high))
                }
            }
            HyperparameterKind::Int { low, high, log } => {
                if *log {
                    let (l, h) = (*low as f64, *high as f64);
                    let mid = (l.ln() + (h.ln() - l.ln()) / 2.0).exp().round() as i64;
                    ParameterValue::Int(mid.clamp(*low, *high))
                } else {
                    ParameterValue::Int(int_midpoint(*low, *high))
                }
            }
            HyperparameterKind::Categorical { choices } => ParameterValue::Json(
                choices.first().cloned().unwrap_or(serde_json::Value::Null),
            ),
            HyperparameterKind::Constant { value } => value.clone(),
        }
    }

    /// Check `value` against the domain and return its canonical form.
    pub fn normalize(&self, value: &ParameterValue) -> Result<ParameterValue, SpaceError> {
        let out_of_domain = || SpaceError::OutOfDomain {
            name: self.name.clone(),
            value: value.to_string(),
        };
        let mismatch = |expected: &str| SpaceError::TypeMismatch {
            name: self.name.clone(),
            expected: expected.to_string(),
            value: value.to_string(),
        };

        match &self.kind {
            HyperparameterKind::Float { low, high, .. } => {
                let v = match value {
                    ParameterValue::Json(_) => return Err(mismatch("float")),
                    other => other.as_f64().ok_or_else(|| mismatch("float"))?,
                };
                if !v.is_finite() || v < *low || v > *high {
                    return Err(out_of_domain());
                }
                Ok(ParameterValue::Float(v))
            }
            HyperparameterKind::Int { low, high, .. } => {
                let v = match value {
                    ParameterValue::Json(_) => return Err(mismatch("integer")),
                    other => other.as_i64().ok_or_else(|| mismatch("integer"))?,
                };
                if v < *low || v > *high {
                    return Err(out_of_domain());
                }
                Ok(ParameterValue::Int(v))
            }
            HyperparameterKind::Categorical { choices } => {
                let json = value.to_json();
                choices
                    .iter()
                    .find(|choice| **choice == json)
                    .map(|choice| ParameterValue::Json(choice.clone()))
                    .ok_or_else(out_of_domain)
            }
            HyperparameterKind::Constant { value: constant } => {
                if constant.loosely_eq(value) {
                    Ok(constant.clone())
                } else {
                    Err(out_of_domain())
                }
            }
        }
    }

    /// Draw a value uniformly (log-uniformly for log ranges).
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ParameterValue {
        match &self.kind {
            HyperparameterKind::Float { .. }
            | HyperparameterKind::Int { .. }
            | HyperparameterKind::Categorical { .. } => self.from_unit(rng.gen::<f64>()),
            HyperparameterKind::Constant { value } => value.clone(),
        }
    }

    /// Map a coordinate of the unit interval onto the domain.
    pub fn from_unit(&self, u: f64) -> ParameterValue {
        let u = u.clamp(0.0, 1.0);
        match &self.kind {
            HyperparameterKind::Float { low, high, log } => {
                let v = if *log {
                    (low.ln() + u * (high.ln() - low.ln())).exp()
                } else {
                    low * (1.0 - u) + high * u
                };
                ParameterValue::Float(v.clamp(*low, *high))
            }
            HyperparameterKind::Int { low, high, log } => {
                let (l, h) = (*low as f64, *high as f64 + 1.0);
                let v = if *log {
                    (l.ln() + u * (h.ln() - l.ln())).exp()
                } else {
                    l + u * (h - l)
                };
                ParameterValue::Int((v.floor() as i64).clamp(*low, *high))
            }
            HyperparameterKind::Categorical { choices } => {
                let idx = ((u * choices.len() as f64) as usize).min(choices.len().saturating_sub(1));
                ParameterValue::Json(choices.get(idx).cloned().unwrap_or(serde_json::Value::Null))
            }
            HyperparameterKind::Constant { value } => value.clone(),
        }
    }

    /// The two-level (or per-choice) values used by factorial designs, plus
    /// the centre value.
    pub fn factorial_levels(&self) -> (Vec<ParameterValue>, ParameterValue) {
        match &self.kind {
            HyperparameterKind::Float { low, high, .. } => (
                vec![ParameterValue::Float(*low), ParameterValue::Float(*high)],
                self.from_unit(0.5),
            ),
            HyperparameterKind::Int { low, high, .. } => (
                vec![ParameterValue::Int(*low), ParameterValue::Int(*high)],
                ParameterValue::Int(int_midpoint(*low, *high)),
            ),
            HyperparameterKind::Categorical { choices } => (
                choices.iter().cloned().map(ParameterValue::Json).collect(),
                self.from_unit(0.0),
            ),
            HyperparameterKind::Constant { value } => (vec![value.clone()], value.clone()),
        }
    }

    fn check_definition(&self) -> Result<(), SpaceError> {
        let invalid = |message: &str| SpaceError::InvalidDefinition {
            name: self.name.clone(),
            message: message.to_string(),
        };

        if self.name.is_empty() {
            return Err(invalid("name must not be empty"));
        }
        match &self.kind {
            HyperparameterKind::Float { low, high, log } => {
                if !low.is_finite() || !high.is_finite() || low > high {
                    return Err(invalid("range must be finite with low <= high"));
                }
                if *log && *low <= 0.0 {
                    return Err(invalid("log range requires a positive lower bound"));
                }
            }
            HyperparameterKind::Int { low, high, log } => {
                if low > high {
                    return Err(invalid("range must satisfy low <= high"));
                }
                if *log && *low < 1 {
                    return Err(invalid("log range requires a lower bound of at least 1"));
                }
            }
            HyperparameterKind::Categorical { choices } => {
                if choices.is_empty() {
                    return Err(invalid("at least one choice is required"));
                }
            }
            HyperparameterKind::Constant { .. } => {}
        }
        if let Some(default) = &self.default {
            self.normalize(default)?;
        }
        Ok(())
    }
}

// Both midpoints stay inside [low, high] for the full range of the type.
fn float_midpoint(low: f64, high: f64) -> f64 {
    low / 2.0 + high / 2.0
}

fn int_midpoint(low: i64, high: i64) -> i64 {
    low + ((i128::from(high) - i128::from(low)) / 2) as i64
}

/// A clause that rules out combinations of hyperparameter values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForbiddenClause {
    Equals { name: String, value: ParameterValue },
    And(Vec<ForbiddenClause>),
}

impl ForbiddenClause {
    pub fn equals(name: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        Self::Equals {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, values: &BTreeMap<String, ParameterValue>) -> bool {
        match self {
            Self::Equals { name, value } => values.get(name).is_some_and(|v| v.loosely_eq(value)),
            Self::And(clauses) => !clauses.is_empty() && clauses.iter().all(|c| c.matches(values)),
        }
    }
}

impl fmt::Display for ForbiddenClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals { name, value } => write!(f, "{name} == {value}"),
            Self::And(clauses) => {
                write!(f, "(")?;
                for (i, clause) in clauses.iter().enumerate() {
                    if i > 0 {
                        write!(f, " && ")?;
                    }
                    write!(f, "{clause}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// The full configuration space: an ordered list of hyperparameters plus
/// forbidden clauses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigurationSpace {
    pub hyperparameters: Vec<Hyperparameter>,
    #[serde(default)]
    pub forbidden: Vec<ForbiddenClause>,
}

impl ConfigurationSpace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, hyperparameter: Hyperparameter) -> Self {
        self.hyperparameters.push(hyperparameter);
        self
    }

    pub fn add_float(self, name: impl Into<String>, low: f64, high: f64) -> Self {
        self.add(Hyperparameter::float(name, low, high))
    }

    pub fn add_log_float(self, name: impl Into<String>, low: f64, high: f64) -> Self {
        self.add(Hyperparameter::log_float(name, low, high))
    }

    pub fn add_int(self, name: impl Into<String>, low: i64, high: i64) -> Self {
        self.add(Hyperparameter::int(name, low, high))
    }

    pub fn add_categorical(self, name: impl Into<String>, choices: Vec<serde_json::Value>) -> Self {
        self.add(Hyperparameter::categorical(name, choices))
    }

    pub fn add_constant(self, name: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        self.add(Hyperparameter::constant(name, value))
    }

    pub fn add_forbidden(mut self, clause: ForbiddenClause) -> Self {
        self.forbidden.push(clause);
        self
    }

    /// Number of declared hyperparameters.
    pub fn len(&self) -> usize {
        self.hyperparameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hyperparameters.is_empty()
    }

    pub fn hyperparameter(&self, name: &str) -> Option<&Hyperparameter> {
        self.hyperparameters.iter().find(|hp| hp.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.hyperparameters.iter().map(|hp| hp.name.as_str())
    }

    /// Validate the space definition itself.
    pub fn check(&self) -> Result<(), SpaceError> {
        let mut seen = HashSet::new();
        for hp in &self.hyperparameters {
            hp.check_definition()?;
            if !seen.insert(hp.name.as_str()) {
                return Err(SpaceError::InvalidDefinition {
                    name: hp.name.clone(),
                    message: "duplicate hyperparameter name".to_string(),
                });
            }
        }
        self.forbidden_check(&self.default_values())
    }

    pub fn default_configuration(&self) -> Result<Configuration, SpaceError> {
        let values = self.default_values();
        self.forbidden_check(&values)?;
        Ok(Configuration::from_validated(values))
    }

    /// Check every value of `values` against its domain and the forbidden
    /// clauses; returns the canonical value map.
    pub fn normalize(
        &self,
        values: &BTreeMap<String, ParameterValue>,
    ) -> Result<BTreeMap<String, ParameterValue>, SpaceError> {
        if let Some(unknown) = values.keys().find(|name| self.hyperparameter(name).is_none()) {
            return Err(SpaceError::UnknownHyperparameter {
                name: unknown.clone(),
            });
        }
        let mut normalized = BTreeMap::new();
        for hp in &self.hyperparameters {
            let value = values.get(&hp.name).ok_or_else(|| SpaceError::MissingValue {
                name: hp.name.clone(),
            })?;
            normalized.insert(hp.name.clone(), hp.normalize(value)?);
        }
        self.forbidden_check(&normalized)?;
        Ok(normalized)
    }

    /// Membership check for an existing configuration.
    pub fn validate(&self, config: &Configuration) -> Result<(), SpaceError> {
        self.normalize(config.values()).map(|_| ())
    }

    /// Draw one configuration uniformly, rejecting forbidden combinations.
    pub fn sample_configuration<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Configuration, SpaceError> {
        for _ in 0..MAX_SAMPLING_ATTEMPTS {
            let values: BTreeMap<_, _> = self
                .hyperparameters
                .iter()
                .map(|hp| (hp.name.clone(), hp.sample(rng)))
                .collect();
            if self.forbidden_check(&values).is_ok() {
                return Ok(Configuration::from_validated(values));
            }
        }
        Err(SpaceError::SamplingExhausted {
            attempts: MAX_SAMPLING_ATTEMPTS,
        })
    }

    /// Map a point of the unit hypercube (one coordinate per hyperparameter,
    /// in declaration order) onto a configuration.
    pub fn from_unit(&self, point: &[f64]) -> Result<Configuration, SpaceError> {
        if point.len() != self.len() {
            return Err(SpaceError::InvalidDefinition {
                name: "<space>".to_string(),
                message: format!(
                    "unit point has {} coordinates, space has {} hyperparameters",
                    point.len(),
                    self.len()
                ),
            });
        }
        let values: BTreeMap<_, _> = self
            .hyperparameters
            .iter()
            .zip(point)
            .map(|(hp, u)| (hp.name.clone(), hp.from_unit(*u)))
            .collect();
        self.forbidden_check(&values)?;
        Ok(Configuration::from_validated(values))
    }

    fn default_values(&self) -> BTreeMap<String, ParameterValue> {
        self.hyperparameters
            .iter()
            .map(|hp| (hp.name.clone(), hp.default_value()))
            .collect()
    }

    fn forbidden_check(&self, values: &BTreeMap<String, ParameterValue>) -> Result<(), SpaceError> {
        match self.forbidden.iter().find(|clause| clause.matches(values)) {
            Some(clause) => Err(SpaceError::Forbidden {
                clause: clause.to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use serde_json::json;

    fn sample_space() -> ConfigurationSpace {
        ConfigurationSpace::new()
            .add(Hyperparameter::float("alpha", 0.0, 1.0).with_default(1.0))
            .add_int("max_depth", 1, 10)
            .add_log_float("eta0", 1e-5, 1.0)
            .add_categorical(
                "learning_rate",
                vec![json!("constant"), json!("invscaling"), json!("adaptive")],
            )
            .add_constant("loss", "log")
    }

    #[test]
    fn default_configuration_uses_explicit_and_derived_defaults() {
        let config = sample_space().default_configuration().unwrap();
        assert_eq!(config.get("alpha"), Some(&ParameterValue::Float(1.0)));
        assert_eq!(config.get("max_depth"), Some(&ParameterValue::Int(5)));
        assert_eq!(
            config.get("learning_rate"),
            Some(&ParameterValue::Json(json!("constant")))
        );
        assert_eq!(config.get("loss"), Some(&ParameterValue::Json(json!("log"))));
        match config.get("eta0") {
            Some(ParameterValue::Float(v)) => assert!((v - 10f64.powf(-2.5)).abs() < 1e-12),
            other => panic!("unexpected eta0 value: {other:?}"),
        }
    }

    #[test]
    fn sampling_respects_bounds() {
        let space = sample_space();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let config = space.sample_configuration(&mut rng).unwrap();
            space.validate(&config).unwrap();
            match config.get("eta0") {
                Some(ParameterValue::Float(v)) => assert!(*v >= 1e-5 && *v <= 1.0),
                other => panic!("unexpected eta0 value: {other:?}"),
            }
        }
    }

    #[test]
    fn integral_value_is_accepted_for_float() {
        let space = ConfigurationSpace::new().add_float("x1", 1.0, 10.0);
        let mut values = BTreeMap::new();
        values.insert("x1".to_string(), ParameterValue::Int(4));
        let normalized = space.normalize(&values).unwrap();
        assert_eq!(normalized["x1"], ParameterValue::Float(4.0));
    }

    #[test]
    fn out_of_domain_and_unknown_names_are_rejected() {
        let space = ConfigurationSpace::new().add_float("x1", 1.0, 10.0);

        let mut values = BTreeMap::new();
        values.insert("x1".to_string(), ParameterValue::Float(11.0));
        assert!(matches!(
            space.normalize(&values),
            Err(SpaceError::OutOfDomain { .. })
        ));

        values.insert("x1".to_string(), ParameterValue::Float(2.0));
        values.insert("x2".to_string(), ParameterValue::Float(2.0));
        assert_eq!(
            space.normalize(&values),
            Err(SpaceError::UnknownHyperparameter { name: "x2".into() })
        );

        assert_eq!(
            space.normalize(&BTreeMap::new()),
            Err(SpaceError::MissingValue { name: "x1".into() })
        );
    }

    #[test]
    fn forbidden_clauses_reject_matching_values() {
        let space = ConfigurationSpace::new()
            .add_categorical("penalty", vec![json!("l1"), json!("l2")])
            .add_categorical("dual", vec![json!(true), json!(false)])
            .add_forbidden(ForbiddenClause::And(vec![
                ForbiddenClause::equals("penalty", "l1"),
                ForbiddenClause::equals("dual", true),
            ]));

        let mut values = BTreeMap::new();
        values.insert("penalty".to_string(), ParameterValue::from("l1"));
        values.insert("dual".to_string(), ParameterValue::from(true));
        assert!(matches!(
            space.normalize(&values),
            Err(SpaceError::Forbidden { .. })
        ));

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            let config = space.sample_configuration(&mut rng).unwrap();
            assert!(!space.forbidden[0].matches(config.values()));
        }
    }

    #[test]
    fn fully_forbidden_space_exhausts_sampling() {
        let space = ConfigurationSpace::new()
            .add_constant("c", 1)
            .add_forbidden(ForbiddenClause::equals("c", 1));
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(
            space.sample_configuration(&mut rng),
            Err(SpaceError::SamplingExhausted {
                attempts: MAX_SAMPLING_ATTEMPTS
            })
        );
        assert!(space.check().is_err());
    }

    #[test]
    fn from_unit_maps_corners() {
        let space = ConfigurationSpace::new()
            .add_float("x", -1.0, 1.0)
            .add_int("n", 1, 4)
            .add_categorical("c", vec![json!("a"), json!("b")]);

        let low = space.from_unit(&[0.0, 0.0, 0.0]).unwrap();
        assert_eq!(low.get("x"), Some(&ParameterValue::Float(-1.0)));
        assert_eq!(low.get("n"), Some(&ParameterValue::Int(1)));
        assert_eq!(low.get("c"), Some(&ParameterValue::Json(json!("a"))));

        let high = space.from_unit(&[1.0, 1.0, 1.0]).unwrap();
        assert_eq!(high.get("x"), Some(&ParameterValue::Float(1.0)));
        assert_eq!(high.get("n"), Some(&ParameterValue::Int(4)));
        assert_eq!(high.get("c"), Some(&ParameterValue::Json(json!("b"))));

        assert!(space.from_unit(&[0.5]).is_err());
    }

    #[test]
    fn full_width_ranges_stay_in_domain() {
        let space = ConfigurationSpace::new()
            .add_int("n", i64::MIN, i64::MAX)
            .add_float("x", -f64::MAX, f64::MAX);
        space.check().unwrap();

        let config = space.default_configuration().unwrap();
        assert_eq!(config.get("n"), Some(&ParameterValue::Int(-1)));
        assert_eq!(config.get("x"), Some(&ParameterValue::Float(0.0)));

        for u in [0.0, 0.5, 1.0] {
            let config = space.from_unit(&[u, u]).unwrap();
            space.validate(&config).unwrap();
        }
        let (_, centre) = space.hyperparameter("n").unwrap().factorial_levels();
        assert_eq!(centre, ParameterValue::Int(-1));
    }

    #[test]
    fn check_rejects_bad_definitions() {
        assert!(ConfigurationSpace::new().add_float("x", 2.0, 1.0).check().is_err());
        assert!(ConfigurationSpace::new().add_log_float("x", 0.0, 1.0).check().is_err());
        assert!(ConfigurationSpace::new().add_categorical("c", vec![]).check().is_err());
        assert!(ConfigurationSpace::new()
            .add_float("x", 0.0, 1.0)
            .add_float("x", 0.0, 1.0)
            .check()
            .is_err());
        assert!(ConfigurationSpace::new()
            .add(Hyperparameter::int("n", 1, 3).with_default(7))
            .check()
            .is_err());
        assert!(sample_space().check().is_ok());
    }

    proptest::proptest! {
        #[test]
        fn any_unit_point_maps_into_the_space(
            point in proptest::collection::vec(0.0f64..=1.0, 5),
        ) {
            let space = sample_space();
            let config = space.from_unit(&point).unwrap();
            proptest::prop_assert!(space.validate(&config).is_ok());
        }
    }

    #[test]
    fn space_deserializes_from_json() {
        let space: ConfigurationSpace = serde_json::from_value(json!({
            "hyperparameters": [
                {"name": "x1", "kind": {"Float": {"low": 1.0, "high": 10.0}}, "default": 1},
                {"name": "opt", "kind": {"Categorical": {"choices": ["sgd", "adam"]}}}
            ]
        }))
        .unwrap();
        assert_eq!(space.len(), 2);
        assert!(space.check().is_ok());
        let default = space.default_configuration().unwrap();
        assert_eq!(default.get("x1"), Some(&ParameterValue::Float(1.0)));
    }
}
