//! Validated points of a configuration space.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::SpaceError;
use crate::space::{ConfigurationSpace, ParameterValue};

/// An immutable assignment of values to every hyperparameter of a space.
///
/// Serializes as a flat `{name: value}` map. The `origin` label records
/// which design produced the configuration and is ignored by equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(flatten)]
    values: BTreeMap<String, ParameterValue>,
    #[serde(skip)]
    origin: Option<String>,
}

impl Configuration {
    /// Build and validate a configuration against `space` in one step.
    pub fn new<K, V>(
        space: &ConfigurationSpace,
        values: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, SpaceError>
    where
        K: Into<String>,
        V: Into<ParameterValue>,
    {
        let raw: BTreeMap<String, ParameterValue> = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Ok(Self::from_validated(space.normalize(&raw)?))
    }

    /// Re-validate against `space`, returning the canonical form. Used for
    /// configurations that arrived through deserialization.
    pub fn revalidate(&self, space: &ConfigurationSpace) -> Result<Self, SpaceError> {
        Ok(Self {
            values: space.normalize(&self.values)?,
            origin: self.origin.clone(),
        })
    }

    pub(crate) fn from_validated(values: BTreeMap<String, ParameterValue>) -> Self {
        Self {
            values,
            origin: None,
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name)
    }

    pub fn values(&self) -> &BTreeMap<String, ParameterValue> {
        &self.values
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

impl PartialEq for Configuration {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, "}}")
    }
}
