//! Stack entities
//!
//! - `StackDescriptor`: the control plane's snapshot of one stack
//! - `ConfigEntry`: one configuration-store parameter
//! - `StackRequirements`: what a dependent service needs to know about a stack

use std::collections::{BTreeMap, BTreeSet};

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::value_objects::{StackIdentifier, StackStatus};

/// Immutable snapshot of a stack as reported by the control plane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackDescriptor {
    pub name: StackIdentifier,
    #[serde(default)]
    pub region: String,
    pub status: StackStatus,
    #[serde(default)]
    pub outputs: BTreeMap<String, String>,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl StackDescriptor {
    pub fn new(name: StackIdentifier, region: impl Into<String>, status: StackStatus) -> Self {
        Self {
            name,
            region: region.into(),
            status,
            outputs: BTreeMap::new(),
            parameters: BTreeMap::new(),
            tags: BTreeMap::new(),
        }
    }

    pub fn with_output(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.outputs.insert(key.into(), value.into());
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// A configuration-store parameter (full path name and value)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub name: String,
    pub value: String,
}

impl ConfigEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Everything a dependent service needs from one stack
///
/// Built fresh on every inspection and never mutated afterwards by this
/// crate. Readiness is not a field: it is always computed from `status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackRequirements {
    pub stack_name: StackIdentifier,
    pub region: String,
    pub outputs: BTreeMap<String, String>,
    pub parameters: BTreeMap<String, String>,
    /// Derived variables (output- and store-derived, store wins)
    pub environment_variables: BTreeMap<String, String>,
    pub dependencies: BTreeSet<StackIdentifier>,
    pub status: StackStatus,
    /// Flattened configuration-store values (prefix stripped)
    pub config_store_values: BTreeMap<String, String>,
}

impl StackRequirements {
    pub fn new(stack_name: StackIdentifier, region: impl Into<String>, status: StackStatus) -> Self {
        Self {
            stack_name,
            region: region.into(),
            outputs: BTreeMap::new(),
            parameters: BTreeMap::new(),
            environment_variables: BTreeMap::new(),
            dependencies: BTreeSet::new(),
            status,
            config_store_values: BTreeMap::new(),
        }
    }

    pub fn with_environment_variable(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.environment_variables.insert(name.into(), value.into());
        self
    }

    pub fn with_output(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.outputs.insert(key.into(), value.into());
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Whether dependents may deploy against this stack
    pub fn ready_for_deployment(&self) -> bool {
        self.status.is_ready()
    }

    /// Names of every variable this stack can supply
    pub fn available_variables(&self) -> Vec<&str> {
        self.environment_variables.keys().map(String::as_str).collect()
    }
}

impl Serialize for StackRequirements {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("StackRequirements", 9)?;
        s.serialize_field("stack_name", &self.stack_name)?;
        s.serialize_field("region", &self.region)?;
        s.serialize_field("outputs", &self.outputs)?;
        s.serialize_field("parameters", &self.parameters)?;
        s.serialize_field("environment_variables", &self.environment_variables)?;
        s.serialize_field("dependencies", &self.dependencies)?;
        s.serialize_field("status", &self.status)?;
        s.serialize_field("ready_for_deployment", &self.ready_for_deployment())?;
        s.serialize_field("config_store_values", &self.config_store_values)?;
        s.end()
    }
}
