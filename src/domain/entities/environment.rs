//! Environment resolution result entity

use std::collections::BTreeMap;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Outcome of resolving a service's required variables
///
/// `valid` is not stored; it is `missing.is_empty()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentResolutionResult {
    /// Variables with no defined source, in declaration order
    pub missing: Vec<String>,
    pub resolved: BTreeMap<String, String>,
}

impl EnvironmentResolutionResult {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }
}

impl Serialize for EnvironmentResolutionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("EnvironmentResolutionResult", 3)?;
        s.serialize_field("valid", &self.is_valid())?;
        s.serialize_field("missing", &self.missing)?;
        s.serialize_field("resolved", &self.resolved)?;
        s.end()
    }
}
