//! In-memory control plane
//!
//! Descriptors and configuration-store entries held in maps. Used by tests
//! and by `--fixture` on the command line.
//!
//! Fixture format (YAML):
//!
//! ```yaml
//! stacks:
//!   - name: vpc-stack
//!     region: us-east-1
//!     status: UPDATE_COMPLETE
//!     outputs:
//!       VpcId: vpc-123
//! parameters:
//!   /vpc-stack/cidr: 10.0.0.0/16
//! errors:
//!   broken-stack: "An error occurred (AccessDenied)"
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::Deserialize;

use crate::domain::entities::{ConfigEntry, StackDescriptor};
use crate::domain::ports::{ControlPlane, ControlPlaneConnector, ControlPlaneError, ProfileConfig};
use crate::error::{StackgateError, StackgateResult};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Fixture {
    #[serde(default)]
    stacks: Vec<StackDescriptor>,
    #[serde(default)]
    parameters: BTreeMap<String, String>,
    #[serde(default)]
    errors: BTreeMap<String, String>,
}

/// Connector and session over in-memory state
///
/// Clones share the describe-call log, so a test can keep one handle and
/// give another to the inspector.
#[derive(Debug, Clone, Default)]
pub struct InMemoryControlPlane {
    stacks: BTreeMap<String, StackDescriptor>,
    parameters: BTreeMap<String, String>,
    describe_errors: BTreeMap<String, String>,
    prefix_errors: BTreeMap<String, String>,
    connect_error: Option<String>,
    describe_calls: Arc<Mutex<Vec<String>>>,
}

impl InMemoryControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a fixture file
    pub fn from_fixture(path: &Path) -> StackgateResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let fixture: Fixture =
            serde_yaml_ng::from_str(&content).map_err(|e| StackgateError::InvalidFixture {
                file: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut plane = Self::new();
        for stack in fixture.stacks {
            plane = plane.with_stack(stack);
        }
        for (name, value) in fixture.parameters {
            plane = plane.with_parameter(name, value);
        }
        for (stack, message) in fixture.errors {
            plane = plane.with_describe_error(stack, message);
        }
        Ok(plane)
    }

    pub fn with_stack(mut self, descriptor: StackDescriptor) -> Self {
        self.stacks
            .insert(descriptor.name.to_string(), descriptor);
        self
    }

    /// Add a configuration-store entry (full path name)
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Make `describe_stack(stack)` fail with `message`
    pub fn with_describe_error(mut self, stack: impl Into<String>, message: impl Into<String>) -> Self {
        self.describe_errors.insert(stack.into(), message.into());
        self
    }

    /// Make `parameters_by_path(prefix)` fail with `message`
    pub fn with_prefix_error(mut self, prefix: impl Into<String>, message: impl Into<String>) -> Self {
        self.prefix_errors.insert(prefix.into(), message.into());
        self
    }

    /// Make `connect` fail with `message`
    pub fn with_connect_error(mut self, message: impl Into<String>) -> Self {
        self.connect_error = Some(message.into());
        self
    }

    /// Stack names passed to `describe_stack`, in call order
    pub fn describe_calls(&self) -> Vec<String> {
        self.describe_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl ControlPlaneConnector for InMemoryControlPlane {
    fn connect(&self, _profile: &ProfileConfig) -> Result<Box<dyn ControlPlane>, ControlPlaneError> {
        if let Some(message) = &self.connect_error {
            return Err(ControlPlaneError::Unavailable(message.clone()));
        }
        Ok(Box::new(self.clone()))
    }
}

impl ControlPlane for InMemoryControlPlane {
    fn describe_stack(&self, name: &str) -> Result<Option<StackDescriptor>, ControlPlaneError> {
        if let Ok(mut calls) = self.describe_calls.lock() {
            calls.push(name.to_string());
        }
        if let Some(message) = self.describe_errors.get(name) {
            return Err(ControlPlaneError::CommandFailed {
                message: message.clone(),
            });
        }
        Ok(self.stacks.get(name).cloned())
    }

    fn parameters_by_path(&self, prefix: &str) -> Result<Vec<ConfigEntry>, ControlPlaneError> {
        if let Some(message) = self.prefix_errors.get(prefix) {
            return Err(ControlPlaneError::CommandFailed {
                message: message.clone(),
            });
        }
        Ok(self
            .parameters
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(name, value)| ConfigEntry::new(name.as_str(), value.as_str()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::StackStatus;
    use tempfile::tempdir;

    #[test]
    fn fixture_loads_stacks_parameters_and_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fixture.yml");
        std::fs::write(
            &path,
            r#"
stacks:
  - name: vpc-stack
    region: us-east-1
    status: UPDATE_COMPLETE
    outputs:
      VpcId: vpc-123
parameters:
  /vpc-stack/cidr: 10.0.0.0/16
errors:
  broken-stack: "An error occurred (AccessDenied)"
"#,
        )
        .unwrap();

        let plane = InMemoryControlPlane::from_fixture(&path).unwrap();
        let vpc = plane.describe_stack("vpc-stack").unwrap().unwrap();
        assert_eq!(vpc.status, StackStatus::UpdateComplete);
        assert_eq!(vpc.outputs["VpcId"], "vpc-123");

        let entries = plane.parameters_by_path("/vpc-stack/").unwrap();
        assert_eq!(entries, vec![ConfigEntry::new("/vpc-stack/cidr", "10.0.0.0/16")]);

        assert!(plane.describe_stack("broken-stack").is_err());
        assert!(plane.describe_stack("absent-stack").unwrap().is_none());
        assert_eq!(
            plane.describe_calls(),
            vec!["vpc-stack", "broken-stack", "absent-stack"]
        );
    }

    #[test]
    fn fixture_rejects_unknown_sections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fixture.yml");
        std::fs::write(&path, "stack: []\n").unwrap();

        let err = InMemoryControlPlane::from_fixture(&path).unwrap_err();
        assert!(matches!(err, StackgateError::InvalidFixture { .. }));
    }

    #[test]
    fn connect_error_is_unavailable() {
        let plane = InMemoryControlPlane::new().with_connect_error("no credentials");
        let err = plane.connect(&ProfileConfig::new("us-east-1")).err().unwrap();
        assert_eq!(err, ControlPlaneError::Unavailable("no credentials".to_string()));
    }
}
