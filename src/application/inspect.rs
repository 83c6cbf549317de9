//! Stack Inspector
//!
//! Reads one stack from the control plane and turns it into
//! `StackRequirements`:
//! 1. Connect a session for the profile
//! 2. Describe the stack (absent stack is a typed failure)
//! 3. Probe the configuration store (best effort, failures skipped)
//! 4. Derive variables, dependencies and readiness
//!
//! Every inspection emits `stack:inspect:before` and then exactly one of
//! `stack:inspect:after` / `stack:inspect:failed`.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::entities::StackRequirements;
use crate::domain::ports::{
    ControlPlane, ControlPlaneConnector, EventSink, ProfileConfig, ResolverEvent, SOURCE_INSPECTOR,
};
use crate::domain::services::{
    config_store_prefixes, derive_requirements, flatten_config_entries, FailureClass,
};
use crate::domain::value_objects::StackIdentifier;

/// A failed inspection, with guidance for the operator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectionFailure {
    pub stack: String,
    pub error: String,
    pub class: FailureClass,
    pub recommendations: Vec<String>,
}

/// Outcome of one inspection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "kebab-case")]
pub enum InspectionResult {
    Found(StackRequirements),
    Failed(InspectionFailure),
}

impl InspectionResult {
    pub fn is_found(&self) -> bool {
        matches!(self, InspectionResult::Found(_))
    }

    pub fn into_result(self) -> Result<StackRequirements, InspectionFailure> {
        match self {
            InspectionResult::Found(requirements) => Ok(requirements),
            InspectionResult::Failed(failure) => Err(failure),
        }
    }
}

/// Inspects stacks through a control plane connector
pub struct StackInspector {
    connector: Arc<dyn ControlPlaneConnector>,
    events: Arc<dyn EventSink>,
}

impl StackInspector {
    pub fn new(connector: Arc<dyn ControlPlaneConnector>, events: Arc<dyn EventSink>) -> Self {
        Self { connector, events }
    }

    pub fn inspect(&self, stack: &StackIdentifier, profile: &ProfileConfig) -> InspectionResult {
        self.events.publish(
            &ResolverEvent::InspectionStarted {
                stack: stack.to_string(),
                region: profile.region.clone(),
            },
            SOURCE_INSPECTOR,
        );

        let session = match self.connector.connect(profile) {
            Ok(session) => session,
            Err(err) => return self.fail(stack, profile, err.to_string(), None),
        };

        let descriptor = match session.describe_stack(stack.as_str()) {
            Ok(Some(descriptor)) => descriptor,
            Ok(None) => {
                return self.fail(
                    stack,
                    profile,
                    format!("Stack with id {stack} does not exist"),
                    Some(FailureClass::StackMissing),
                )
            }
            Err(err) => return self.fail(stack, profile, err.to_string(), None),
        };

        let store_values = probe_config_store(session.as_ref(), stack);
        let mut requirements = derive_requirements(descriptor, store_values);
        if requirements.region.is_empty() {
            requirements.region = profile.region.clone();
        }

        tracing::debug!(
            stack = %stack,
            status = %requirements.status,
            variables = requirements.environment_variables.len(),
            "inspected stack"
        );
        self.events.publish(
            &ResolverEvent::InspectionCompleted {
                stack: requirements.stack_name.clone(),
                status: requirements.status.to_string(),
                ready: requirements.ready_for_deployment(),
                dependencies: requirements.dependencies.iter().cloned().collect(),
            },
            SOURCE_INSPECTOR,
        );
        InspectionResult::Found(requirements)
    }

    fn fail(
        &self,
        stack: &StackIdentifier,
        profile: &ProfileConfig,
        error: String,
        class: Option<FailureClass>,
    ) -> InspectionResult {
        let class = class.unwrap_or_else(|| FailureClass::classify(&error));
        let failure = InspectionFailure {
            stack: stack.to_string(),
            recommendations: class.recommendations(
                stack.as_str(),
                &profile.region,
                profile.profile.as_deref(),
            ),
            error,
            class,
        };

        self.events.publish(
            &ResolverEvent::InspectionFailed {
                stack: failure.stack.clone(),
                error: failure.error.clone(),
                class: failure.class,
                recommendations: failure.recommendations.clone(),
            },
            SOURCE_INSPECTOR,
        );
        InspectionResult::Failed(failure)
    }
}

/// Flattened store values for `stack`; earlier prefixes win
fn probe_config_store(session: &dyn ControlPlane, stack: &StackIdentifier) -> BTreeMap<String, String> {
    let mut values = BTreeMap::new();
    for prefix in config_store_prefixes(stack) {
        match session.parameters_by_path(&prefix) {
            Ok(entries) => flatten_config_entries(&prefix, &entries, &mut values),
            Err(err) => tracing::debug!(prefix = %prefix, error = %err, "config store probe skipped"),
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::StackDescriptor;
    use crate::domain::value_objects::StackStatus;
    use crate::infrastructure::control_plane::InMemoryControlPlane;
    use std::sync::Mutex;

    struct RecordingEventSink {
        names: Arc<Mutex<Vec<&'static str>>>,
    }

    impl EventSink for RecordingEventSink {
        fn publish(&self, event: &ResolverEvent, _source: &str) {
            self.names.lock().unwrap().push(event.name());
        }
    }

    fn id(s: &str) -> StackIdentifier {
        StackIdentifier::new(s).unwrap()
    }

    fn inspector(plane: InMemoryControlPlane) -> (StackInspector, Arc<Mutex<Vec<&'static str>>>) {
        let names = Arc::new(Mutex::new(Vec::new()));
        let sink = RecordingEventSink {
            names: names.clone(),
        };
        (StackInspector::new(Arc::new(plane), Arc::new(sink)), names)
    }

    #[test]
    fn found_stack_merges_outputs_and_store() {
        let plane = InMemoryControlPlane::new()
            .with_stack(
                StackDescriptor::new(id("db-stack"), "", StackStatus::UpdateComplete)
                    .with_output("DbHost", "from-output")
                    .with_output("DbPort", "5432"),
            )
            .with_parameter("/db-stack/db/host", "from-store")
            .with_parameter("/shared/db-stack/db/host", "shadowed")
            .with_parameter("/shared/db-stack/pool-size", "10");
        let (inspector, names) = inspector(plane);

        let result = inspector.inspect(&id("db-stack"), &ProfileConfig::new("us-east-1"));
        let reqs = result.into_result().unwrap();

        assert_eq!(reqs.region, "us-east-1");
        assert_eq!(reqs.environment_variables["DB_HOST"], "from-store");
        assert_eq!(reqs.environment_variables["DB_PORT"], "5432");
        assert_eq!(reqs.environment_variables["POOL_SIZE"], "10");
        assert!(reqs.ready_for_deployment());
        assert_eq!(*names.lock().unwrap(), vec!["stack:inspect:before", "stack:inspect:after"]);
    }

    #[test]
    fn missing_stack_is_a_typed_failure() {
        let (inspector, names) = inspector(InMemoryControlPlane::new());

        let result = inspector.inspect(&id("vpc-stack"), &ProfileConfig::new("us-east-1"));
        let InspectionResult::Failed(failure) = result else {
            panic!("expected failure");
        };
        assert_eq!(failure.class, FailureClass::StackMissing);
        assert!(failure.error.contains("does not exist"));
        assert!(failure.recommendations[0].contains("vpc-stack"));
        assert_eq!(*names.lock().unwrap(), vec!["stack:inspect:before", "stack:inspect:failed"]);
    }

    #[test]
    fn describe_error_is_classified() {
        let plane = InMemoryControlPlane::new().with_describe_error(
            "vpc-stack",
            "An error occurred (AccessDenied) when calling the DescribeStacks operation",
        );
        let (inspector, _) = inspector(plane);

        let result = inspector.inspect(
            &id("vpc-stack"),
            &ProfileConfig::new("us-east-1").with_profile("ci"),
        );
        let failure = result.into_result().unwrap_err();
        assert_eq!(failure.class, FailureClass::Authorization);
        assert!(failure.recommendations[0].contains("'ci'"));
    }

    #[test]
    fn connect_error_is_classified() {
        let plane = InMemoryControlPlane::new().with_connect_error("Unable to locate credentials");
        let (inspector, names) = inspector(plane);

        let failure = inspector
            .inspect(&id("vpc-stack"), &ProfileConfig::new("us-east-1"))
            .into_result()
            .unwrap_err();
        assert_eq!(failure.class, FailureClass::Authorization);
        assert_eq!(names.lock().unwrap().len(), 2);
    }

    #[test]
    fn failing_store_prefix_does_not_fail_inspection() {
        let plane = InMemoryControlPlane::new()
            .with_stack(StackDescriptor::new(id("vpc-stack"), "us-east-1", StackStatus::CreateComplete))
            .with_prefix_error("/vpc-stack/", "AccessDeniedException")
            .with_parameter("/infrastructure/vpc-stack/cidr", "10.0.0.0/16");
        let (inspector, _) = inspector(plane);

        let reqs = inspector
            .inspect(&id("vpc-stack"), &ProfileConfig::new("us-east-1"))
            .into_result()
            .unwrap();
        assert_eq!(reqs.environment_variables["CIDR"], "10.0.0.0/16");
    }

    #[test]
    fn rolled_back_stack_is_found_but_not_ready() {
        let plane = InMemoryControlPlane::new().with_stack(StackDescriptor::new(
            id("vpc-stack"),
            "us-east-1",
            StackStatus::parse("UPDATE_ROLLBACK_COMPLETE"),
        ));
        let (inspector, _) = inspector(plane);

        let result = inspector.inspect(&id("vpc-stack"), &ProfileConfig::new("us-east-1"));
        assert!(result.is_found());
        assert!(!result.into_result().unwrap().ready_for_deployment());
    }

    #[test]
    fn result_serializes_with_tag() {
        let (inspector, _) = inspector(InMemoryControlPlane::new());
        let json = serde_json::to_value(
            inspector.inspect(&id("vpc-stack"), &ProfileConfig::new("us-east-1")),
        )
        .unwrap();
        assert_eq!(json["result"], "failed");
        assert_eq!(json["class"], "stack-missing");
    }
}
