//! Event Port
//!
//! Publish-only notification channel for scanning, inspection, resolution,
//! and remote deployment. Sinks are passed explicitly to every component.
//! Delivery is synchronous, in emission order, with no acknowledgement.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::{json, Value};

use crate::domain::entities::ReferenceKind;
use crate::domain::services::FailureClass;
use crate::domain::value_objects::StackIdentifier;

/// Event sources
pub const SOURCE_SCANNER: &str = "dependency-scanner";
pub const SOURCE_INSPECTOR: &str = "stack-inspector";
pub const SOURCE_RESOLVER: &str = "environment-resolver";
pub const SOURCE_REMOTE_DEPLOY: &str = "remote-deploy";

/// Completion record of one deployment request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentOutcome {
    pub service: String,
    /// Dependency being processed when the request failed
    pub dependency_stack: Option<StackIdentifier>,
    pub success: bool,
    pub duration_seconds: u64,
    pub error: Option<String>,
}

/// Event emitted by the resolver subsystem
#[derive(Debug, Clone, PartialEq)]
pub enum ResolverEvent {
    /// A reference to another stack was found in a config document
    DependencyDetected {
        kind: ReferenceKind,
        source_file: PathBuf,
        target: StackIdentifier,
        output_name: Option<String>,
    },

    /// Stack inspection is about to start
    InspectionStarted { stack: String, region: String },

    /// Stack inspection produced requirements
    InspectionCompleted {
        stack: StackIdentifier,
        status: String,
        ready: bool,
        dependencies: Vec<StackIdentifier>,
    },

    /// Stack inspection failed (including "stack not found")
    InspectionFailed {
        stack: String,
        error: String,
        class: FailureClass,
        recommendations: Vec<String>,
    },

    /// Every required variable resolved
    EnvironmentValidated {
        service: String,
        environment: String,
        resolved_count: usize,
        missing: Vec<String>,
    },

    /// At least one required variable has no source
    EnvironmentValidationFailed {
        service: String,
        environment: String,
        resolved_count: usize,
        missing: Vec<String>,
    },

    /// Remote deployment request started
    RemoteDeployStarted {
        service: String,
        dependencies: Vec<StackIdentifier>,
        environment: String,
        stage: String,
    },

    /// Remote deployment request succeeded
    RemoteDeployCompleted(DeploymentOutcome),

    /// Remote deployment request failed
    RemoteDeployFailed(DeploymentOutcome),
}

impl ResolverEvent {
    /// Stable event name
    pub fn name(&self) -> &'static str {
        match self {
            ResolverEvent::DependencyDetected { .. } => "dependency:detected",
            ResolverEvent::InspectionStarted { .. } => "stack:inspect:before",
            ResolverEvent::InspectionCompleted { .. } => "stack:inspect:after",
            ResolverEvent::InspectionFailed { .. } => "stack:inspect:failed",
            ResolverEvent::EnvironmentValidated { .. } => "env:validated",
            ResolverEvent::EnvironmentValidationFailed { .. } => "env:validation-failed",
            ResolverEvent::RemoteDeployStarted { .. } => "deploy:remote:start",
            ResolverEvent::RemoteDeployCompleted(_) => "deploy:remote:complete",
            ResolverEvent::RemoteDeployFailed(_) => "deploy:remote:failed",
        }
    }

    /// Structured payload (a JSON object)
    pub fn payload(&self) -> Value {
        match self {
            ResolverEvent::DependencyDetected {
                kind,
                source_file,
                target,
                output_name,
            } => json!({
                "kind": kind,
                "source_file": source_file.display().to_string(),
                "target": target,
                "output_name": output_name,
            }),

            ResolverEvent::InspectionStarted { stack, region } => json!({
                "stack": stack,
                "region": region,
            }),

            ResolverEvent::InspectionCompleted {
                stack,
                status,
                ready,
                dependencies,
            } => json!({
                "stack": stack,
                "status": status,
                "ready": ready,
                "dependencies": dependencies,
            }),

            ResolverEvent::InspectionFailed {
                stack,
                error,
                class,
                recommendations,
            } => json!({
                "stack": stack,
                "error": error,
                "class": class,
                "recommendations": recommendations,
            }),

            ResolverEvent::EnvironmentValidated {
                service,
                environment,
                resolved_count,
                missing,
            }
            | ResolverEvent::EnvironmentValidationFailed {
                service,
                environment,
                resolved_count,
                missing,
            } => json!({
                "service": service,
                "environment": environment,
                "resolved": resolved_count,
                "missing": missing,
            }),

            ResolverEvent::RemoteDeployStarted {
                service,
                dependencies,
                environment,
                stage,
            } => json!({
                "service": service,
                "dependencies": dependencies,
                "environment": environment,
                "stage": stage,
            }),

            ResolverEvent::RemoteDeployCompleted(outcome)
            | ResolverEvent::RemoteDeployFailed(outcome) => {
                serde_json::to_value(outcome).unwrap_or(Value::Null)
            }
        }
    }
}

/// Trait for receiving resolver events
///
/// Implementations:
/// - `NoopEventSink`: silent operation
/// - `JsonEventSink`: NDJSON stream for CI
/// - `TracingEventSink`: mirrors events into the log
pub trait EventSink: Send + Sync {
    /// Publish one event on behalf of `source`
    fn publish(&self, event: &ResolverEvent, source: &str);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn publish(&self, _event: &ResolverEvent, _source: &str) {
        // Do nothing
    }
}
