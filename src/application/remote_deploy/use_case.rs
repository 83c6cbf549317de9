//! Remote Deploy Use Case
//!
//! Per dependency, in declaration order:
//! 1. Inspect the stack (failure is terminal)
//! 2. Gate on readiness (not ready is terminal)
//! 3. Resolve its variables against the overlay layered over the ambient
//!    environment (anything missing is terminal)
//! 4. Merge the resolved variables into the overlay
//!
//! Then delegate the local deployment exactly once with the overlay.
//! Each request emits one start event and one completion event carrying
//! the elapsed time.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use crate::application::inspect::{InspectionResult, StackInspector};
use crate::application::resolve_env::EnvironmentResolver;
use crate::domain::entities::{EnvironmentResolutionResult, StackRequirements};
use crate::domain::ports::{
    AmbientEnvironment, ControlPlaneConnector, DeploymentOutcome, EventSink, LayeredEnvironment,
    LocalDeployRequest, LocalDeployer, ProcessEnvironment, ResolverEvent, SOURCE_REMOTE_DEPLOY,
};
use crate::domain::services::env_naming::output_key_to_env_name;
use crate::domain::value_objects::{EnvOverlay, StackIdentifier};

use super::options::{EnvInjection, RemoteDeployRequest};
use super::result::{MissingVariable, RemoteDeployError, RemoteDeployReport};

/// Remote deploy use case - gates and delegates one service deployment
pub struct RemoteDeployUseCase<D>
where
    D: LocalDeployer,
{
    inspector: StackInspector,
    resolver: EnvironmentResolver,
    deployer: D,
    events: Arc<dyn EventSink>,
}

impl<D> RemoteDeployUseCase<D>
where
    D: LocalDeployer,
{
    pub fn new(
        connector: Arc<dyn ControlPlaneConnector>,
        deployer: D,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            inspector: StackInspector::new(connector, events.clone()),
            resolver: EnvironmentResolver::new(events.clone()),
            deployer,
            events,
        }
    }

    /// Execute against the process environment
    pub fn execute(
        &self,
        request: &RemoteDeployRequest,
    ) -> Result<RemoteDeployReport, RemoteDeployError> {
        self.execute_with_ambient(request, &ProcessEnvironment)
    }

    /// Execute against an explicit ambient environment
    pub fn execute_with_ambient(
        &self,
        request: &RemoteDeployRequest,
        ambient: &dyn AmbientEnvironment,
    ) -> Result<RemoteDeployReport, RemoteDeployError> {
        let started = Instant::now();
        let dependencies = dedupe(&request.dependencies);

        self.events.publish(
            &ResolverEvent::RemoteDeployStarted {
                service: request.service.clone(),
                dependencies: dependencies.clone(),
                environment: request.environment.clone(),
                stage: request.stage.clone(),
            },
            SOURCE_REMOTE_DEPLOY,
        );

        let mut current = None;
        let result = self.run(request, &dependencies, ambient, &mut current);
        let duration_seconds = started.elapsed().as_secs_f64().round() as u64;

        match result {
            Ok(environment) => {
                tracing::info!(
                    service = %request.service,
                    dependencies = dependencies.len(),
                    duration_seconds,
                    "remote deploy complete"
                );
                self.events.publish(
                    &ResolverEvent::RemoteDeployCompleted(DeploymentOutcome {
                        service: request.service.clone(),
                        dependency_stack: None,
                        success: true,
                        duration_seconds,
                        error: None,
                    }),
                    SOURCE_REMOTE_DEPLOY,
                );
                Ok(RemoteDeployReport {
                    service: request.service.clone(),
                    dependencies,
                    environment,
                    duration_seconds,
                })
            }
            Err(err) => {
                self.events.publish(
                    &ResolverEvent::RemoteDeployFailed(DeploymentOutcome {
                        service: request.service.clone(),
                        dependency_stack: current,
                        success: false,
                        duration_seconds,
                        error: Some(err.to_string()),
                    }),
                    SOURCE_REMOTE_DEPLOY,
                );
                Err(err)
            }
        }
    }

    fn run(
        &self,
        request: &RemoteDeployRequest,
        dependencies: &[StackIdentifier],
        ambient: &dyn AmbientEnvironment,
        current: &mut Option<StackIdentifier>,
    ) -> Result<EnvOverlay, RemoteDeployError> {
        let mut overlay = EnvOverlay::new();

        for stack in dependencies {
            *current = Some(stack.clone());

            let requirements = match self.inspector.inspect(stack, &request.profile) {
                InspectionResult::Found(requirements) => requirements,
                InspectionResult::Failed(failure) => {
                    return Err(RemoteDeployError::Inspection {
                        stack: failure.stack,
                        message: failure.error,
                        class: failure.class,
                        recommendations: failure.recommendations,
                    })
                }
            };

            if !requirements.ready_for_deployment() {
                return Err(RemoteDeployError::NotReady {
                    stack: stack.clone(),
                    status: requirements.status.to_string(),
                });
            }
            tracing::info!(stack = %stack, status = %requirements.status, "dependency ready");

            let resolution = {
                let layered = LayeredEnvironment::new(&overlay, ambient);
                self.resolver.resolve(
                    &layered,
                    &request.service,
                    &request.environment,
                    &requirements,
                )
            };
            if !resolution.is_valid() {
                return Err(missing_environment(
                    stack,
                    &request.environment,
                    &resolution,
                    &requirements,
                ));
            }

            if request.injection == EnvInjection::Process {
                for (name, value) in &resolution.resolved {
                    std::env::set_var(name, value);
                }
            }
            overlay.extend(resolution.resolved);
        }
        *current = None;

        tracing::debug!(
            service_path = %request.service_path.display(),
            variables = overlay.len(),
            "delegating local deployment"
        );
        self.deployer.deploy(&LocalDeployRequest {
            service_path: &request.service_path,
            stage: &request.stage,
            region: request.region.as_deref(),
            environment: &overlay,
        })?;

        Ok(overlay)
    }
}

/// Declaration order, first occurrence kept
fn dedupe(stacks: &[StackIdentifier]) -> Vec<StackIdentifier> {
    let mut seen = BTreeSet::new();
    stacks
        .iter()
        .filter(|s| seen.insert((*s).clone()))
        .cloned()
        .collect()
}

fn missing_environment(
    stack: &StackIdentifier,
    environment: &str,
    resolution: &EnvironmentResolutionResult,
    requirements: &StackRequirements,
) -> RemoteDeployError {
    let missing = resolution
        .missing
        .iter()
        .map(|name| MissingVariable {
            name: name.clone(),
            candidate: candidate_value(name, requirements),
        })
        .collect();

    RemoteDeployError::MissingEnvironment {
        stack: stack.clone(),
        environment: environment.to_string(),
        missing,
        available: requirements
            .available_variables()
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}

/// Derived variable, else a parameter whose key normalizes to `name`
fn candidate_value(name: &str, requirements: &StackRequirements) -> Option<String> {
    requirements
        .environment_variables
        .get(name)
        .filter(|v| !v.is_empty())
        .or_else(|| {
            requirements
                .parameters
                .iter()
                .find(|(key, value)| !value.is_empty() && output_key_to_env_name(key) == name)
                .map(|(_, value)| value)
        })
        .cloned()
}
