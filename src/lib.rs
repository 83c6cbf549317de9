//! Stackgate - cross-stack dependency resolution for serverless deployments
//!
//! Stackgate reads a service's configuration, finds the upstream stacks it
//! references, inspects each one through the infrastructure control plane,
//! resolves the environment variables the service needs from them, and only
//! then hands off to the local deployment tool.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{
    DependencyScanner, EnvironmentResolver, InspectionResult, RemoteDeployError,
    RemoteDeployReport, RemoteDeployRequest, RemoteDeployUseCase, StackInspector,
};
pub use config::{Config, OutputFormat};
pub use domain::entities::{DependencyReference, StackDescriptor, StackRequirements};
pub use domain::ports::{EventSink, ProfileConfig, ResolverEvent};
pub use domain::services::ReferenceParser;
pub use domain::value_objects::{EnvOverlay, StackIdentifier, StackStatus};
pub use error::{StackgateError, StackgateResult};
