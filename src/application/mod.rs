//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `DependencyScanner` - Upstream stacks referenced by a config document
//! - `StackInspector` - Requirements and readiness of one stack
//! - `EnvironmentResolver` - Layered resolution of required variables
//! - `RemoteDeployUseCase` - Gate a service deployment on its dependencies

pub mod inspect;
pub mod remote_deploy;
pub mod resolve_env;
pub mod scan;

pub use inspect::{InspectionFailure, InspectionResult, StackInspector};
pub use remote_deploy::{
    EnvInjection, MissingVariable, RemoteDeployError, RemoteDeployReport, RemoteDeployRequest,
    RemoteDeployUseCase,
};
pub use resolve_env::EnvironmentResolver;
pub use scan::{DependencyScanner, ScanError, MAX_CONFIG_BYTES};
