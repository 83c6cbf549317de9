//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod control_plane;
pub mod environment;
pub mod events;
pub mod local_deployer;

pub use control_plane::{ControlPlane, ControlPlaneConnector, ControlPlaneError, ProfileConfig};
pub use environment::{AmbientEnvironment, LayeredEnvironment, ProcessEnvironment};
pub use events::{
    DeploymentOutcome, EventSink, NoopEventSink, ResolverEvent, SOURCE_INSPECTOR,
    SOURCE_REMOTE_DEPLOY, SOURCE_RESOLVER, SOURCE_SCANNER,
};
pub use local_deployer::{LocalDeployError, LocalDeployRequest, LocalDeployer};
