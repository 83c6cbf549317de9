//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `control_plane/` - Control plane sessions (AWS CLI, in-memory)
//! - `deployer/` - Local deployers (Serverless CLI)
//! - `events/` - Event sinks (JSON, tracing)

pub mod control_plane;
pub mod deployer;
pub mod events;

// Re-export for convenience
pub use control_plane::{AwsCliConnector, InMemoryControlPlane};
pub use deployer::ServerlessCliDeployer;
pub use events::{JsonEventSink, TracingEventSink};
