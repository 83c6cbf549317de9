//! Control plane implementations
//!
//! - `AwsCliConnector` - sessions backed by the `aws` CLI
//! - `InMemoryControlPlane` - maps, for tests and fixtures

mod aws_cli;
mod memory;

pub use aws_cli::{AwsCliConnector, AwsCliControlPlane};
pub use memory::InMemoryControlPlane;
