//! Local deployer implementations

mod serverless;

pub use serverless::ServerlessCliDeployer;
