//! Local deployer port - the delegated service deployment
//!
//! The orchestrator hands the resolved overlay to the deployer explicitly;
//! it never relies on the deployer reading the process environment.

use std::path::Path;

use thiserror::Error;

use crate::domain::value_objects::EnvOverlay;

/// One delegated deployment
#[derive(Debug, Clone, Copy)]
pub struct LocalDeployRequest<'a> {
    pub service_path: &'a Path,
    pub stage: &'a str,
    pub region: Option<&'a str>,
    pub environment: &'a EnvOverlay,
}

/// Local deployment errors
#[derive(Debug, Error)]
pub enum LocalDeployError {
    /// The deploy command could not be started
    #[error("failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The deploy command ran and reported failure
    #[error("'{command}' exited with {status}")]
    Failed { command: String, status: String },

    /// Service directory is missing
    #[error("service path '{0}' is not a directory")]
    MissingServicePath(std::path::PathBuf),
}

/// Deploys one service locally
pub trait LocalDeployer {
    fn deploy(&self, request: &LocalDeployRequest<'_>) -> Result<(), LocalDeployError>;
}
