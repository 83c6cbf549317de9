//! Serverless CLI deployer
//!
//! Runs `serverless deploy --stage S [--region R]` in the service directory
//! with the overlay added to the child's environment.

use std::process::{Command, Stdio};

use crate::domain::ports::{LocalDeployError, LocalDeployRequest, LocalDeployer};

/// Deployer that shells out to the Serverless Framework CLI
#[derive(Debug, Clone)]
pub struct ServerlessCliDeployer {
    command: String,
}

impl Default for ServerlessCliDeployer {
    fn default() -> Self {
        Self::new("serverless")
    }
}

impl ServerlessCliDeployer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn build(&self, request: &LocalDeployRequest<'_>) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.arg("deploy")
            .arg("--stage")
            .arg(request.stage)
            .current_dir(request.service_path)
            .envs(request.environment.iter());
        if let Some(region) = request.region {
            cmd.arg("--region").arg(region);
        }
        cmd
    }
}

impl LocalDeployer for ServerlessCliDeployer {
    fn deploy(&self, request: &LocalDeployRequest<'_>) -> Result<(), LocalDeployError> {
        if !request.service_path.is_dir() {
            return Err(LocalDeployError::MissingServicePath(
                request.service_path.to_path_buf(),
            ));
        }

        let mut cmd = self.build(request);
        tracing::debug!(
            command = %self.command,
            stage = request.stage,
            variables = request.environment.len(),
            "running local deploy"
        );

        let status = cmd
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| LocalDeployError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !status.success() {
            return Err(LocalDeployError::Failed {
                command: self.command.clone(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}
