//! AWS CLI control plane
//!
//! Shells out to the `aws` binary instead of linking an SDK:
//! - `cloudformation describe-stacks --stack-name NAME`
//! - `ssm get-parameters-by-path --path PREFIX --recursive --with-decryption`
//!
//! Every call passes `--region`, `--output json` and, when set, `--profile`.

use std::collections::BTreeMap;
use std::process::{Command, Stdio};

use serde::Deserialize;

use crate::domain::entities::{ConfigEntry, StackDescriptor};
use crate::domain::ports::{ControlPlane, ControlPlaneConnector, ControlPlaneError, ProfileConfig};
use crate::domain::value_objects::{StackIdentifier, StackStatus};

/// Connector that opens `aws` CLI sessions
#[derive(Debug, Clone)]
pub struct AwsCliConnector {
    binary: String,
}

impl Default for AwsCliConnector {
    fn default() -> Self {
        Self {
            binary: "aws".to_string(),
        }
    }
}

impl AwsCliConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different `aws` executable
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Check if the CLI is installed and runnable
    pub fn check_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

impl ControlPlaneConnector for AwsCliConnector {
    fn connect(&self, profile: &ProfileConfig) -> Result<Box<dyn ControlPlane>, ControlPlaneError> {
        if !self.check_available() {
            return Err(ControlPlaneError::Unavailable(format!(
                "'{}' was not found or could not be run",
                self.binary
            )));
        }
        Ok(Box::new(AwsCliControlPlane {
            binary: self.binary.clone(),
            profile: profile.clone(),
        }))
    }
}

/// One `aws` CLI session (region and profile fixed)
#[derive(Debug, Clone)]
pub struct AwsCliControlPlane {
    binary: String,
    profile: ProfileConfig,
}

impl AwsCliControlPlane {
    fn run(&self, args: &[&str]) -> Result<String, ControlPlaneError> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .arg("--region")
            .arg(&self.profile.region)
            .arg("--output")
            .arg("json");
        if let Some(profile) = &self.profile.profile {
            cmd.arg("--profile").arg(profile);
        }
        tracing::debug!(command = ?cmd, "running aws cli");

        let output = cmd
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ControlPlaneError::Unavailable(format!("{}: {e}", self.binary)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("{} exited with {}", self.binary, output.status)
            } else {
                stderr
            };
            return Err(ControlPlaneError::CommandFailed { message });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl ControlPlane for AwsCliControlPlane {
    fn describe_stack(&self, name: &str) -> Result<Option<StackDescriptor>, ControlPlaneError> {
        match self.run(&["cloudformation", "describe-stacks", "--stack-name", name]) {
            Ok(stdout) => parse_describe_stacks(&stdout, &self.profile.region),
            Err(ControlPlaneError::CommandFailed { message }) if message.contains("does not exist") => {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn parameters_by_path(&self, prefix: &str) -> Result<Vec<ConfigEntry>, ControlPlaneError> {
        let stdout = self.run(&[
            "ssm",
            "get-parameters-by-path",
            "--path",
            prefix,
            "--recursive",
            "--with-decryption",
        ])?;
        parse_parameters_by_path(&stdout)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeStacksResponse {
    #[serde(default)]
    stacks: Vec<StackSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StackSummary {
    stack_name: String,
    stack_status: String,
    #[serde(default)]
    outputs: Vec<StackOutput>,
    #[serde(default)]
    parameters: Vec<StackParameter>,
    #[serde(default)]
    tags: Vec<StackTag>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StackOutput {
    output_key: String,
    #[serde(default)]
    output_value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StackParameter {
    parameter_key: String,
    #[serde(default)]
    parameter_value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StackTag {
    key: String,
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParametersByPathResponse {
    #[serde(default)]
    parameters: Vec<Parameter>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Parameter {
    name: String,
    #[serde(default)]
    value: String,
}

fn parse_describe_stacks(
    json: &str,
    region: &str,
) -> Result<Option<StackDescriptor>, ControlPlaneError> {
    let response: DescribeStacksResponse = serde_json::from_str(json)
        .map_err(|e| ControlPlaneError::InvalidResponse(e.to_string()))?;
    let Some(stack) = response.stacks.into_iter().next() else {
        return Ok(None);
    };

    let name = StackIdentifier::new(&stack.stack_name)
        .map_err(|e| ControlPlaneError::InvalidResponse(e.to_string()))?;

    Ok(Some(StackDescriptor {
        name,
        region: region.to_string(),
        status: StackStatus::parse(&stack.stack_status),
        outputs: stack
            .outputs
            .into_iter()
            .map(|o| (o.output_key, o.output_value))
            .collect::<BTreeMap<_, _>>(),
        parameters: stack
            .parameters
            .into_iter()
            .map(|p| (p.parameter_key, p.parameter_value))
            .collect(),
        tags: stack.tags.into_iter().map(|t| (t.key, t.value)).collect(),
    }))
}

fn parse_parameters_by_path(json: &str) -> Result<Vec<ConfigEntry>, ControlPlaneError> {
    let response: ParametersByPathResponse = serde_json::from_str(json)
        .map_err(|e| ControlPlaneError::InvalidResponse(e.to_string()))?;
    Ok(response
        .parameters
        .into_iter()
        .map(|p| ConfigEntry::new(p.name, p.value))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_stacks_response_maps_to_descriptor() {
        let json = r#"{
            "Stacks": [{
                "StackId": "arn:aws:cloudformation:us-east-1:123456789012:stack/vpc-stack/abc",
                "StackName": "vpc-stack",
                "StackStatus": "UPDATE_ROLLBACK_COMPLETE",
                "Outputs": [{"OutputKey": "VpcId", "OutputValue": "vpc-123", "Description": "VPC"}],
                "Parameters": [{"ParameterKey": "Cidr", "ParameterValue": "10.0.0.0/16"}],
                "Tags": [{"Key": "Dependencies", "Value": "base-stack"}]
            }]
        }"#;

        let descriptor = parse_describe_stacks(json, "us-east-1").unwrap().unwrap();
        assert_eq!(descriptor.name, "vpc-stack");
        assert_eq!(descriptor.region, "us-east-1");
        assert!(!descriptor.status.is_ready());
        assert_eq!(descriptor.status.as_str(), "UPDATE_ROLLBACK_COMPLETE");
        assert_eq!(descriptor.outputs["VpcId"], "vpc-123");
        assert_eq!(descriptor.parameters["Cidr"], "10.0.0.0/16");
        assert_eq!(descriptor.tags["Dependencies"], "base-stack");
    }

    #[test]
    fn empty_stack_list_is_absent() {
        assert!(parse_describe_stacks(r#"{"Stacks": []}"#, "us-east-1")
            .unwrap()
            .is_none());
    }

    #[test]
    fn garbage_is_an_invalid_response() {
        let err = parse_describe_stacks("not json", "us-east-1").unwrap_err();
        assert!(matches!(err, ControlPlaneError::InvalidResponse(_)));
    }

    #[test]
    fn parameters_response_maps_to_entries() {
        let json = r#"{"Parameters": [
            {"Name": "/vpc-stack/db/host", "Type": "String", "Value": "db.example", "Version": 1},
            {"Name": "/vpc-stack/db/password", "Type": "SecureString", "Value": "hunter2"}
        ]}"#;
        let entries = parse_parameters_by_path(json).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ConfigEntry::new("/vpc-stack/db/host", "db.example"));
    }

    #[test]
    fn missing_binary_is_unavailable() {
        let connector = AwsCliConnector::new().with_binary("stackgate-no-such-aws-binary");
        let err = connector
            .connect(&ProfileConfig::new("us-east-1"))
            .err()
            .unwrap();
        assert!(matches!(err, ControlPlaneError::Unavailable(_)));
    }
}
