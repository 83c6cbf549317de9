//! Configuration type definitions

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::services::ReferenceParser;
use crate::error::StackgateResult;

use super::loader::{self, ConfigWarning};

/// Region used when neither flags, environment, nor config name one
pub const DEFAULT_REGION: &str = "us-east-1";

/// Delegate binary used for local deployments
pub const DEFAULT_DEPLOY_COMMAND: &str = "serverless";

/// Control plane connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsConfig {
    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default)]
    pub profile: Option<String>,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            profile: None,
        }
    }
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

/// Reference parser settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Replaces the built-in noun allow-list when set
    #[serde(default)]
    pub infrastructure_nouns: Option<Vec<String>>,
}

impl ParserConfig {
    pub fn reference_parser(&self) -> ReferenceParser {
        match &self.infrastructure_nouns {
            Some(nouns) => ReferenceParser::with_nouns(nouns),
            None => ReferenceParser::default(),
        }
    }
}

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Delegated deployment configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
    #[serde(default = "default_deploy_command")]
    pub command: String,

    /// Also write resolved variables into the process environment
    #[serde(default)]
    pub inject_process_env: bool,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            command: default_deploy_command(),
            inject_process_env: false,
        }
    }
}

fn default_deploy_command() -> String {
    DEFAULT_DEPLOY_COMMAND.to_string()
}

/// Full stackgate configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub aws: AwsConfig,

    #[serde(default)]
    pub parser: ParserConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub deploy: DeployConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> StackgateResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> StackgateResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load from explicit, project, or user config (first found), then
    /// apply environment overrides
    pub fn load_layered(
        project_root: Option<&Path>,
        explicit: Option<&Path>,
    ) -> StackgateResult<(Self, Vec<ConfigWarning>)> {
        loader::load_layered(project_root, explicit)
    }
}
