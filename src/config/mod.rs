//! Configuration module for stackgate
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (STACKGATE_*)
//! 3. Project config (stackgate.toml, or the file given with --config)
//! 4. User config (~/.config/stackgate/config.toml)
//! 5. Built-in defaults (lowest priority)

mod env_validator;
mod loader;
mod types;

pub use env_validator::{levenshtein, EnvVarValidator};
pub use loader::{user_config_path, ConfigWarning, PROJECT_CONFIG_FILE};
pub use types::{
    AwsConfig, Config, DeployConfig, OutputConfig, OutputFormat, ParserConfig,
    DEFAULT_DEPLOY_COMMAND, DEFAULT_REGION,
};
