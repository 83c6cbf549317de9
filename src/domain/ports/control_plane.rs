//! Control plane port - abstraction over the infrastructure control plane
//!
//! The inspector never talks to a cloud provider directly. It asks a
//! `ControlPlaneConnector` for a session scoped to one profile, then reads
//! stack descriptors and configuration-store entries through it.

use thiserror::Error;

use crate::domain::entities::{ConfigEntry, StackDescriptor};

/// Region and optional credential profile a session is scoped to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileConfig {
    pub region: String,
    pub profile: Option<String>,
}

impl ProfileConfig {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            profile: None,
        }
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }
}

/// Control plane errors
///
/// The message text is what failure classification inspects, so adapters
/// should pass the provider's message through unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControlPlaneError {
    /// The client could not be created (missing binary, bad setup)
    #[error("control plane unavailable: {0}")]
    Unavailable(String),

    /// The provider rejected or failed the request
    #[error("{message}")]
    CommandFailed { message: String },

    /// The provider answered with something we could not parse
    #[error("invalid control plane response: {0}")]
    InvalidResponse(String),
}

/// Creates control plane sessions
pub trait ControlPlaneConnector: Send + Sync {
    fn connect(&self, profile: &ProfileConfig) -> Result<Box<dyn ControlPlane>, ControlPlaneError>;
}

/// One session against the control plane
pub trait ControlPlane {
    /// Describe one stack; `Ok(None)` when the stack does not exist
    fn describe_stack(&self, name: &str) -> Result<Option<StackDescriptor>, ControlPlaneError>;

    /// Every configuration-store entry below `prefix` (recursive)
    fn parameters_by_path(&self, prefix: &str) -> Result<Vec<ConfigEntry>, ControlPlaneError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failure_displays_provider_message_verbatim() {
        let err = ControlPlaneError::CommandFailed {
            message: "An error occurred (AccessDenied)".to_string(),
        };
        assert_eq!(err.to_string(), "An error occurred (AccessDenied)");
    }

    #[test]
    fn profile_builder() {
        let profile = ProfileConfig::new("eu-west-1").with_profile("staging");
        assert_eq!(profile.region, "eu-west-1");
        assert_eq!(profile.profile.as_deref(), Some("staging"));
    }
}
