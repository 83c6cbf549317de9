//! Remote Deploy Options
//!
//! Request types for remote deploy operations.

use std::path::PathBuf;

use crate::domain::ports::ProfileConfig;
use crate::domain::value_objects::StackIdentifier;

/// How resolved variables reach the delegated deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvInjection {
    /// Only through the overlay handed to the deployer
    #[default]
    Overlay,
    /// Overlay, and also written into the process environment
    Process,
}

/// One remote deployment request
#[derive(Debug, Clone)]
pub struct RemoteDeployRequest {
    /// Service name (for events and diagnostics)
    pub service: String,
    /// Service directory handed to the deployer
    pub service_path: PathBuf,
    /// Upstream stacks in declaration order
    pub dependencies: Vec<StackIdentifier>,
    /// Environment label (`prod`, `staging`, ...)
    pub environment: String,
    pub stage: String,
    /// Region passed to the deployer
    pub region: Option<String>,
    /// Region and credentials used for inspection
    pub profile: ProfileConfig,
    pub injection: EnvInjection,
}

impl RemoteDeployRequest {
    pub fn new(
        service: impl Into<String>,
        service_path: impl Into<PathBuf>,
        environment: impl Into<String>,
        stage: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            service_path: service_path.into(),
            dependencies: Vec::new(),
            environment: environment.into(),
            stage: stage.into(),
            region: None,
            profile: ProfileConfig::new(crate::config::DEFAULT_REGION),
            injection: EnvInjection::default(),
        }
    }

    pub fn with_dependency(mut self, stack: StackIdentifier) -> Self {
        self.dependencies.push(stack);
        self
    }

    pub fn with_dependencies(mut self, stacks: impl IntoIterator<Item = StackIdentifier>) -> Self {
        self.dependencies.extend(stacks);
        self
    }

    /// Region for both inspection and the deployer
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        let region = region.into();
        self.profile.region = region.clone();
        self.region = Some(region);
        self
    }

    /// Control plane profile; a region set with [`Self::with_region`] is kept
    pub fn with_profile(mut self, profile: ProfileConfig) -> Self {
        self.profile = profile;
        if let Some(region) = &self.region {
            self.profile.region = region.clone();
        }
        self
    }

    pub fn with_injection(mut self, injection: EnvInjection) -> Self {
        self.injection = injection;
        self
    }
}
