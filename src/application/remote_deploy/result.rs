//! Remote Deploy Result
//!
//! Report and error types for remote deploy operations.

use std::fmt::Write as _;

use serde::Serialize;
use thiserror::Error;

use crate::domain::ports::LocalDeployError;
use crate::domain::services::FailureClass;
use crate::domain::value_objects::{EnvOverlay, StackIdentifier};

/// Successful remote deployment
#[derive(Debug, Clone, Serialize)]
pub struct RemoteDeployReport {
    pub service: String,
    /// Dependencies inspected, deduplicated, in declaration order
    pub dependencies: Vec<StackIdentifier>,
    /// Overlay handed to the deployer
    pub environment: EnvOverlay,
    pub duration_seconds: u64,
}

/// A variable no source could supply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingVariable {
    pub name: String,
    /// Best value the stack knows for it, if any
    pub candidate: Option<String>,
}

/// Remote deployment failures
#[derive(Debug, Error)]
pub enum RemoteDeployError {
    /// Inspection failed; error and guidance come from the inspector
    #[error("failed to inspect dependency stack '{stack}': {message}")]
    Inspection {
        stack: String,
        message: String,
        class: FailureClass,
        recommendations: Vec<String>,
    },

    #[error("dependency stack '{stack}' is not ready for deployment (status: {status})")]
    NotReady {
        stack: StackIdentifier,
        status: String,
    },

    #[error("{}", render_missing(.stack, .environment, .missing, .available))]
    MissingEnvironment {
        stack: StackIdentifier,
        environment: String,
        missing: Vec<MissingVariable>,
        /// Every variable name the stack offers
        available: Vec<String>,
    },

    #[error("local deployment failed: {0}")]
    Deploy(#[from] LocalDeployError),
}

impl RemoteDeployError {
    /// Operator guidance, when the failure carries any
    pub fn recommendations(&self) -> &[String] {
        match self {
            RemoteDeployError::Inspection {
                recommendations, ..
            } => recommendations,
            _ => &[],
        }
    }
}

fn render_missing(
    stack: &StackIdentifier,
    environment: &str,
    missing: &[MissingVariable],
    available: &[String],
) -> String {
    let mut out = format!(
        "environment '{environment}' is missing {} variable(s) required from stack '{stack}':",
        missing.len()
    );
    for var in missing {
        let candidate = var.candidate.as_deref().unwrap_or("<not set>");
        let _ = write!(out, "\n  - {} (stack value: {candidate})", var.name);
    }
    let available = if available.is_empty() {
        "(none)".to_string()
    } else {
        available.join(", ")
    };
    let _ = write!(out, "\navailable from '{stack}': {available}");
    out
}
