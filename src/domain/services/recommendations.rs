//! Inspection failure classification
//!
//! Maps a control-plane error message onto one of four recommendation
//! templates so every failed inspection carries actionable guidance.

use serde::Serialize;

/// Broad cause of a failed inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureClass {
    /// Credentials missing, expired, or lacking permissions
    Authorization,
    /// The control plane rejected the request because the stack does not exist
    StackMissing,
    /// Some other resource could not be found
    NotFound,
    /// Throttling, network, or anything unrecognised
    Transient,
}

const AUTHORIZATION_MARKERS: &[&str] = &[
    "accessdenied",
    "access denied",
    "not authorized",
    "unauthorized",
    "expiredtoken",
    "expired token",
    "invalidclienttokenid",
    "security token",
    "unable to locate credentials",
    "credentials",
];

const STACK_MISSING_MARKERS: &[&str] = &["validationerror", "validation error", "does not exist"];

const NOT_FOUND_MARKERS: &[&str] = &["not found", "notfound", "no such"];

impl FailureClass {
    /// Classify an error message (case-insensitive keyword match)
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        let has_any = |markers: &[&str]| markers.iter().any(|m| lower.contains(m));

        if has_any(AUTHORIZATION_MARKERS) {
            FailureClass::Authorization
        } else if has_any(STACK_MISSING_MARKERS) {
            FailureClass::StackMissing
        } else if has_any(NOT_FOUND_MARKERS) {
            FailureClass::NotFound
        } else {
            FailureClass::Transient
        }
    }

    /// Recommendation template filled in for one stack
    pub fn recommendations(&self, stack: &str, region: &str, profile: Option<&str>) -> Vec<String> {
        let profile = profile.unwrap_or("default");
        match self {
            FailureClass::Authorization => vec![
                format!("Verify the credentials for profile '{profile}' are valid and not expired"),
                "Ensure the caller may run cloudformation:DescribeStacks and ssm:GetParametersByPath"
                    .to_string(),
                format!("Confirm that stack '{stack}' is managed in region '{region}' by this account"),
            ],
            FailureClass::StackMissing => vec![
                format!("Deploy the infrastructure stack '{stack}' before deploying services that depend on it"),
                "Check the stack name for typos; stack names are case-sensitive".to_string(),
                format!("Confirm the stack exists in region '{region}' (aws cloudformation list-stacks --region {region})"),
            ],
            FailureClass::NotFound => vec![
                format!("Verify that stack '{stack}' and its configuration parameters exist"),
                format!("Check that region '{region}' and profile '{profile}' point at the right account"),
            ],
            FailureClass::Transient => vec![
                "Retry the deployment; the control plane may be throttling or briefly unavailable"
                    .to_string(),
                "Check network connectivity to the infrastructure control plane".to_string(),
                "Re-run with -vv for detailed diagnostics".to_string(),
            ],
        }
    }
}
