//! Stack status value object
//!
//! Wraps the control plane's raw lifecycle status (e.g. `UPDATE_COMPLETE`)
//! and classifies it. Only the two steady "complete" states are ready.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of an infrastructure stack
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StackStatus {
    /// `CREATE_COMPLETE`
    CreateComplete,
    /// `UPDATE_COMPLETE`
    UpdateComplete,
    /// Any `*ROLLBACK_COMPLETE` state
    RolledBack(String),
    /// `DELETE_COMPLETE`
    Deleted,
    /// Any `*_IN_PROGRESS` state
    Pending(String),
    /// Any `*_FAILED` state
    Failed(String),
    /// Anything else the control plane reports
    Other(String),
}

impl StackStatus {
    /// Classify a raw status string
    pub fn parse(raw: &str) -> Self {
        let status = raw.trim().to_ascii_uppercase();
        match status.as_str() {
            "CREATE_COMPLETE" => StackStatus::CreateComplete,
            "UPDATE_COMPLETE" => StackStatus::UpdateComplete,
            "DELETE_COMPLETE" => StackStatus::Deleted,
            s if s.ends_with("ROLLBACK_COMPLETE") => StackStatus::RolledBack(status),
            s if s.ends_with("_IN_PROGRESS") => StackStatus::Pending(status),
            s if s.ends_with("_FAILED") => StackStatus::Failed(status),
            _ => StackStatus::Other(status),
        }
    }

    /// True iff dependents may deploy against a stack in this state
    pub fn is_ready(&self) -> bool {
        matches!(self, StackStatus::CreateComplete | StackStatus::UpdateComplete)
    }

    /// The raw status string
    pub fn as_str(&self) -> &str {
        match self {
            StackStatus::CreateComplete => "CREATE_COMPLETE",
            StackStatus::UpdateComplete => "UPDATE_COMPLETE",
            StackStatus::Deleted => "DELETE_COMPLETE",
            StackStatus::RolledBack(s)
            | StackStatus::Pending(s)
            | StackStatus::Failed(s)
            | StackStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for StackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for StackStatus {
    fn from(value: String) -> Self {
        StackStatus::parse(&value)
    }
}

impl From<&str> for StackStatus {
    fn from(value: &str) -> Self {
        StackStatus::parse(value)
    }
}

impl From<StackStatus> for String {
    fn from(value: StackStatus) -> Self {
        value.as_str().to_string()
    }
}
