//! Dependency reference entity
//!
//! A single cross-stack reference found in configuration text. Produced
//! transiently by the scanner; never persisted.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::domain::value_objects::StackIdentifier;

/// Which reference syntax produced the dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceKind {
    /// `${ssm:/path/...}`
    ParameterPath,
    /// `${cf:stack.Output}`
    StackOutput,
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::ParameterPath => "parameter-path",
            ReferenceKind::StackOutput => "stack-output",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a reference was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    /// Source file, when the text came from disk
    pub file: Option<PathBuf>,
    /// Byte offset of the reference in the scanned text
    pub offset: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}@{}", file.display(), self.offset),
            None => write!(f, "@{}", self.offset),
        }
    }
}

/// A cross-stack dependency discovered in configuration text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyReference {
    pub kind: ReferenceKind,
    pub location: SourceLocation,
    pub target: StackIdentifier,
    /// Output name for stack-output references
    pub output_name: Option<String>,
}

impl DependencyReference {
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.location.file = Some(file.into());
        self
    }
}
