//! Stack identifier value object
//!
//! A validated infrastructure stack name:
//! - Non-empty after trimming
//! - Starts with an ASCII letter or digit
//! - Only ASCII letters, digits, `-` and `_`
//! - At most 128 characters
//!
//! Case is preserved. Anything that still carries interpolation syntax
//! (`$`, `{`, `*`, `/`, `.`) is rejected, which is what keeps half-parsed
//! references out of dependency sets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StackgateError;

/// Maximum length of a stack name accepted by the control plane
pub const MAX_STACK_NAME_LEN: usize = 128;

/// A validated stack identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StackIdentifier(String);

impl StackIdentifier {
    /// Create a new identifier after normalization and validation
    pub fn new(raw: impl AsRef<str>) -> Result<Self, StackgateError> {
        let trimmed = raw.as_ref().trim();
        if Self::is_valid(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(StackgateError::InvalidStackIdentifier(raw.as_ref().to_string()))
        }
    }

    /// Like [`StackIdentifier::new`], discarding the error
    pub fn parse(raw: impl AsRef<str>) -> Option<Self> {
        Self::new(raw).ok()
    }

    fn is_valid(name: &str) -> bool {
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        first.is_ascii_alphanumeric()
            && name.len() <= MAX_STACK_NAME_LEN
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StackIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StackIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StackIdentifier {
    type Error = StackgateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for StackIdentifier {
    type Error = StackgateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StackIdentifier> for String {
    fn from(value: StackIdentifier) -> Self {
        value.0
    }
}

impl PartialEq<str> for StackIdentifier {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for StackIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
