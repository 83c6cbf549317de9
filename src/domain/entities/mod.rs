//! Domain Entities
//!
//! - `DependencyReference` - a cross-stack reference found in config text
//! - `StackDescriptor` / `StackRequirements` - stack snapshots and what dependents derive from them
//! - `EnvironmentResolutionResult` - resolved and missing variables

mod environment;
mod reference;
mod stack;

pub use environment::EnvironmentResolutionResult;
pub use reference::{DependencyReference, ReferenceKind, SourceLocation};
pub use stack::{ConfigEntry, StackDescriptor, StackRequirements};
