//! Domain Layer
//!
//! The core of stackgate: pure dependency-resolution logic without I/O.
//!
//! ## Structure
//!
//! - `entities/` - Dependency references, stack descriptors, requirements
//! - `value_objects/` - Immutable value types (StackIdentifier, StackStatus, EnvOverlay)
//! - `services/` - Reference parsing, requirement derivation, failure classification
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system or network directly
//! 2. **Pure Functions** - Services are stateless and testable
//! 3. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
