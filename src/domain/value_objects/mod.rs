//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod env_overlay;
mod stack_identifier;
mod stack_status;

pub use env_overlay::EnvOverlay;
pub use stack_identifier::{StackIdentifier, MAX_STACK_NAME_LEN};
pub use stack_status::StackStatus;
