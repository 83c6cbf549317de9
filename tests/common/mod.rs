//! Common test utilities for stackgate integration tests.
//!
//! - `TestEnv`: isolated project and config directories plus CLI helpers
//! - Fixture constants shared by the CLI and library tests

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
