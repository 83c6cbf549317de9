//! Ambient environment port
//!
//! Variable lookups go through `AmbientEnvironment` instead of `std::env`
//! so the resolver can be handed the process environment, an overlay
//! layered over it, or a plain map in tests.

use std::collections::BTreeMap;

use crate::domain::value_objects::EnvOverlay;

/// Read-only view of environment variables
pub trait AmbientEnvironment {
    fn var(&self, name: &str) -> Option<String>;
}

/// The current process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl AmbientEnvironment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl AmbientEnvironment for EnvOverlay {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_string)
    }
}

impl AmbientEnvironment for BTreeMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// `top` consulted first, then `base`
pub struct LayeredEnvironment<'a> {
    top: &'a dyn AmbientEnvironment,
    base: &'a dyn AmbientEnvironment,
}

impl<'a> LayeredEnvironment<'a> {
    pub fn new(top: &'a dyn AmbientEnvironment, base: &'a dyn AmbientEnvironment) -> Self {
        Self { top, base }
    }
}

impl AmbientEnvironment for LayeredEnvironment<'_> {
    fn var(&self, name: &str) -> Option<String> {
        self.top.var(name).or_else(|| self.base.var(name))
    }
}
