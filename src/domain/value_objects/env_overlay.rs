//! Environment overlay value object
//!
//! The set of variables resolved during a deployment request. It is handed
//! to the delegated deployment explicitly instead of mutating the process
//! environment.

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::Serialize;

/// Ordered name -> value map of environment variables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnvOverlay(BTreeMap<String, String>);

impl EnvOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable, replacing any earlier value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Merge another map over this one (incoming values win)
    pub fn extend<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in vars {
            self.set(k, v);
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvOverlay {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut overlay = EnvOverlay::new();
        overlay.extend(iter);
        overlay
    }
}

impl<'a> IntoIterator for &'a EnvOverlay {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
