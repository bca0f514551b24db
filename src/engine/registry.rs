//! Environment registry
//!
//! `environments.json` maps environment keys to metadata for every engine
//! release (and for other result columns kept in the same ledgers). Key
//! order is release order, oldest first, and is significant: it drives the
//! precedence list used to resolve expected results.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::common::{Error, Result};

/// Fixed name of the registry file in the working directory
pub const ENVIRONMENTS_FILE: &str = "environments.json";

/// Metadata for one registered environment
#[derive(Debug, Clone, Deserialize)]
pub struct Environment {
    /// Environment family, e.g. `Engine`
    pub family: String,
}

/// The full registry, in stored (release) order
#[derive(Debug, Default)]
pub struct EnvironmentRegistry {
    entries: IndexMap<String, Environment>,
}

impl EnvironmentRegistry {
    /// Load the registry from a JSON file, preserving key order
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, &e))?;
        let entries: IndexMap<String, Environment> =
            serde_json::from_str(&text).map_err(|e| Error::Registry {
                path: path.display().to_string(),
                error: e.to_string(),
            })?;
        Ok(Self { entries })
    }

    /// Build the precedence list for `current`: all keys of `family` in
    /// stored order, up to and including `current`
    ///
    /// A `current` key missing from the registry means the engine is a
    /// release nobody has registered yet; that halts the run rather than
    /// guessing how it relates to the known releases.
    pub fn precedence(&self, family: &str, current: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for (key, env) in &self.entries {
            if env.family != family {
                continue;
            }
            keys.push(key.clone());
            if key == current {
                return Ok(keys);
            }
        }
        Err(Error::UnregisteredEnvironment(current.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
