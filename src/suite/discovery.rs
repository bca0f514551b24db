//! Suite discovery
//!
//! Scans the working directory for suite definition files. A file named
//! `data-<x>-tests.json` defines the suite `data-<x>`, whose expectation
//! ledger is the sibling `data-<x>.js`.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::common::{Error, Result};
use crate::suite::model::{Suite, TestNode};

static SUITE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(data-.*)-tests\.json$").expect("suite pattern is valid"));

/// Discover every suite in `dir`, in sorted name order
pub fn discover(dir: &Path) -> Result<Vec<Suite>> {
    let mut suites = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if let Some(caps) = SUITE_PATTERN.captures(name) {
            suites.push(load(dir, &caps[1], &entry.path())?);
        }
    }
    // Directory iteration order is platform-dependent; sort for stable runs
    suites.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(suites)
}

fn load(dir: &Path, name: &str, definition: &Path) -> Result<Suite> {
    let text = std::fs::read_to_string(definition).map_err(|e| Error::file_read(definition, &e))?;
    let tests: Vec<TestNode> = serde_json::from_str(&text).map_err(|e| Error::SuiteDefinition {
        path: definition.display().to_string(),
        error: e.to_string(),
    })?;
    Ok(Suite {
        name: name.to_string(),
        definition: definition.to_path_buf(),
        backing: dir.join(format!("{name}.js")),
        tests,
    })
}
