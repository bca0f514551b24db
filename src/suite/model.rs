//! Suite data model

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

/// One node of a suite's test tree
///
/// A node is runnable iff it carries `exec` (the literal body text of the
/// test snippet) and an aggregator iff it carries `subtests`; it may be
/// both. `res` is the recorded expectation mapping from the ledger,
/// snapshotted into the definition file.
#[derive(Debug, Clone, Deserialize)]
pub struct TestNode {
    /// Name, unique among siblings
    pub name: String,
    /// Literal evaluable snippet body
    #[serde(default)]
    pub exec: Option<String>,
    /// Nested sub-tests, in order
    #[serde(default)]
    pub subtests: Option<Vec<TestNode>>,
    /// Recorded expected results per environment key
    #[serde(default)]
    pub res: Option<HashMap<String, bool>>,
}

impl TestNode {
    /// Whether this node runs a snippet
    pub fn is_runnable(&self) -> bool {
        self.exec.is_some()
    }
}

/// A test suite discovered in the working directory
#[derive(Debug)]
pub struct Suite {
    /// Suite name, derived from the definition file name
    pub name: String,
    /// Path of the JSON definition file
    pub definition: PathBuf,
    /// Path of the `.js` expectation ledger this suite patches
    pub backing: PathBuf,
    /// Ordered top-level test nodes
    pub tests: Vec<TestNode>,
}

/// A queued edit: record `outcome` for the current environment key at the
/// ledger location addressed by `path`
///
/// The first path element is the suite name and selects the ledger file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchInstruction {
    pub path: Vec<String>,
    pub outcome: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_deserializes_with_optional_fields() {
        let node: TestNode = serde_json::from_str(
            r#"{
                "name": "arrow functions",
                "exec": "return (function () { return 1; })() === 1;",
                "res": {"engine2_0": true, "engine1_0": false}
            }"#,
        )
        .unwrap();
        assert!(node.is_runnable());
        assert!(node.subtests.is_none());
        assert_eq!(node.res.as_ref().unwrap()["engine2_0"], true);
    }

    #[test]
    fn test_node_may_be_both_leaf_and_branch() {
        let node: TestNode = serde_json::from_str(
            r#"{
                "name": "iterators",
                "exec": "return true;",
                "subtests": [{"name": "nested"}]
            }"#,
        )
        .unwrap();
        assert!(node.is_runnable());
        assert_eq!(node.subtests.as_ref().unwrap().len(), 1);
        assert!(!node.subtests.as_ref().unwrap()[0].is_runnable());
    }
}
