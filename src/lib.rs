//! Conformance-test harness for script engines
//!
//! This library drives an external script-engine executable against a corpus
//! of behavioral test suites, reconciles outcomes against a versioned
//! expectation ledger, and patches out-of-date entries back into the ledger
//! files in place.

pub mod common;
pub mod engine;
pub mod patch;
pub mod runner;
pub mod suite;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use suite::model::{PatchInstruction, TestNode};
