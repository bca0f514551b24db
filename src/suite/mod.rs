//! Test suites
//!
//! A suite is an ordered tree of named test nodes loaded from a JSON
//! definition file. Its sibling `.js` ledger file records per-environment
//! expected results and is patched in place by the harness.

pub mod discovery;
pub mod model;

pub use discovery::discover;
pub use model::{PatchInstruction, Suite, TestNode};
