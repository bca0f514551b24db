//! Expectation resolution and discrepancy assessment

use std::collections::HashMap;

/// Outcome of comparing a leaf's actual result against its recorded
/// expectations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Recorded expectation agrees with the actual outcome
    Consistent,
    /// The node carries no expectation mapping at all; a human must add the
    /// block before results can be recorded
    ExpectationsMissing,
    /// A mapping exists but records nothing applicable, and the test passed
    ResultMissing,
    /// The applicable recorded expectation disagrees with the actual outcome
    OutOfDate { expected: bool },
}

impl Verdict {
    /// Whether this verdict queues a ledger patch
    pub fn needs_patch(&self) -> bool {
        matches!(self, Verdict::ResultMissing | Verdict::OutOfDate { .. })
    }
}

/// Resolve the expected outcome from a recorded mapping
///
/// Scans the precedence list oldest to current; the latest listed key with
/// a recorded value wins, so a result recorded for an older release carries
/// forward until a newer release records something else. `None` means the
/// mapping records nothing applicable to this engine.
pub fn resolve(mapping: &HashMap<String, bool>, precedence: &[String]) -> Option<bool> {
    let mut expected = None;
    for key in precedence {
        if let Some(value) = mapping.get(key) {
            expected = Some(*value);
        }
    }
    expected
}

/// Assess a leaf's actual outcome against its recorded expectations
///
/// An applicable expectation that is simply unset counts as expected-to-fail:
/// a failing test with nothing recorded is not a discrepancy.
pub fn assess(
    mapping: Option<&HashMap<String, bool>>,
    precedence: &[String],
    actual: bool,
) -> Verdict {
    let Some(mapping) = mapping else {
        return Verdict::ExpectationsMissing;
    };
    match resolve(mapping, precedence) {
        None if actual => Verdict::ResultMissing,
        None => Verdict::Consistent,
        Some(expected) if expected != actual => Verdict::OutOfDate { expected },
        Some(_) => Verdict::Consistent,
    }
}
