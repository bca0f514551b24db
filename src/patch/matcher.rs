//! Segment-name line matching
//!
//! A hierarchical test path is located inside a ledger file by matching
//! each segment name against the trailing content of candidate lines. A
//! segment can appear as a quoted list-item value or as a quoted object
//! key:
//!
//! ```text
//!     name: 'arrow functions',
//!     'basic support': {
//!     "basic support": {
//! ```
//!
//! Runtime names may be decorated with a qualifier prefix (`misc: basic
//! support`) or a dotted namespace (`Symbol.iterator`) that the ledger does
//! not spell out, so the stripped remainders are tried as well. The
//! stripping rule is heuristic and suite-dependent; it is kept on the
//! matcher so a suite can swap it out.

/// Matches path segment names against ledger lines
#[derive(Debug, Clone)]
pub struct LineMatcher {
    qualifier_separator: char,
}

impl Default for LineMatcher {
    fn default() -> Self {
        Self {
            qualifier_separator: ':',
        }
    }
}

impl LineMatcher {
    pub fn new(qualifier_separator: char) -> Self {
        Self {
            qualifier_separator,
        }
    }

    /// Whether `line` renders the segment `name`
    pub fn matches(&self, line: &str, name: &str) -> bool {
        let trailing = line.trim_end();
        self.candidates(name).iter().any(|c| {
            trailing.ends_with(&format!("'{c}',"))
                || trailing.ends_with(&format!("'{c}': {{"))
                || trailing.ends_with(&format!("\"{c}\": {{"))
        })
    }

    /// The spellings of `name` to try, most specific first
    fn candidates<'a>(&self, name: &'a str) -> Vec<&'a str> {
        let mut out = vec![name];
        if let Some(idx) = name.rfind(self.qualifier_separator) {
            let stripped = name[idx + 1..].trim_start();
            if !stripped.is_empty() {
                out.push(stripped);
            }
        }
        if let Some(idx) = name.find('.') {
            let stripped = &name[idx + 1..];
            if !stripped.is_empty() {
                out.push(stripped);
            }
        }
        out
    }
}
