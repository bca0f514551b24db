//! Suite runner
//!
//! Walks each suite's test tree in order, executes leaves through the
//! engine one at a time, reports per-test results, and queues ledger
//! patches for discrepancies. A suite's patches are applied only after its
//! walk completes, serially, each against a fresh read of the ledger file.

pub mod expectation;

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use colored::Colorize;

use crate::common::Result;
use crate::engine::registry::{EnvironmentRegistry, ENVIRONMENTS_FILE};
use crate::engine::{executor, version, Engine};
use crate::patch::{self, LineMatcher, SourceLines};
use crate::suite;
use crate::suite::model::{PatchInstruction, Suite, TestNode};
use self::expectation::Verdict;

/// Totals accumulated across a run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunTotals {
    pub executed: usize,
    pub succeeded: usize,
    pub out_of_date: usize,
}

impl RunTotals {
    pub fn failed(&self) -> usize {
        self.executed - self.succeeded
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            executed: self.executed + other.executed,
            succeeded: self.succeeded + other.succeeded,
            out_of_date: self.out_of_date + other.out_of_date,
        }
    }
}

/// Result of walking one suite
#[derive(Debug, Default)]
pub struct SuiteReport {
    pub totals: RunTotals,
    pub patches: Vec<PatchInstruction>,
}

/// Run every suite in `dir` against the engine and patch the ledgers
pub async fn run(dir: &Path) -> Result<RunTotals> {
    let registry = EnvironmentRegistry::load(&dir.join(ENVIRONMENTS_FILE))?;
    let engine = Engine::detect(dir).await?;
    let key = engine.version().result_key();
    println!("Engine result key is: res.{key}");
    let precedence = registry.precedence(version::FAMILY, &key)?;

    let suites = suite::discover(dir)?;
    let mut totals = RunTotals::default();
    for s in &suites {
        println!();
        println!("**** {} ****", s.name.bold());
        println!();
        let report = run_suite(&engine, &precedence, s).await?;
        apply_patches(s, &key, &report.patches)?;
        totals = totals.merge(report.totals);
    }

    println!();
    println!(
        "{} tests executed: {} success, {} fail",
        totals.executed,
        totals.succeeded,
        totals.failed()
    );
    println!("{} tests out of date", totals.out_of_date);
    Ok(totals)
}

/// Walk one suite, executing every leaf in order
pub async fn run_suite(engine: &Engine, precedence: &[String], suite: &Suite) -> Result<SuiteReport> {
    let mut walk = SuiteWalk {
        engine,
        precedence,
        report: SuiteReport::default(),
    };
    let parents = vec![suite.name.clone()];
    for node in &suite.tests {
        walk.visit(parents.clone(), node).await?;
    }
    Ok(walk.report)
}

struct SuiteWalk<'a> {
    engine: &'a Engine,
    precedence: &'a [String],
    report: SuiteReport,
}

impl SuiteWalk<'_> {
    /// Visit a node: run its snippet if it carries one, then recurse into
    /// its children with the path extended by this node's name
    ///
    /// Every node is visited exactly once; earlier failures never short-
    /// circuit the walk.
    fn visit<'b>(
        &'b mut self,
        parents: Vec<String>,
        node: &'b TestNode,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + 'b>> {
        Box::pin(async move {
            if let Some(body) = &node.exec {
                self.run_leaf(&parents, node, body).await?;
            }
            if let Some(subtests) = &node.subtests {
                let mut next = parents;
                next.push(node.name.clone());
                for child in subtests {
                    self.visit(next.clone(), child).await?;
                }
            }
            Ok(())
        })
    }

    async fn run_leaf(&mut self, parents: &[String], node: &TestNode, body: &str) -> Result<()> {
        let label = format!("{} -> {}", parents.join(" -> "), node.name);

        let passed = executor::run_snippet(self.engine, body).await?;
        self.report.totals.executed += 1;
        if passed {
            self.report.totals.succeeded += 1;
            println!("{label}: {}", "test passed".green());
        } else {
            println!("{label}: {}", "test failed".red());
        }

        let verdict = expectation::assess(node.res.as_ref(), self.precedence, passed);
        match verdict {
            Verdict::Consistent => {}
            Verdict::ExpectationsMissing => {
                println!("{label}: {}", "expectations missing".yellow());
            }
            Verdict::ResultMissing => {
                println!("{label}: {} (recording {passed})", "result missing".yellow());
            }
            Verdict::OutOfDate { expected } => {
                println!(
                    "{label}: {} (expected {expected}, actual {passed})",
                    "result out of date".red()
                );
            }
        }
        if verdict.needs_patch() {
            self.report.totals.out_of_date += 1;
            let mut path = parents.to_vec();
            path.push(node.name.clone());
            self.report.patches.push(PatchInstruction {
                path,
                outcome: passed,
            });
        }
        Ok(())
    }
}

/// Apply a suite's queued patches in discovery order
///
/// Each instruction re-reads the ledger, edits it in memory, and rewrites
/// the whole file, so every instruction operates on the previous rewrite
/// rather than on stale line offsets.
fn apply_patches(suite: &Suite, key: &str, patches: &[PatchInstruction]) -> Result<()> {
    if patches.is_empty() {
        return Ok(());
    }
    let matcher = LineMatcher::default();
    let file = suite.backing.display().to_string();
    for instruction in patches {
        tracing::info!(
            file = %file,
            path = %instruction.path.join(" -> "),
            outcome = instruction.outcome,
            "patching ledger"
        );
        let mut source = SourceLines::read(&suite.backing)?;
        patch::apply(
            &mut source,
            &matcher,
            &file,
            &instruction.path,
            key,
            instruction.outcome,
        )?;
        source.write(&suite.backing)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_merge() {
        let a = RunTotals {
            executed: 3,
            succeeded: 2,
            out_of_date: 1,
        };
        let b = RunTotals {
            executed: 4,
            succeeded: 4,
            out_of_date: 0,
        };
        let merged = a.merge(b);
        assert_eq!(merged.executed, 7);
        assert_eq!(merged.succeeded, 6);
        assert_eq!(merged.failed(), 1);
        assert_eq!(merged.out_of_date, 1);
    }
}
