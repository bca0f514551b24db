//! Leaf test execution
//!
//! Wraps a test snippet in a harness script that evaluates it inside the
//! engine and prints a marker line for the outcome. The harness is written
//! to a fixed scratch file which is reused across the strictly sequential
//! test runs.

use crate::common::Result;
use crate::engine::Engine;

/// Fixed scratch file the harness script is written to before each run
pub const HARNESS_FILE: &str = "conformance-test.js";

/// Marker the harness prints when the snippet evaluated to true/1
pub const SUCCESS_MARKER: &str = "[SUCCESS]";

/// Marker the harness prints on any other result or a thrown error
pub const FAILURE_MARKER: &str = "[FAILURE]";

/// Run one snippet through the engine; true means the test passed
///
/// A snippet passes only when the engine ran the harness and printed the
/// success marker. A thrown error, a non-true/non-1 result, a crash, or a
/// non-zero exit all count as a plain failure, never as a harness error.
pub async fn run_snippet(engine: &Engine, body: &str) -> Result<bool> {
    let script = harness_script(body)?;
    std::fs::write(engine.dir().join(HARNESS_FILE), script)?;
    let output = engine.run_script(HARNESS_FILE).await?;
    Ok(is_success(&output))
}

/// Build the harness script around a snippet body
///
/// The body is the literal text between a test function's braces; it is
/// wrapped in an immediately-invoked function and embedded as a JSON string
/// so the engine evals exactly what the suite author wrote.
fn harness_script(body: &str) -> Result<String> {
    let evalcode = format!("(function () {{ {body} }})();");
    let quoted = serde_json::to_string(&evalcode)?;
    Ok(format!(
        "var evalcode = {quoted};\n\
         try {{\n\
         \x20   var res = eval(evalcode);\n\
         \x20   if (res !== true && res !== 1) {{ throw new Error('failed: ' + res); }}\n\
         \x20   print('{SUCCESS_MARKER}');\n\
         }} catch (e) {{\n\
         \x20   print('{FAILURE_MARKER} ' + e);\n\
         }}\n"
    ))
}

/// Whether the captured output contains the success marker on its own line
fn is_success(output: &str) -> bool {
    output
        .lines()
        .any(|line| line.trim_end_matches('\r') == SUCCESS_MARKER)
}
