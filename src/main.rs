//! Script-engine conformance harness
//!
//! Runs every behavioral test suite in the working directory against the
//! engine executable, reports pass/fail results, and patches stale
//! expectation entries back into the suite ledger files.

use clap::Parser;
use conformance::{common::logging, runner};

#[derive(Parser)]
#[command(name = "conformance", about = "Script-engine conformance harness")]
#[command(version, long_about = None)]
struct Cli {}

#[tokio::main]
async fn main() {
    logging::init();

    let _cli = Cli::parse();

    if let Err(e) = runner::run(std::path::Path::new(".")).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
