//! Error types for the conformance harness
//!
//! Error messages are designed to be actionable: structural problems in a
//! ledger file or an unregistered engine release must halt the run with a
//! message that says what to fix.

use std::io;
use std::path::Path;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the conformance harness
#[derive(Error, Debug)]
pub enum Error {
    // === Engine Errors ===
    #[error("failed to run engine '{command}': {error}. Place the engine executable in the working directory")]
    EngineInvocation { command: String, error: String },

    #[error("engine version probe printed '{0}', expected a numeric version")]
    VersionProbe(String),

    #[error("environment key '{0}' is not in the registry. Add the new engine release to environments.json before running")]
    UnregisteredEnvironment(String),

    // === Suite Errors ===
    #[error("failed to read '{path}': {error}")]
    FileRead { path: String, error: String },

    #[error("invalid suite definition '{path}': {error}")]
    SuiteDefinition { path: String, error: String },

    #[error("invalid environment registry '{path}': {error}")]
    Registry { path: String, error: String },

    // === Ledger Patch Errors ===
    #[error("cannot locate expectation entry in '{file}': {detail}")]
    PatchTarget { file: String, detail: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a file read error with the offending path
    pub fn file_read(path: &Path, error: &io::Error) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Create a patch target error for a ledger file
    pub fn patch_target(file: &str, detail: impl Into<String>) -> Self {
        Self::PatchTarget {
            file: file.to_string(),
            detail: detail.into(),
        }
    }

    /// Create an engine invocation error
    pub fn engine_invocation(command: &str, error: &io::Error) -> Self {
        Self::EngineInvocation {
            command: command.to_string(),
            error: error.to_string(),
        }
    }
}
