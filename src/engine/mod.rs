//! Engine invocation
//!
//! The engine under test is an external executable in the working
//! directory. It is invoked once at startup to probe its version, then once
//! per leaf test with a generated harness script as its argument.

pub mod executor;
pub mod registry;
pub mod version;

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::common::{Error, Result};
use self::version::EngineVersion;

/// Fixed relative path of the engine executable
pub const ENGINE_COMMAND: &str = "./engine";

/// Expression handed to `-e` to print the engine's numeric version
pub const VERSION_PROBE: &str = "print(Engine.version)";

/// Auxiliary script prefixed to every run on pre-2.x engines
pub const COMPAT_PRELUDE: &str = "compat-prelude.js";

/// Handle to the engine executable under test
#[derive(Debug)]
pub struct Engine {
    dir: PathBuf,
    version: EngineVersion,
}

impl Engine {
    /// Probe the engine in `dir` for its version and build a handle
    ///
    /// Runs `./engine -e 'print(Engine.version)'` and parses stdout as the
    /// packed numeric version (`major*10000 + minor*100 + patch`).
    pub async fn detect(dir: &Path) -> Result<Self> {
        let output = Command::new(ENGINE_COMMAND)
            .arg("-e")
            .arg(VERSION_PROBE)
            .current_dir(dir)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::engine_invocation(ENGINE_COMMAND, &e))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let raw: u64 = stdout
            .trim()
            .parse()
            .map_err(|_| Error::VersionProbe(stdout.trim().to_string()))?;

        println!("Engine version is: {raw}");
        let version = EngineVersion::from_raw(raw);
        tracing::info!(raw, key = %version.result_key(), "derived engine result key");

        Ok(Self {
            dir: dir.to_path_buf(),
            version,
        })
    }

    /// The probed (normalized) engine version
    pub fn version(&self) -> &EngineVersion {
        &self.version
    }

    /// Working directory the engine runs in
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Run a script file through the engine and capture its output
    ///
    /// stdout and stderr are captured as UTF-8 and concatenated. A non-zero
    /// exit is tolerated: the caller decides pass/fail from the output, so
    /// whatever the engine printed before dying is still returned.
    pub async fn run_script(&self, script: &str) -> Result<String> {
        let mut cmd = Command::new(ENGINE_COMMAND);
        if self.version.is_legacy() {
            cmd.arg(COMPAT_PRELUDE);
        }
        let output = cmd
            .arg(script)
            .current_dir(&self.dir)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::engine_invocation(ENGINE_COMMAND, &e))?;

        if !output.status.success() {
            tracing::debug!(code = ?output.status.code(), script, "engine exited non-zero");
        }

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(text)
    }
}
