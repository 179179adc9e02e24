//! Go toolchain subprocess wrapper.
//!
//! Every rebuild runs two steps in sequence, `go mod tidy` then
//! `go build -o main.wasm`, with the target overridden to js/wasm.
//! Subprocess output is streamed straight through to the tool's console so
//! compiler diagnostics reach the developer unmodified.

use crate::error::{BuildStep, CliError, Result};
use crate::preview::watcher::ARTIFACT_NAME;
use std::path::Path;
use std::process::Command;

/// Target platform/architecture pair, fixed for browser execution.
const TARGET_ENV: [(&str, &str); 2] = [("GOOS", "js"), ("GOARCH", "wasm")];

/// Handle to the external Go toolchain.
#[derive(Debug, Clone, Default)]
pub struct Toolchain;

impl Toolchain {
    pub fn new() -> Self {
        Self
    }

    /// Detected toolchain version as `major.minor`, for the generated
    /// module descriptor.
    pub fn version(&self) -> Result<String> {
        let output = Command::new("go")
            .arg("version")
            .output()
            .map_err(map_spawn_error)?;
        if !output.status.success() {
            return Err(CliError::ToolchainVersion(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }
        parse_version(&String::from_utf8_lossy(&output.stdout))
    }

    /// Run the two-step build inside `dir`, producing `main.wasm` there.
    ///
    /// Either step failing aborts the rebuild; the caller keeps serving
    /// whatever artifact it already has.
    pub fn build(&self, dir: &Path) -> Result<()> {
        self.run_step(dir, &["mod", "tidy"], BuildStep::Sync)?;
        self.run_step(dir, &["build", "-o", ARTIFACT_NAME], BuildStep::Compile)
    }

    fn run_step(&self, dir: &Path, args: &[&str], step: BuildStep) -> Result<()> {
        let status = Command::new("go")
            .args(args)
            .current_dir(dir)
            .envs(TARGET_ENV)
            .status()
            .map_err(map_spawn_error)?;
        if !status.success() {
            return Err(CliError::BuildFailed {
                step,
                code: status.code(),
            });
        }
        Ok(())
    }
}

fn map_spawn_error(err: std::io::Error) -> CliError {
    if err.kind() == std::io::ErrorKind::NotFound {
        CliError::ToolchainUnavailable
    } else {
        CliError::Io(err)
    }
}

/// Parse `go version` output down to `major.minor`.
///
/// `go version go1.22.1 linux/amd64` becomes `1.22`.
fn parse_version(output: &str) -> Result<String> {
    let tagged = output
        .split_whitespace()
        .nth(2)
        .and_then(|word| word.strip_prefix("go"))
        .ok_or_else(|| CliError::ToolchainVersion(output.to_string()))?;

    let mut parts = tagged.split('.');
    match (parts.next(), parts.next()) {
        (Some(major), Some(minor)) if !major.is_empty() && !minor.is_empty() => {
            Ok(format!("{major}.{minor}"))
        }
        _ => Err(CliError::ToolchainVersion(output.to_string())),
    }
}
