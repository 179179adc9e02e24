//! Error handling for the ximdev CLI.
//!
//! One `thiserror` enum covers the whole tool. Which errors are fatal is
//! decided by position, not by variant: anything returned while a session is
//! starting (validation, watcher setup, server bind, the initial build)
//! propagates to `main` and sets the exit code, while rebuild-time errors are
//! caught at the reload boundary and only logged.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Path could not be read at all
    #[error("could not stat {}", .0.display())]
    FileNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// Project root is missing its entry file
    #[error("{} does not contain a main.go entry file", .0.display())]
    InvalidProject(PathBuf),

    /// The `go` binary is not on PATH
    #[error("go toolchain not found on PATH")]
    ToolchainUnavailable,

    /// `go version` produced output we cannot parse
    #[error("could not parse go version output: {0:?}")]
    ToolchainVersion(String),

    /// A toolchain step exited non-zero
    #[error("{step} failed{}", fmt_exit_code(.code))]
    BuildFailed {
        /// Which of the two toolchain steps failed
        step: BuildStep,
        /// Exit code, if the process exited normally
        code: Option<i32>,
    },

    /// I/O errors from staging, copying, and artifact placement
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File watcher setup errors
    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// The watcher event channel closed unexpectedly
    #[error("file watcher stopped unexpectedly")]
    WatcherClosed,

    /// Server bind or runtime errors
    #[error("server error: {0}")]
    Server(String),
}

/// The two subprocess steps of a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    /// Dependency resolution (`go mod tidy`)
    Sync,
    /// Compilation to wasm (`go build`)
    Compile,
}

fn fmt_exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!(" (exit code {code})"),
        None => String::new(),
    }
}

impl std::fmt::Display for BuildStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildStep::Sync => write!(f, "dependency sync (go mod tidy)"),
            BuildStep::Compile => write!(f, "compile (go build)"),
        }
    }
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Convert a terminal `CliError` into a miette report for display.
///
/// Variants a user can act on carry a help line; the rest render as-is.
pub fn into_report(err: CliError) -> miette::Report {
    match err {
        CliError::ToolchainUnavailable => miette::miette!(
            help = "install Go and make sure `go` is on your PATH",
            "go toolchain not found on PATH"
        ),
        CliError::InvalidProject(path) => miette::miette!(
            help = "a previewable project needs a main.go at its root",
            "{} does not contain a main.go entry file",
            path.display()
        ),
        CliError::BuildFailed { .. } => miette::miette!(
            help = "the compiler output above has the details",
            "{}",
            err
        ),
        other => miette::miette!("{}", other),
    }
}
