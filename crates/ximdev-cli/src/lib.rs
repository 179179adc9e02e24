//! ximdev - developer tooling for the Xim UI framework.
//!
//! The library target exists so the preview engine can be exercised by
//! integration tests; the `ximdev` binary is a thin wrapper over it.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod preview;
pub mod ui;

pub use error::{CliError, Result};
