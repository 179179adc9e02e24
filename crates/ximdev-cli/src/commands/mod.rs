//! Command implementations for the ximdev CLI.
//!
//! Each command provides an `execute`-style function taking its parsed
//! arguments and returning a Result.

pub mod preview;

pub use preview::{component as preview_component, project as preview_project};
