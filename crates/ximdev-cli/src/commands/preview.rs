//! `ximdev preview` command glue.
//!
//! Builds a session from the parsed arguments and runs it. Sessions only
//! return on fatal conditions, so these functions propagating an error is
//! the normal way the process ends.

use crate::cli::{ComponentArgs, ProjectArgs};
use crate::error::Result;
use crate::preview::{Session, DEFAULT_CACHE_DIR};
use std::path::PathBuf;

/// Execute `preview component`.
pub async fn component(args: ComponentArgs) -> Result<()> {
    let session = Session::component(
        args.address,
        args.path,
        args.var_name,
        PathBuf::from(DEFAULT_CACHE_DIR),
    );
    session.run().await
}

/// Execute `preview project`.
pub async fn project(args: ProjectArgs) -> Result<()> {
    let session = Session::project(args.address, args.path, PathBuf::from(DEFAULT_CACHE_DIR));
    session.run().await
}
