//! Command-line interface definition for the ximdev tool.
//!
//! Defined with clap v4 derive macros.
//!
//! # Command Structure
//!
//! - `ximdev preview component` - live-reload preview of a single component
//! - `ximdev preview project` - live-reload preview of a whole project

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Ximdev - developer tooling for the Xim UI framework
#[derive(Parser, Debug)]
#[command(
    name = "ximdev",
    version,
    about = "Developer tooling for the Xim UI framework",
    long_about = "Ximdev serves a live-reload preview of Xim components and projects.\n\
                  It rebuilds the wasm artifact whenever source files change and keeps\n\
                  serving the last good build across failed rebuilds."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available ximdev subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Preview a component or project with automatic rebuilds
    #[command(subcommand)]
    Preview(PreviewCommand),
}

/// Preview targets
#[derive(Subcommand, Debug)]
pub enum PreviewCommand {
    /// Preview a single component
    ///
    /// Stages the component into an isolated build workspace, generates an
    /// entry point around it, and rebuilds on every source change.
    Component(ComponentArgs),

    /// Preview a whole project
    ///
    /// Builds the project in place and serves the resulting artifact,
    /// rebuilding on every source change.
    Project(ProjectArgs),
}

/// Arguments for `preview component`
#[derive(Args, Debug)]
pub struct ComponentArgs {
    /// Address to listen on (host:port)
    #[arg(long, visible_alias = "addr", value_name = "HOST:PORT")]
    pub address: String,

    /// Component directory to preview
    #[arg(long, value_name = "DIR")]
    pub path: PathBuf,

    /// Exported component variable to mount
    #[arg(long = "varName", value_name = "NAME")]
    pub var_name: String,
}

/// Arguments for `preview project`
#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// Address to listen on (host:port)
    #[arg(long, visible_alias = "addr", value_name = "HOST:PORT")]
    pub address: String,

    /// Project directory to preview
    #[arg(long, value_name = "DIR")]
    pub path: PathBuf,
}
