//! ximdev CLI entry point.
//!
//! Parses arguments, initializes logging, and dispatches to the command
//! implementations. Terminal failures render as miette diagnostics and set
//! exit code 1.

use clap::Parser;
use miette::Result;
use ximdev_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors();

    let result = match args.command {
        cli::Command::Preview(cli::PreviewCommand::Component(component_args)) => {
            commands::preview_component(component_args).await
        }
        cli::Command::Preview(cli::PreviewCommand::Project(project_args)) => {
            commands::preview_project(project_args).await
        }
    };

    result.map_err(error::into_report)
}
