//! Logging setup for the ximdev CLI.
//!
//! Structured logging through the `tracing` ecosystem. Verbosity is driven by
//! the global CLI flags, with `RUST_LOG` as an escape hatch for custom
//! filters.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Call once at program start, before anything logs.
///
/// Level resolution order:
/// 1. `--verbose`: debug level for ximdev
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG` environment variable
/// 4. default: info level
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("ximdev=debug,ximdev_cli=debug")
    } else if quiet {
        EnvFilter::new("ximdev_cli=error")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("ximdev=info,ximdev_cli=info"))
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
