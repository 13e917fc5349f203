//! Diagnostics setup for the command-line tool.
//!
//! Analysis code logs through `tracing`; the findings report itself is not a
//! log and goes to stdout through [`crate::reporter`].

use std::io::IsTerminal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber, writing to stderr.
///
/// * `verbose` - debug level for scrapped crates
/// * `no_color` - disable ANSI colours
///
/// Without `verbose`, `RUST_LOG` is honoured and defaults to warnings only.
pub fn init_logger(verbose: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("scrapped=debug,scrapped_cli=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("scrapped=warn,scrapped_cli=warn"))
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}

/// Whether the console report should be coloured.
///
/// Honours `--no-color`, the `NO_COLOR` convention and non-terminal stdout.
pub fn should_color(no_color: bool) -> bool {
    !no_color && std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}
