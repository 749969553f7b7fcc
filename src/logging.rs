// src/logging.rs
// =============================================================================
// tracing subscriber setup for the CLI.
//
// The library only emits events (debug! for each request and pipeline step,
// info! once per resolution). Whoever embeds it decides where they go; for
// the CLI that is stderr, so stdout stays clean for --json output.
//
// Level: RUST_LOG if set, else "debug" with --verbose, else "warn".
// =============================================================================

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    // try_init: a second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init();
}
