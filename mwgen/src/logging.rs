//! Diagnostic logging to stderr.

use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber.
///
/// The level is `warn` by default, `debug` with `-v` and `trace` with `-vv`.
/// `RUST_LOG` takes precedence over both.
pub fn init(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Only fails if a subscriber is already set.
    let _ = fmt()
        .with_env_filter(env_filter)
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
