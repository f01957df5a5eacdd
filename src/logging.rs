use std::io;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the tracing subscriber.
/// - Respects `RUST_LOG` if set, falls back to `classroom_store=info`
/// - Writes to stderr so command output on stdout stays clean
/// - Safe to call more than once
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,classroom_store=info"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .try_init();
}
