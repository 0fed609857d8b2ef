//! Tracing setup for the binary.
//!
//! - `LOG_LEVEL` holds filter directives (default `info`).
//! - `LOG_FORMAT=json` switches to structured JSON lines; anything else is the
//!   human-readable format.
//!
//! Logs go to stderr so they never interleave with `run` output on stdout.

use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL")
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}
