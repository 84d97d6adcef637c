//! Logging initialization for the CLI.
//!
//! Configures the `tracing` subscriber with level filtering via the
//! `STUDYROOM_LOG` environment variable, falling back to `warn` so normal
//! command output stays clean.
//!
//! ```bash
//! STUDYROOM_LOG=debug studyroom-cli timer focus --minutes 1
//! ```

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber, writing to stderr.
pub fn init() {
    let filter =
        EnvFilter::try_from_env("STUDYROOM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
