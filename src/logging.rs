use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the log filter.
pub const LOG_ENV: &str = "MC_LOG";

/// Installs the stderr subscriber. `quiet` wins over `verbose`.
pub fn init(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "off"
    } else if verbose {
        "warn,medcenter=debug"
    } else {
        "warn"
    };

    let filter = if quiet {
        EnvFilter::new(default_level)
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    // A subscriber may already be installed when running inside tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .try_init();
}
