use tracing_subscriber::{EnvFilter, fmt};

/// Filter directives for diagnostics, e.g. `DATESPAN_LOG=debug`. Unset means silent.
pub const LOG_ENV: &str = "DATESPAN_LOG";

/// Installs a stderr subscriber. Stdout is reserved for the JSON payload.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
