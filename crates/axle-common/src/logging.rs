use tracing_subscriber::{fmt, EnvFilter};

/// Initialize structured logging with environment filter.
/// Set AXLE_LOG=debug (or trace, info, warn, error) for verbosity control.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env("AXLE_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Like `init_logging` but safe to call more than once. Entry points
/// that may be the first code to run in the process (the C-ABI surface)
/// use this.
pub fn try_init_logging() {
    let filter = EnvFilter::try_from_env("AXLE_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
