use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Send logs to stderr. `RUST_LOG` wins; otherwise warnings only, or
/// debug output with `--verbose`.
pub(crate) fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(env_filter)
        .init();
}
