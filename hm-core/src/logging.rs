use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence when set; otherwise `verbosity` (one of `trace`, `debug`, `info`,
/// `warn`, `error`, or any other `EnvFilter` directive) is used. Calling this more than once is
/// harmless: later calls leave the first subscriber in place.
pub fn setup(verbosity: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}
