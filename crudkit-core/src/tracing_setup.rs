use tracing_subscriber::EnvFilter;

/// Default filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,crudkit=debug";

/// Install a global `tracing` subscriber writing formatted events to stdout.
///
/// The filter comes from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
/// Calling this more than once is harmless: later calls leave the first
/// subscriber in place.
pub fn init_tracing() {
    init_tracing_with(DEFAULT_FILTER);
}

/// Like [`init_tracing`] with an explicit fallback filter directive.
pub fn init_tracing_with(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let installed = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
