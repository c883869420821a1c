use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Honors `RUST_LOG`; repeated calls
/// are no-ops so hosting surfaces and tests can both call it.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
