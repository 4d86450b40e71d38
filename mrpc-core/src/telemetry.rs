use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

/// Installs the process-wide `tracing` subscriber, honoring `RUST_LOG`.
///
/// This governs internal diagnostic logging only (startup, shutdown,
/// listener errors); it is independent of the proxy's access/debug/request
/// sinks, which are a pluggable capability on the façade rather than a
/// global subscriber.
pub fn init_logging() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_span_events(FmtSpan::NONE)
		.try_init();
}
