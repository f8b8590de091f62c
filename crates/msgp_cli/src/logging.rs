use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

fn env_filter() -> tracing_subscriber::EnvFilter {
	tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
}

/// Install the stderr log subscriber; `RUST_LOG` overrides the `warn` default.
pub fn init() {
	tracing_subscriber::registry()
		.with(tracing_subscriber::fmt::layer().compact().without_time().with_writer(std::io::stderr))
		.with(env_filter())
		.init();
}
