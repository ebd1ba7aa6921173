use tracing_subscriber::EnvFilter;

/// Default directive when neither `RUST_LOG` nor the config file sets one.
const DEFAULT_LOG_FILTER: &str = "warn";

pub fn init_logging(verbose: bool, config_filter: Option<&str>) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fallback = if verbose {
        "debug"
    } else {
        config_filter.unwrap_or(DEFAULT_LOG_FILTER)
    };

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
