use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "STYLECFG_LOG";
const DEFAULT_FILTER: &str = "stylecfg=info";

/// Installs a stderr subscriber. `STYLECFG_LOG` takes precedence over
/// `RUST_LOG`; a second call is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
