use tracing::*;
use tracing_subscriber::EnvFilter;

/// Filter applied when RUST_LOG is unset: reconciliation logging on, the
/// HTTP stack underneath it quiet.
const DEFAULT_FILTER: &str = "info,hyper=warn,reqwest=warn";

pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .with_env_filter(filter)
        .init();
    info!("logging ready");
}
