use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// `--log` wins over `HORIZON_LOG`, which wins over the configured level.
pub fn init_tracing(cli_filter: Option<&str>, configured: &str) {
    let filter = match cli_filter {
        Some(directive) => EnvFilter::try_new(directive),
        None => EnvFilter::try_from_env("HORIZON_LOG").or_else(|_| EnvFilter::try_new(configured)),
    }
    .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
