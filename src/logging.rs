use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "dealdesk=info";
pub const VERBOSE_FILTER: &str = "dealdesk=debug,info";

/// Filter directives in order of precedence: `RUST_LOG`, then `-v`, then the
/// `[logging] filter` config value, then [`DEFAULT_FILTER`].
pub fn filter_directives(env: Option<&str>, verbose: bool, configured: Option<&str>) -> String {
    let pick = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);
    pick(env)
        .or_else(|| verbose.then(|| VERBOSE_FILTER.to_string()))
        .or_else(|| pick(configured))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Install the stderr subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_logger(verbose: bool, configured: Option<&str>) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directives = filter_directives(env.as_deref(), verbose, configured);
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}
