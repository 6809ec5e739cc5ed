use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

/// `RUST_LOG` directives win when they parse; otherwise the verbosity default.
fn build_filter(verbose: bool, directives: Option<&str>) -> EnvFilter {
    if let Some(filter) = directives.and_then(|d| EnvFilter::try_new(d).ok()) {
        return filter;
    }
    if verbose {
        EnvFilter::new("rawg_client=debug,info")
    } else {
        EnvFilter::new("rawg_client=info")
    }
}

fn default_filter(verbose: bool) -> EnvFilter {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    build_filter(verbose, directives.as_deref())
}

/// 初始化 CLI 日誌 (輸出到 stderr，stdout 保留給結果)
pub fn init_cli_logger(verbose: bool) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
}

/// JSON lines on stderr, for log shippers.
pub fn init_json_logger(verbose: bool) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .try_init()
}
