//! Process-wide `tracing` subscriber setup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "noodlebar_server=info";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Single-line human-readable output.
    #[default]
    Compact,
    /// One JSON object per line, for log shippers.
    Json,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already set.
pub fn init_logging(format: LogFormat) -> anyhow::Result<()> {
    let fmt = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(env_filter());
    match format {
        LogFormat::Compact => registry.with(fmt.compact()).try_init()?,
        LogFormat::Json => registry.with(fmt.json()).try_init()?,
    }
    Ok(())
}
