use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod settings;
pub mod validation;

pub use settings::Settings;

const DEFAULT_FILTER: &str = "safedesk=info,tokio=warn";

/// Initialize structured logging on stderr.
///
/// Stdout is left alone because it carries JSON-RPC frames and command output.
pub fn init_logging(level: Option<&str>, configured: Option<&str>) -> anyhow::Result<()> {
    let env_filter = log_filter(level, configured)?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_names(false)
                .with_file(true)
                .with_line_number(true)
                .with_level(true)
                .compact(),
        )
        .try_init()?;

    tracing::debug!("Structured logging initialized");
    Ok(())
}

/// Precedence: explicit `level` > `RUST_LOG` > `server.log_level` > built-in default.
fn log_filter(level: Option<&str>, configured: Option<&str>) -> anyhow::Result<EnvFilter> {
    if let Some(level) = level {
        return level_filter(level);
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    // An unusable configured level only warns during validation
    Ok(configured
        .and_then(|level| level_filter(level).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER)))
}

fn level_filter(level: &str) -> anyhow::Result<EnvFilter> {
    Ok(EnvFilter::try_new(format!("safedesk={},tokio=warn", level))?)
}

/// Initialize logging for testing with reduced verbosity
pub fn init_test_logging() -> anyhow::Result<()> {
    let env_filter = EnvFilter::new("safedesk=debug");

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_test_writer().compact())
        .try_init()
        .or_else(|_| Ok(())) // Ignore if already initialized
}
