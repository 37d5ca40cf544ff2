use tracing::Level as TraceLevel;
use tracing_subscriber::FmtSubscriber;

use crate::constants;

/// Parse a level name; anything unknown means info
pub fn parse_level(raw: &str) -> TraceLevel {
    match raw.trim().to_lowercase().as_str() {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    }
}

/// Install the global subscriber, level taken from LOG_LEVEL
pub fn init() -> anyhow::Result<()> {
    let log_level = std::env::var(constants::env::LOG_LEVEL)
        .map(|raw| parse_level(&raw))
        .unwrap_or(TraceLevel::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
