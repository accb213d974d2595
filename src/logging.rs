//! Tracing subscriber setup for applications and notebooks using the crate.
//!
//! The library itself only emits `tracing` events; nothing is printed unless
//! the caller installs a subscriber, either its own or this one.

use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::{DatasetConfig, LogFormat};

/// Installs a stderr subscriber filtered by `RUST_LOG` (default `info`),
/// formatted according to `AKL_PED_LOG_FORMAT`.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    init_tracing_with(DatasetConfig::from_env().log_format)
}

pub fn init_tracing_with(format: LogFormat) -> bool {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = match format {
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(true)
            .with_writer(std::io::stderr)
            .with_filter(filter())
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr)
            .with_filter(filter())
            .boxed(),
    };

    tracing_subscriber::registry().with(layer).try_init().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        let _ = init_tracing_with(LogFormat::Pretty);
        assert!(!init_tracing_with(LogFormat::Json));
    }
}
