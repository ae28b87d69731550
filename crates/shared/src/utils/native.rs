use std::{io::ErrorKind, path::PathBuf};

use tracing_subscriber::{
    fmt::format::FmtSpan,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

/// Used when `RUST_LOG` is unset or doesn't parse
pub const DEFAULT_LOG_FILTER: &str = "info,server=debug,shared=debug";

pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Logs to stdout with span close timings, filtered by `RUST_LOG`
pub fn configure_tracing() -> Result<(), TryInitError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .finish()
        .try_init()
}

/// Loads `.env` from the working dir or a parent. A missing file isn't an error.
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenv::Error> {
    dotenv::dotenv().map(Some).or_else(|e| match e {
        dotenv::Error::Io(io) if io.kind() == ErrorKind::NotFound => Ok(None),
        e => Err(e),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_log_filter_uses_directives() {
        let filter = log_filter(Some("server=trace")).to_string();
        assert!(filter.contains("server=trace"), "{filter}");
        assert!(!filter.contains("shared=debug"), "{filter}");
    }

    #[test]
    fn test_log_filter_falls_back_to_default() {
        for directives in [None, Some("server=nonsense")] {
            let filter = log_filter(directives).to_string();
            assert!(filter.contains("shared=debug"), "{directives:?} gave {filter}");
            assert!(filter.contains("server=debug"), "{directives:?} gave {filter}");
        }
    }
}
