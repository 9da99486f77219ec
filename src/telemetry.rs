use std::{fs::File, sync::Mutex};

use tracing_subscriber::{EnvFilter, filter::ParseError, fmt::writer::BoxMakeWriter};

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
    EnvFilter {
        value: String,
        #[source]
        source: ParseError,
    },

    #[error("telemetry error: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// Installs the global subscriber. `RUST_LOG` wins over `level`; events go to
/// `log_file` when given, stderr otherwise.
pub fn init(level: &str, log_file: Option<File>) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).map_err(|source| TelemetryError::EnvFilter {
            value: level.to_string(),
            source,
        })?,
    };

    let writer = match log_file {
        Some(file) => BoxMakeWriter::new(Mutex::new(file)),
        None => BoxMakeWriter::new(std::io::stderr),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_filter() {
        // SAFETY: tests in this module do not read RUST_LOG concurrently.
        unsafe { std::env::remove_var("RUST_LOG") };
        let err = init("stepform=[", None).unwrap_err();
        assert!(matches!(err, TelemetryError::EnvFilter { .. }));
    }
}
