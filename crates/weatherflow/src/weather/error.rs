// crates/weatherflow/src/weather/error.rs
use thiserror::Error;

/// Why a single city produced no reading. Never surfaces to HTTP callers.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection failure or a non-2xx status.
    #[error("request for city {city} failed: {message}")]
    TransportOrStatus { city: String, message: String },

    /// Body did not carry `id`, `main.temp` and `main.humidity`.
    #[error("unexpected response shape for city {city}: {message}")]
    UnexpectedSchema { city: String, message: String },

    /// Only produced when a fetch timeout is configured.
    #[error("request for city {city} timed out after {elapsed_ms}ms")]
    Timeout { city: String, elapsed_ms: u64 },
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TransportOrStatus { .. } => "TRANSPORT_OR_STATUS",
            Self::UnexpectedSchema { .. } => "UNEXPECTED_SCHEMA",
            Self::Timeout { .. } => "TIMEOUT",
        }
    }

    pub fn city(&self) -> &str {
        match self {
            Self::TransportOrStatus { city, .. }
            | Self::UnexpectedSchema { city, .. }
            | Self::Timeout { city, .. } => city,
        }
    }
}
