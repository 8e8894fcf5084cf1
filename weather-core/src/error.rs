//! Error taxonomy for weather lookups.

use thiserror::Error;

/// Message returned to callers when geocoding finds nothing.
pub const NO_SUCH_PLACE: &str = "No such place!";

/// Which upstream call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Geocode,
    Current,
    Forecast,
    History,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Geocode => "geocode",
            Endpoint::Current => "current",
            Endpoint::Forecast => "forecast",
            Endpoint::History => "history",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operational failure talking to the weather provider.
///
/// The cause of `Transport` and `Decode` is kept as the error source, not in
/// the message; render the whole chain with `{:#}` on an `anyhow::Error`.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("{endpoint} request failed")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: Endpoint,
        status: u16,
        body: String,
    },

    #[error("failed to parse {endpoint} response")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },

    #[error("{endpoint} response contained no data")]
    Empty { endpoint: Endpoint },

    #[error("{endpoint} response had {got} entries, expected {expected}")]
    Incomplete {
        endpoint: Endpoint,
        expected: usize,
        got: usize,
    },
}

impl UpstreamError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Decode { endpoint, .. }
            | Self::Empty { endpoint }
            | Self::Incomplete { endpoint, .. } => *endpoint,
        }
    }
}

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Geocoding returned zero matches. A valid negative answer, not a fault.
    #[error("{}", NO_SUCH_PLACE)]
    NotFound,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl WeatherError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_displays_fixed_message() {
        assert_eq!(WeatherError::NotFound.to_string(), "No such place!");
    }

    #[test]
    fn upstream_status_names_endpoint() {
        let err = WeatherError::from(UpstreamError::Status {
            endpoint: Endpoint::Current,
            status: 500,
            body: "boom".into(),
        });

        assert!(err.is_upstream());
        assert!(!err.is_not_found());
        let msg = err.to_string();
        assert!(msg.contains("current"));
        assert!(msg.contains("500"));
    }

    #[test]
    fn decode_cause_is_in_source_chain_once() {
        let source = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let cause = source.to_string();
        let err = WeatherError::from(UpstreamError::Decode { endpoint: Endpoint::History, source });

        assert_eq!(err.to_string(), "failed to parse history response");

        let rendered = format!("{:#}", anyhow::Error::new(err));
        assert_eq!(rendered, format!("failed to parse history response: {cause}"));
    }

    #[test]
    fn endpoint_is_reported() {
        let err = UpstreamError::Empty { endpoint: Endpoint::History };
        assert_eq!(err.endpoint(), Endpoint::History);
        assert_eq!(err.to_string(), "history response contained no data");
    }
}
