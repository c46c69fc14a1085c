//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, coordinate validation, oversized query regions,
//! collaborator failures, per-element parse defects, and scan supersession.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid coordinate: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("query region spans {span_deg:.3} degrees, exceeding the {max_deg:.3} degree cap")]
    RegionTooLarge { span_deg: f64, max_deg: f64 },

    #[error("{source_name} source unavailable: {reason}")]
    SourceUnavailable {
        source_name: &'static str,
        reason: String,
    },

    #[error("malformed feature element: {0}")]
    MalformedFeature(String),

    #[error("no safe places found; try zooming in, moving toward a built-up area, or searching elsewhere")]
    NoResults,

    #[error("scan {token} superseded by a newer trigger")]
    Superseded { token: u64 },

    #[cfg(feature = "http")]
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        assert!(matches!(err, Error::Other(ref msg) if msg == "boom"));
    }

    #[test]
    fn no_results_message_carries_suggestions() {
        let msg = Error::NoResults.to_string();
        assert!(msg.contains("zooming in"));
        assert!(msg.contains("searching elsewhere"));
    }
}
