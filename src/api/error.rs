//! Error types for backend fetches.

use std::fmt;

use thiserror::Error;

/// Which backend resource a request was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Stations,
    Readings,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Stations => write!(f, "stations"),
            Resource::Readings => write!(f, "readings"),
        }
    }
}

/// Errors that can occur while fetching stations or readings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never produced a response (connect failure, timeout, reset).
    #[error("Network error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("Failed to load {resource}: {status}")]
    HttpStatus { resource: Resource, status: u16 },

    /// The readings request succeeded but returned no readings.
    #[error("No readings available for this station")]
    EmptyData,

    /// The body could not be decoded as the expected JSON.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if err.is_timeout() {
            FetchError::Transport("request timed out".to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = FetchError::HttpStatus {
            resource: Resource::Readings,
            status: 500,
        };
        assert_eq!(err.to_string(), "Failed to load readings: 500");

        let err = FetchError::HttpStatus {
            resource: Resource::Stations,
            status: 404,
        };
        assert_eq!(err.to_string(), "Failed to load stations: 404");

        assert_eq!(FetchError::EmptyData.to_string(), "No readings available for this station");
    }
}
