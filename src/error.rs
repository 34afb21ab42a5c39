//! Unified error types for the arbitrage finder.

use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration was loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors returned by the odds data source and sports catalog.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The API key was rejected (HTTP 401).
    #[error(
        "failed to authenticate with the API, is the API key valid? (HTTP {status}: {message})"
    )]
    Authentication {
        /// HTTP status code.
        status: u16,
        /// Message returned by the API.
        message: String,
    },

    /// The request was throttled (HTTP 429).
    #[error("encountered API rate limit (HTTP {status}: {message})")]
    RateLimit {
        /// HTTP status code.
        status: u16,
        /// Message returned by the API.
        message: String,
    },

    /// Any other non-success response.
    #[error("unknown issue arose while trying to access the API (HTTP {status}: {message})")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message returned by the API.
        message: String,
    },

    /// Transport-level failure.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected shape.
    #[error("failed to parse api response: {0}")]
    Parse(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl ApiError {
    /// Classify a non-success response.
    ///
    /// The message is taken from the JSON `message` field when the body has
    /// one, otherwise the raw body is used.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.message)
            .unwrap_or_else(|_| body.trim().to_string());
        let status = status.as_u16();

        match status {
            401 => ApiError::Authentication { status, message },
            429 => ApiError::RateLimit { status, message },
            _ => ApiError::Api { status, message },
        }
    }

    /// HTTP status carried by the error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Authentication { status, .. }
            | ApiError::RateLimit { status, .. }
            | ApiError::Api { status, .. } => Some(*status),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            ApiError::Parse(_) => None,
        }
    }
}

/// Best-odds and stake allocation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArbitrageError {
    /// A bookmaker quoted a price that is zero or negative.
    #[error("{bookmaker} quoted {odds} for {outcome}, odds must be positive")]
    NonPositiveOdds {
        /// Bookmaker quoting the price.
        bookmaker: String,
        /// Outcome the price is for.
        outcome: String,
        /// The rejected price.
        odds: Decimal,
    },

    /// No outcomes were quoted for the match.
    #[error("no outcomes to allocate stakes across")]
    EmptyOutcomes,

    /// Total implied odds must be positive to split a unit.
    #[error("total implied odds must be positive, got {0}")]
    NonPositiveImpliedOdds(Decimal),

    /// Betting unit must be positive.
    #[error("invalid betting unit: {0}")]
    InvalidUnit(Decimal),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_authentication() {
        let err = ApiError::from_status(
            StatusCode::UNAUTHORIZED,
            r#"{"message":"API key is not valid","error_code":"INVALID_KEY"}"#,
        );

        match err {
            ApiError::Authentication { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "API key is not valid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn too_many_requests_maps_to_rate_limit() {
        let err =
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, r#"{"message":"slow down"}"#);
        assert!(matches!(err, ApiError::RateLimit { status: 429, .. }));
        assert_eq!(err.status(), Some(429));
    }

    #[test]
    fn other_status_falls_back_to_raw_body() {
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "  upstream down \n");

        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn display_includes_status_and_message() {
        let err = ApiError::from_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"message":"Invalid region"}"#,
        );
        let text = err.to_string();
        assert!(text.contains("422"));
        assert!(text.contains("Invalid region"));
    }

    #[test]
    fn config_errors_carry_the_reason() {
        let err = AppError::InvalidConfig("UNIT must be positive".to_string());
        assert_eq!(err.to_string(), "invalid configuration: UNIT must be positive");
    }

    #[test]
    fn non_positive_odds_names_the_quote() {
        let err = ArbitrageError::NonPositiveOdds {
            bookmaker: "Unibet".to_string(),
            outcome: "Draw".to_string(),
            odds: Decimal::ZERO,
        };
        assert_eq!(err.to_string(), "Unibet quoted 0 for Draw, odds must be positive");
    }
}
