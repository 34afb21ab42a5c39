//! Mock odds source for unit testing.
//!
//! This module provides a source that can be used in tests
//! without making real network requests.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::error::ApiError;

use super::types::{Bookmaker, Match, OutcomePrice, Region};
use super::OddsSource;

/// Failure to inject into a mock call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Respond as if the key was rejected (401).
    Authentication,
    /// Respond as if throttled (429).
    RateLimit,
    /// Respond with a server error (500).
    Server,
}

impl MockFailure {
    fn to_error(self) -> ApiError {
        match self {
            MockFailure::Authentication => ApiError::Authentication {
                status: 401,
                message: "Mock authentication failure".to_string(),
            },
            MockFailure::RateLimit => ApiError::RateLimit {
                status: 429,
                message: "Mock rate limit".to_string(),
            },
            MockFailure::Server => ApiError::Api {
                status: 500,
                message: "Mock server failure".to_string(),
            },
        }
    }
}

/// Mock odds source for testing.
#[derive(Debug, Clone, Default)]
pub struct MockOddsClient {
    /// Matches by sport key.
    odds: HashMap<String, Vec<Match>>,
    /// Failure returned by `list_sports`.
    sports_failure: Option<MockFailure>,
    /// Failures returned by `get_odds` per sport.
    odds_failures: HashMap<String, MockFailure>,
    /// Sports requested through `get_odds`, in call order.
    requests: Arc<Mutex<Vec<(String, Region)>>>,
}

impl MockOddsClient {
    /// Create an empty mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sport with its matches.
    pub fn with_sport(mut self, sport: &str, matches: Vec<Match>) -> Self {
        self.odds.insert(sport.to_string(), matches);
        self
    }

    /// Make `list_sports` fail.
    pub fn fail_sports(mut self, failure: MockFailure) -> Self {
        self.sports_failure = Some(failure);
        self
    }

    /// Make `get_odds` fail for one sport.
    pub fn fail_odds(mut self, sport: &str, failure: MockFailure) -> Self {
        self.odds.entry(sport.to_string()).or_default();
        self.odds_failures.insert(sport.to_string(), failure);
        self
    }

    /// Sports fetched so far, in call order.
    pub fn requests(&self) -> Vec<(String, Region)> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl OddsSource for MockOddsClient {
    async fn list_sports(&self) -> Result<BTreeSet<String>, ApiError> {
        if let Some(failure) = self.sports_failure {
            return Err(failure.to_error());
        }
        Ok(self.odds.keys().cloned().collect())
    }

    async fn get_odds(&self, sport: &str, region: Region) -> Result<Vec<Match>, ApiError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((sport.to_string(), region));
        }

        if let Some(failure) = self.odds_failures.get(sport) {
            return Err(failure.to_error());
        }

        Ok(self.odds.get(sport).cloned().unwrap_or_default())
    }
}

/// Builder for test matches.
#[derive(Debug, Clone)]
pub struct MockMatchBuilder {
    inner: Match,
}

impl MockMatchBuilder {
    /// Start a match between two teams in a league.
    pub fn new(home: &str, away: &str, sport_key: &str) -> Self {
        Self {
            inner: Match {
                id: None,
                home_team: Some(home.to_string()),
                away_team: Some(away.to_string()),
                sport_key: sport_key.to_string(),
                commence_time: OffsetDateTime::UNIX_EPOCH,
                bookmakers: Vec::new(),
            },
        }
    }

    /// Set the start time.
    pub fn starts_at(mut self, at: OffsetDateTime) -> Self {
        self.inner.commence_time = at;
        self
    }

    /// Add a bookmaker with `(outcome, price)` pairs.
    pub fn bookmaker(mut self, name: &str, prices: &[(&str, Decimal)]) -> Self {
        self.inner.bookmakers.push(Bookmaker {
            name: name.to_string(),
            outcomes: prices
                .iter()
                .map(|(outcome, price)| OutcomePrice {
                    name: outcome.to_string(),
                    price: *price,
                })
                .collect(),
        });
        self
    }

    /// Finish the match.
    pub fn build(self) -> Match {
        self.inner
    }
}
