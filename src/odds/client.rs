//! The Odds API v4 client.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::Config;
use crate::error::ApiError;

use super::types::{Bookmaker, Match, OutcomePrice, Region};
use super::OddsSource;

/// Sport entry from the `/sports` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SportResponse {
    /// Sport key (e.g. "soccer_epl").
    pub key: String,
    /// Sport group (e.g. "Soccer").
    #[serde(default)]
    pub group: Option<String>,
    /// Display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Whether the sport is in season.
    #[serde(default)]
    pub active: Option<bool>,
}

/// Event entry from the `/sports/{sport}/odds` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EventResponse {
    /// Event id.
    #[serde(default)]
    pub id: Option<String>,
    /// Sport key.
    pub sport_key: String,
    /// Start time as unix seconds.
    pub commence_time: i64,
    /// Home team.
    #[serde(default)]
    pub home_team: Option<String>,
    /// Away team.
    #[serde(default)]
    pub away_team: Option<String>,
    /// Bookmakers quoting the event.
    #[serde(default)]
    pub bookmakers: Vec<BookmakerResponse>,
}

/// Bookmaker entry of an event.
#[derive(Debug, Clone, Deserialize)]
pub struct BookmakerResponse {
    /// Bookmaker key.
    #[serde(default)]
    pub key: Option<String>,
    /// Bookmaker display title.
    pub title: String,
    /// Markets offered.
    #[serde(default)]
    pub markets: Vec<MarketResponse>,
}

/// Market entry of a bookmaker.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketResponse {
    /// Market key (e.g. "h2h").
    #[serde(default)]
    pub key: Option<String>,
    /// Outcome prices.
    #[serde(default)]
    pub outcomes: Vec<OutcomeResponse>,
}

/// Outcome price of a market.
#[derive(Debug, Clone, Deserialize)]
pub struct OutcomeResponse {
    /// Outcome name.
    pub name: String,
    /// Decimal odds.
    pub price: Decimal,
}

impl TryFrom<EventResponse> for Match {
    type Error = ApiError;

    fn try_from(event: EventResponse) -> Result<Self, Self::Error> {
        let commence_time =
            OffsetDateTime::from_unix_timestamp(event.commence_time).map_err(|e| {
                ApiError::Parse(format!(
                    "invalid commence_time {}: {}",
                    event.commence_time, e
                ))
            })?;

        // Only the first market of each bookmaker is priced.
        let bookmakers = event
            .bookmakers
            .into_iter()
            .filter_map(|bookmaker| {
                let market = bookmaker.markets.into_iter().next()?;
                Some(Bookmaker {
                    name: bookmaker.title,
                    outcomes: market
                        .outcomes
                        .into_iter()
                        .map(|o| OutcomePrice {
                            name: o.name,
                            price: o.price,
                        })
                        .collect(),
                })
            })
            .collect();

        Ok(Match {
            id: event.id,
            home_team: event.home_team,
            away_team: event.away_team,
            sport_key: event.sport_key,
            commence_time,
            bookmakers,
        })
    }
}

/// The Odds API client.
#[derive(Debug, Clone)]
pub struct OddsApiClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Base URL, e.g. https://api.the-odds-api.com/v4
    base_url: Url,
    /// API key sent as `apiKey`.
    api_key: String,
}

impl OddsApiClient {
    /// Create a new client from config.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.http_timeout_ms))
            .build()?;

        let base_url = Url::parse(&config.odds_api_url).map_err(|e| {
            ApiError::Parse(format!("invalid base url {}: {}", config.odds_api_url, e))
        })?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone().unwrap_or_default(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL from path segments. Segments are percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Parse(format!("base url cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments)
            // trailing slash
            .push("");
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .get(url)
            .query(&[("apiKey", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if let Some(remaining) = response
            .headers()
            .get("x-requests-remaining")
            .and_then(|v| v.to_str().ok())
        {
            debug!(remaining, "API quota");
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ApiError::from_status(status, &body);
            warn!(status = %status, error = %err, "API request failed");
            return Err(err);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl OddsSource for OddsApiClient {
    #[instrument(skip(self))]
    async fn list_sports(&self) -> Result<BTreeSet<String>, ApiError> {
        let url = self.endpoint(&["sports"])?;
        let sports: Vec<SportResponse> = self.get_json(url, &[]).await?;

        debug!(count = sports.len(), "Fetched sports catalog");

        Ok(sports.into_iter().map(|s| s.key).collect())
    }

    #[instrument(skip(self))]
    async fn get_odds(&self, sport: &str, region: Region) -> Result<Vec<Match>, ApiError> {
        let url = self.endpoint(&["sports", sport, "odds"])?;
        let region = region.to_string();
        let events: Vec<EventResponse> = self
            .get_json(
                url,
                &[
                    ("regions", region.as_str()),
                    ("oddsFormat", "decimal"),
                    ("dateFormat", "unix"),
                ],
            )
            .await?;

        debug!(count = events.len(), "Fetched events");

        events.into_iter().map(Match::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_config() -> Config {
        Config {
            api_key: Some("test-key".to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn client_creation_works() {
        let client = OddsApiClient::new(&test_config()).unwrap();
        assert_eq!(client.base_url().as_str(), "https://api.the-odds-api.com/v4");
    }

    #[test]
    fn endpoint_escapes_segments() {
        let client = OddsApiClient::new(&test_config()).unwrap();

        let url = client.endpoint(&["sports"]).unwrap();
        assert_eq!(url.as_str(), "https://api.the-odds-api.com/v4/sports/");

        let url = client.endpoint(&["sports", "soccer epl", "odds"]).unwrap();
        assert_eq!(url.as_str(), "https://api.the-odds-api.com/v4/sports/soccer%20epl/odds/");
    }

    #[test]
    fn endpoint_handles_trailing_slash_in_base() {
        let config = Config {
            odds_api_url: "http://localhost:8080/v4/".to_string(),
            ..test_config()
        };
        let client = OddsApiClient::new(&config).unwrap();

        let url = client.endpoint(&["sports"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v4/sports/");
    }

    #[test]
    fn event_response_converts_to_match() {
        let json = r#"[{
            "id": "e912304de2b2ce35b473ce2ecd3d1502",
            "sport_key": "americanfootball_nfl",
            "sport_title": "NFL",
            "commence_time": 1760900400,
            "home_team": "Houston Texans",
            "away_team": "Kansas City Chiefs",
            "bookmakers": [
                {
                    "key": "draftkings",
                    "title": "DraftKings",
                    "last_update": 1760800000,
                    "markets": [
                        {"key": "h2h", "outcomes": [
                            {"name": "Houston Texans", "price": 2.23},
                            {"name": "Kansas City Chiefs", "price": 1.45}
                        ]},
                        {"key": "spreads", "outcomes": [
                            {"name": "Houston Texans", "price": 9.0}
                        ]}
                    ]
                },
                {"key": "empty", "title": "Empty", "markets": []}
            ]
        }]"#;

        let events: Vec<EventResponse> = serde_json::from_str(json).unwrap();
        let m = Match::try_from(events.into_iter().next().unwrap()).unwrap();

        assert_eq!(m.name(), "Houston Texans v. Kansas City Chiefs");
        assert_eq!(m.sport_key, "americanfootball_nfl");
        assert_eq!(m.commence_time.unix_timestamp(), 1760900400);
        assert_eq!(m.bookmakers.len(), 1);
        assert_eq!(m.bookmakers[0].name, "DraftKings");
        assert_eq!(m.bookmakers[0].outcomes.len(), 2);
        assert_eq!(m.bookmakers[0].outcomes[0].price, dec!(2.23));
    }

    #[test]
    fn sports_response_parses() {
        let json = r#"[
            {"key": "soccer_epl", "group": "Soccer", "title": "EPL", "description": "English Premier League", "active": true, "has_outrights": false},
            {"key": "golf_masters_tournament_winner", "group": "Golf", "title": "Masters", "active": true, "has_outrights": true}
        ]"#;

        let sports: Vec<SportResponse> = serde_json::from_str(json).unwrap();
        assert_eq!(sports.len(), 2);
        assert_eq!(sports[0].key, "soccer_epl");
        assert_eq!(sports[1].group.as_deref(), Some("Golf"));
    }
}
