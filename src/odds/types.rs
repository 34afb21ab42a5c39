//! Match and quote types for bookmaker odds.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::OffsetDateTime;

/// Bookmaker region to request odds for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Region {
    /// European bookmakers.
    Eu,
    /// US bookmakers.
    #[default]
    Us,
    /// Australian bookmakers.
    Au,
    /// UK bookmakers.
    Uk,
}

/// One outcome price listed by a bookmaker.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomePrice {
    /// Outcome name (team name, "Draw", ...).
    pub name: String,
    /// Decimal odds.
    pub price: Decimal,
}

/// A bookmaker's listing for a single match.
#[derive(Debug, Clone, PartialEq)]
pub struct Bookmaker {
    /// Display name of the bookmaker.
    pub name: String,
    /// Outcome prices of the bookmaker's first market.
    pub outcomes: Vec<OutcomePrice>,
}

/// A single sporting event with all bookmaker prices.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Upstream event id.
    pub id: Option<String>,
    /// Home team.
    pub home_team: Option<String>,
    /// Away team.
    pub away_team: Option<String>,
    /// League / sport key (e.g. "soccer_epl").
    pub sport_key: String,
    /// Scheduled start.
    pub commence_time: OffsetDateTime,
    /// Bookmaker listings, in upstream order.
    pub bookmakers: Vec<Bookmaker>,
}

/// One bookmaker's price for one outcome of one match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeQuote<'a> {
    /// Bookmaker offering the price.
    pub bookmaker: &'a str,
    /// Outcome name.
    pub outcome: &'a str,
    /// Decimal odds.
    pub odds: Decimal,
}

impl Match {
    /// Human readable name, "Home v. Away".
    pub fn name(&self) -> String {
        format!(
            "{} v. {}",
            self.home_team.as_deref().unwrap_or("TBD"),
            self.away_team.as_deref().unwrap_or("TBD")
        )
    }

    /// All quotes, bookmaker by bookmaker, in listing order.
    pub fn quotes(&self) -> impl Iterator<Item = OutcomeQuote<'_>> {
        self.bookmakers.iter().flat_map(|bookmaker| {
            bookmaker.outcomes.iter().map(move |outcome| OutcomeQuote {
                bookmaker: &bookmaker.name,
                outcome: &outcome.name,
                odds: outcome.price,
            })
        })
    }

    /// Check whether the match started before `now`.
    pub fn has_started(&self, now: OffsetDateTime) -> bool {
        self.commence_time < now
    }

    /// Hours until the match starts (negative once started).
    pub fn hours_to_start(&self, now: OffsetDateTime) -> f64 {
        (self.commence_time - now).as_seconds_f64() / 3600.0
    }
}
