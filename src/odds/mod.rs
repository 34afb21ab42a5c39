//! Odds data sources.
//!
//! This module handles:
//! - Match, bookmaker and quote types
//! - The Odds API client (sports catalog and odds)
//! - Mock source for testing

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::error::ApiError;

pub mod client;
pub mod mock;
pub mod types;

pub use client::OddsApiClient;
pub use mock::{MockFailure, MockMatchBuilder, MockOddsClient};
pub use types::{Bookmaker, Match, OutcomePrice, OutcomeQuote, Region};

/// Upstream provider of the sports catalog and per-sport odds.
#[async_trait]
pub trait OddsSource {
    /// Keys of all sports the provider currently lists.
    async fn list_sports(&self) -> Result<BTreeSet<String>, ApiError>;

    /// All matches with bookmaker prices for one sport in one region.
    async fn get_odds(&self, sport: &str, region: Region) -> Result<Vec<Match>, ApiError>;
}
