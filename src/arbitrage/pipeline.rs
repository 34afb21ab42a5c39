//! Opportunity pipeline: sport selection, fetching and per-match evaluation.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};

use super::allocator::{allocate, OutcomeStake, ProfitExtreme};
use super::evaluator::{is_arbitrage, passes_start_filter, total_implied_odds};
use super::normalizer::best_outcome_odds;
use crate::error::ApiError;
use crate::odds::{Match, OddsSource, Region};

/// Inputs of a scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanParams {
    /// Bookmaker region.
    pub region: Region,
    /// Minimum margin below 1.0, as a fraction in [0, 1).
    pub cutoff: Decimal,
    /// Include matches that already started.
    pub live: bool,
    /// Betting unit per opportunity.
    pub unit: Decimal,
    /// Sport key substrings; empty means every sport.
    pub sports: Vec<String>,
}

/// A match whose best prices guarantee a profit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Opportunity {
    /// "Home v. Away".
    pub match_name: String,
    /// Sport key.
    pub league: String,
    /// Scheduled start.
    #[serde(with = "time::serde::timestamp")]
    pub match_start_time: OffsetDateTime,
    /// Hours until start, negative once started.
    pub hours_to_start: f64,
    /// Sum of implied probabilities of the best prices.
    pub total_implied_odds: Decimal,
    /// Stake and profit per outcome.
    pub best_outcome_odds: Vec<OutcomeStake>,
    /// Best case.
    pub max_profit: ProfitExtreme,
    /// Worst case.
    pub min_profit: ProfitExtreme,
}

impl Opportunity {
    /// Guaranteed margin below 1.0 (0.05 = 5%).
    pub fn margin(&self) -> Decimal {
        Decimal::ONE - self.total_implied_odds
    }
}

/// Evaluate one match.
fn evaluate_match(m: Match, params: &ScanParams, now: OffsetDateTime) -> Option<Opportunity> {
    let best = match best_outcome_odds(&m) {
        Ok(best) => best,
        Err(e) => {
            warn!(match_name = %m.name(), error = %e, "Skipping match with invalid odds");
            return None;
        }
    };
    let total = total_implied_odds(&best);

    if !is_arbitrage(total, params.cutoff) {
        debug!(match_name = %m.name(), total_implied_odds = %total, "No arbitrage");
        return None;
    }

    let allocation = match allocate(&best, total, params.unit) {
        Ok(allocation) => allocation,
        Err(e) => {
            warn!(match_name = %m.name(), error = %e, "Skipping match");
            return None;
        }
    };

    if best.len() < 2 {
        warn!(match_name = %m.name(), "Single-outcome opportunity, check the source data");
    }

    let opportunity = Opportunity {
        match_name: m.name(),
        league: m.sport_key.clone(),
        match_start_time: m.commence_time,
        hours_to_start: m.hours_to_start(now),
        total_implied_odds: total,
        best_outcome_odds: allocation.stakes,
        max_profit: allocation.max_profit,
        min_profit: allocation.min_profit,
    };

    info!(
        match_name = %opportunity.match_name,
        league = %opportunity.league,
        total_implied_odds = %total,
        min_profit = %opportunity.min_profit.amount,
        "Arbitrage opportunity detected"
    );

    Some(opportunity)
}

/// Lazily turn matches into opportunities, preserving input order.
pub fn find_opportunities<'a, I>(
    matches: I,
    params: &'a ScanParams,
    now: OffsetDateTime,
) -> impl Iterator<Item = Opportunity> + 'a
where
    I: IntoIterator<Item = Match>,
    I::IntoIter: 'a,
{
    matches
        .into_iter()
        .filter(move |m| passes_start_filter(m, params.live, now))
        .filter_map(move |m| evaluate_match(m, params, now))
}

/// Restrict the catalog to keys containing any of the filters.
///
/// An empty filter list keeps everything. Matching is case-sensitive.
pub fn select_sports(catalog: BTreeSet<String>, filters: &[String]) -> BTreeSet<String> {
    if filters.is_empty() {
        return catalog;
    }
    catalog
        .into_iter()
        .filter(|sport| filters.iter().any(|f| sport.contains(f.as_str())))
        .collect()
}

/// Fetch every selected sport in turn and collect all opportunities.
///
/// The first failed request aborts the scan.
#[instrument(skip(source, params), fields(region = %params.region))]
pub async fn scan<S>(source: &S, params: &ScanParams) -> Result<Vec<Opportunity>, ApiError>
where
    S: OddsSource + Sync + ?Sized,
{
    let sports = select_sports(source.list_sports().await?, &params.sports);
    info!(count = sports.len(), "Checking sports");

    let mut matches = Vec::new();
    for sport in &sports {
        let fetched = source.get_odds(sport, params.region).await?;
        debug!(sport = %sport, count = fetched.len(), "Fetched matches");
        matches.extend(fetched);
    }

    let checked = matches.len();
    let opportunities: Vec<_> =
        find_opportunities(matches, params, OffsetDateTime::now_utc()).collect();

    info!(checked, found = opportunities.len(), "Scan complete");

    Ok(opportunities)
}
