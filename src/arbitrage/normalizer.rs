//! Best available price per outcome across bookmakers.

use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::error::ArbitrageError;
use crate::odds::Match;

/// Highest price found for one outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct BestQuote {
    /// Outcome name.
    pub outcome: String,
    /// Bookmaker offering the price.
    pub bookmaker: String,
    /// Decimal odds.
    pub odds: Decimal,
}

/// Best quote per outcome, in first-seen outcome order.
///
/// Every held price is positive. Most markets have two or three outcomes,
/// so entries live inline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BestOutcomeOdds {
    entries: SmallVec<[BestQuote; 3]>,
}

impl BestOutcomeOdds {
    /// Offer a quote; it replaces the current best only if strictly higher.
    ///
    /// Prices of zero or below are rejected.
    pub fn offer(
        &mut self,
        outcome: &str,
        bookmaker: &str,
        odds: Decimal,
    ) -> Result<(), ArbitrageError> {
        if odds <= Decimal::ZERO {
            return Err(ArbitrageError::NonPositiveOdds {
                bookmaker: bookmaker.to_string(),
                outcome: outcome.to_string(),
                odds,
            });
        }

        match self.entries.iter_mut().find(|q| q.outcome == outcome) {
            Some(best) => {
                if odds > best.odds {
                    best.bookmaker = bookmaker.to_string();
                    best.odds = odds;
                }
            }
            None => self.entries.push(BestQuote {
                outcome: outcome.to_string(),
                bookmaker: bookmaker.to_string(),
                odds,
            }),
        }
        Ok(())
    }

    /// Best quote for an outcome.
    pub fn get(&self, outcome: &str) -> Option<&BestQuote> {
        self.entries.iter().find(|q| q.outcome == outcome)
    }

    /// Iterate quotes in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &BestQuote> {
        self.entries.iter()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no outcome was quoted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Pick the highest price for every outcome of a match.
///
/// Ties keep the bookmaker seen first. A single non-positive price makes the
/// whole match unusable.
pub fn best_outcome_odds(m: &Match) -> Result<BestOutcomeOdds, ArbitrageError> {
    let mut best = BestOutcomeOdds::default();
    for quote in m.quotes() {
        best.offer(quote.outcome, quote.bookmaker, quote.odds)?;
    }
    Ok(best)
}
