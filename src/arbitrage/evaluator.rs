//! Arbitrage qualification: implied probability and cutoff test.

use rust_decimal::Decimal;
use time::OffsetDateTime;

use super::normalizer::BestOutcomeOdds;
use crate::odds::Match;

/// Sum of implied probabilities (1 / odds) over the best quotes.
pub fn total_implied_odds(best: &BestOutcomeOdds) -> Decimal {
    best.iter().map(|q| Decimal::ONE / q.odds).sum()
}

/// A position is an arbitrage when `0 < total < 1 - cutoff`.
pub fn is_arbitrage(total_implied_odds: Decimal, cutoff: Decimal) -> bool {
    total_implied_odds > Decimal::ZERO && total_implied_odds < Decimal::ONE - cutoff
}

/// Start-time pre-filter: keep the match unless only upcoming matches are
/// wanted and it has already started.
pub fn passes_start_filter(m: &Match, live: bool, now: OffsetDateTime) -> bool {
    live || !m.has_started(now)
}
