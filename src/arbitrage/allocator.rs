//! Stake allocation and profit calculations for arbitrage opportunities.

use rust_decimal::Decimal;
use serde::Serialize;

use super::normalizer::BestOutcomeOdds;
use crate::error::ArbitrageError;

/// Stake and resulting profit for one outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeStake {
    /// Outcome name.
    pub outcome: String,
    /// Bookmaker to place the stake with.
    pub bookmaker: String,
    /// Decimal odds at that bookmaker.
    pub odds: Decimal,
    /// Amount to stake, rounded to cents.
    pub stake: Decimal,
    /// Net profit if this outcome wins.
    pub profit: Decimal,
}

/// Best or worst case profit and the outcome producing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitExtreme {
    /// Net profit.
    pub amount: Decimal,
    /// Outcome that yields it.
    pub outcome: String,
}

/// Stake split of a betting unit across all outcomes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    /// Per-outcome stakes, in outcome order.
    pub stakes: Vec<OutcomeStake>,
    /// Highest net profit across outcomes.
    pub max_profit: ProfitExtreme,
    /// Lowest net profit across outcomes.
    pub min_profit: ProfitExtreme,
}

impl Allocation {
    /// Sum of the rounded stakes. May differ from the unit by a few cents.
    pub fn total_staked(&self) -> Decimal {
        self.stakes.iter().map(|s| s.stake).sum()
    }
}

/// Round to cents, half to even.
fn cents(value: Decimal) -> Decimal {
    value.round_dp(2)
}

/// Split `unit` across outcomes in proportion to their implied probability.
///
/// Stake is `round(unit * (1/odds) / total, 2)`. Profit when an outcome wins
/// is `round(round(stake * (odds - 1), 2) - (unit - stake), 2)`.
pub fn allocate(
    best: &BestOutcomeOdds,
    total_implied_odds: Decimal,
    unit: Decimal,
) -> Result<Allocation, ArbitrageError> {
    if best.is_empty() {
        return Err(ArbitrageError::EmptyOutcomes);
    }
    if total_implied_odds <= Decimal::ZERO {
        return Err(ArbitrageError::NonPositiveImpliedOdds(total_implied_odds));
    }
    if unit <= Decimal::ZERO {
        return Err(ArbitrageError::InvalidUnit(unit));
    }

    let mut stakes = Vec::with_capacity(best.len());
    let mut max_profit: Option<ProfitExtreme> = None;
    let mut min_profit: Option<ProfitExtreme> = None;

    for quote in best.iter() {
        let implied = Decimal::ONE / quote.odds;
        let stake = cents(implied * unit / total_implied_odds);
        let other_stakes = unit - stake;
        let profit = cents(cents(stake * (quote.odds - Decimal::ONE)) - other_stakes);

        if max_profit.as_ref().map_or(true, |m| profit > m.amount) {
            max_profit = Some(ProfitExtreme {
                amount: profit,
                outcome: quote.outcome.clone(),
            });
        }
        if min_profit.as_ref().map_or(true, |m| profit < m.amount) {
            min_profit = Some(ProfitExtreme {
                amount: profit,
                outcome: quote.outcome.clone(),
            });
        }

        stakes.push(OutcomeStake {
            outcome: quote.outcome.clone(),
            bookmaker: quote.bookmaker.clone(),
            odds: quote.odds,
            stake,
            profit,
        });
    }

    match (max_profit, min_profit) {
        (Some(max_profit), Some(min_profit)) => Ok(Allocation {
            stakes,
            max_profit,
            min_profit,
        }),
        _ => Err(ArbitrageError::EmptyOutcomes),
    }
}
