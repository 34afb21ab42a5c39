//! Arbitrage module for finding and sizing opportunities.
//!
//! This module handles:
//! - Best price per outcome across bookmakers
//! - Implied probability and cutoff checks
//! - Stake allocation and profit calculations
//! - The scan pipeline tying them together

pub mod allocator;
pub mod evaluator;
pub mod normalizer;
pub mod pipeline;

pub use allocator::{allocate, Allocation, OutcomeStake, ProfitExtreme};
pub use evaluator::{is_arbitrage, passes_start_filter, total_implied_odds};
pub use normalizer::{best_outcome_odds, BestOutcomeOdds, BestQuote};
pub use pipeline::{find_opportunities, scan, select_sports, Opportunity, ScanParams};
