//! Sports betting arbitrage finder.
//!
//! Compares decimal odds across bookmakers for the same match and reports
//! matches where backing every outcome at its best price guarantees a profit.
//!
//! # Strategy
//!
//! Each price implies a probability of `1 / odds`. If the best prices for all
//! outcomes imply less than 100% in total, splitting a unit in proportion to
//! those probabilities pays out the same amount whichever outcome wins:
//!
//! ```text
//! Home @ 2.20 (Bookie X):  1 / 2.20 = 0.4545
//! Away @ 2.20 (Bookie Y):  1 / 2.20 = 0.4545
//! ───────────────────────────────────────────
//! Total implied odds:                0.9091 < 1.0 ✅
//! Unit 10 → 5.00 on each side, 1.00 profit either way
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`odds`]: Match types, The Odds API client and mock source
//! - [`arbitrage`]: Best odds, evaluation, stake allocation and the scan pipeline
//! - [`report`]: Text and JSON output

pub mod arbitrage;
pub mod config;
pub mod error;
pub mod odds;
pub mod report;

pub use config::Config;
pub use error::{ApiError, AppError, ArbitrageError, Result};
